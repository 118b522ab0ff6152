//////////////////////////
// board.rs
//////////////////////////

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Color, Piece, PieceType, Position};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An 8x8 grid of optional pieces, indexed `[row - 1][col - 1]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Board::default()
    }

    /// A board in the standard opening arrangement.
    pub fn starting() -> Self {
        let mut board = Board::new();
        board.reset_board();
        board
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        let (r, c) = pos.index();
        self.squares[r][c]
    }

    /// Overwrites whatever is on `pos`; `None` clears the square.
    pub fn add_piece(&mut self, pos: Position, piece: Option<Piece>) {
        let (r, c) = pos.index();
        self.squares[r][c] = piece;
    }

    pub fn reset_board(&mut self) {
        self.squares = [[None; 8]; 8];

        for (i, piece_type) in BACK_RANK.iter().enumerate() {
            let col = i as u8 + 1;
            self.add_piece(Position::new(1, col), Some(Piece::new(Color::White, *piece_type)));
            self.add_piece(Position::new(8, col), Some(Piece::new(Color::Black, *piece_type)));
        }

        for col in 1..=8 {
            self.add_piece(
                Position::new(Color::White.pawn_rank(), col),
                Some(Piece::new(Color::White, PieceType::Pawn)),
            );
            self.add_piece(
                Position::new(Color::Black.pawn_rank(), col),
                Some(Piece::new(Color::Black, PieceType::Pawn)),
            );
        }
    }

    /// Every occupied square with its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get_piece(pos).map(|piece| (pos, piece)))
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| *piece == Piece::new(color, PieceType::King))
            .map(|(pos, _)| pos)
    }
}

// ----------  Board Display ----------
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for file in 0..8u8 {
            write!(f, " {} ", ((file + b'a') as char).to_string().cyan())?;
        }
        writeln!(f)?;
        writeln!(f, "  {}", "─".repeat(24).bright_magenta())?;

        for row in (1..=8u8).rev() {
            write!(f, "{} {}", row.to_string().cyan(), "│".bright_magenta())?;
            for col in 1..=8u8 {
                let cell = match self.get_piece(Position::new(row, col)) {
                    Some(piece) if piece.color == Color::White => {
                        piece.symbol().to_string().bright_red()
                    }
                    Some(piece) => piece.symbol().to_string().bright_blue(),
                    None => "·".bright_magenta(),
                };
                write!(f, " {} ", cell)?;
            }
            writeln!(f, "{} {}", "│".bright_magenta(), row.to_string().cyan())?;
        }

        writeln!(f, "  {}", "─".repeat(24).bright_magenta())?;
        write!(f, "  ")?;
        for file in 0..8u8 {
            write!(f, " {} ", ((file + b'a') as char).to_string().cyan())?;
        }
        writeln!(f)
    }
}
