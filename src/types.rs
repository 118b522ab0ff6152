//////////////////////////
// types.rs
//////////////////////////

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChessError;

pub type GameId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Pieces a pawn may become on the far rank, in generation order.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    pub fn letter(&self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Rook => 'R',
            PieceType::Pawn => 'P',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank a pawn of this color starts on.
    pub fn pawn_rank(&self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Rank on which a pawn of this color promotes.
    pub fn promotion_rank(&self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    /// Row direction pawns of this color advance in.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "pieceColor")]
    pub color: Color,
    #[serde(rename = "type")]
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Piece { color, piece_type }
    }

    /// Upper case for white, lower case for black.
    pub fn symbol(&self) -> char {
        let letter = self.piece_type.letter();
        match self.color {
            Color::White => letter,
            Color::Black => letter.to_ascii_lowercase(),
        }
    }
}

// ---------- POSITIONS ----------

/// A square on the board, row and column both in `1..=8`.
///
/// Column 1 is the a-file and row 1 is White's back rank, so `a1` is
/// `Position::new(1, 1)` and `e4` is `Position::new(4, 5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: i64,
    col: i64,
}

impl TryFrom<RawPosition> for Position {
    type Error = ChessError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        if (1..=8).contains(&raw.row) && (1..=8).contains(&raw.col) {
            Ok(Position::new(raw.row as u8, raw.col as u8))
        } else {
            Err(ChessError::OffBoard {
                row: raw.row,
                col: raw.col,
            })
        }
    }
}

impl Position {
    /// Panics when either coordinate is outside `1..=8`; callers always
    /// build positions in range.
    pub fn new(row: u8, col: u8) -> Self {
        assert!(
            (1..=8).contains(&row) && (1..=8).contains(&col),
            "position ({}, {}) is off the board",
            row,
            col
        );
        Position { row, col }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// The square `dr` rows and `dc` columns away, if it is on the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares, row by row from a1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |col| Position { row, col }))
    }

    pub(crate) fn index(&self) -> (usize, usize) {
        (self.row as usize - 1, self.col as usize - 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col - 1) as char;
        write!(f, "{}{}", file, self.row)
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        Ok(Position::new(rank - b'0', file - b'a' + 1))
    }
}

// ---------- MOVES ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub start_position: Position,
    pub end_position: Position,
    #[serde(default)]
    pub promotion_piece: Option<PieceType>,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move {
            start_position: from,
            end_position: to,
            promotion_piece: None,
        }
    }

    pub fn promoting(from: Position, to: Position, piece_type: PieceType) -> Self {
        Move {
            start_position: from,
            end_position: to,
            promotion_piece: Some(piece_type),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_position, self.end_position)?;
        if let Some(promotion) = self.promotion_piece {
            write!(f, "={}", promotion.letter())?;
        }
        Ok(())
    }
}

/// How a client takes part in one game, derived on every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Player(Color),
    Observer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player(color) => write!(f, "{}", color),
            Role::Observer => write!(f, "observer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_coordinates_round_trip() {
        let a1: Position = "a1".parse().unwrap();
        assert_eq!((a1.row(), a1.col()), (1, 1));
        assert_eq!(a1.to_string(), "a1");

        let e4: Position = "e4".parse().unwrap();
        assert_eq!(e4, Position::new(4, 5));

        for pos in Position::all() {
            assert_eq!(pos.to_string().parse::<Position>().unwrap(), pos);
        }
    }

    #[test]
    fn rejects_squares_off_the_board() {
        assert!("i1".parse::<Position>().is_err());
        assert!("a9".parse::<Position>().is_err());
        assert!("a".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn offset_stays_on_board() {
        let h8 = Position::new(8, 8);
        assert_eq!(h8.offset(1, 0), None);
        assert_eq!(h8.offset(-1, -1), Some(Position::new(7, 7)));
    }

    #[test]
    fn move_wire_shape() {
        let json = r#"{"startPosition":{"row":7,"col":1},"endPosition":{"row":8,"col":1},"promotionPiece":"QUEEN"}"#;
        let mv: Move = serde_json::from_str(json).unwrap();
        assert_eq!(mv.promotion_piece, Some(PieceType::Queen));
        assert_eq!(mv.to_string(), "a7 to a8=Q");

        let plain = r#"{"startPosition":{"row":2,"col":5},"endPosition":{"row":4,"col":5}}"#;
        let mv: Move = serde_json::from_str(plain).unwrap();
        assert_eq!(mv, Move::new(Position::new(2, 5), Position::new(4, 5)));
    }

    #[test]
    fn off_board_wire_position_is_rejected() {
        let json = r#"{"row":0,"col":3}"#;
        assert!(serde_json::from_str::<Position>(json).is_err());
    }
}
