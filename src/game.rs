//////////////////////////
// game.rs
//////////////////////////

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Board;
use crate::error::MoveError;
use crate::movegen::piece_moves;
use crate::types::{Color, Move, Piece, PieceType, Position};

/// One chess game: the board it owns, whose turn it is and whether the game
/// has ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    #[serde(rename = "gameOver")]
    game_over: bool,
}

/// What `apply` needs to put a square pair back the way it was.
#[derive(Clone, Copy, Debug)]
struct Undo {
    moved: Piece,
    captured: Option<Piece>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Game::from_board(Board::starting(), Color::White)
    }

    /// A game in progress from an arbitrary position.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Game {
            board,
            turn,
            game_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Ends the game. There is no way back.
    pub fn mark_over(&mut self) {
        self.game_over = true;
    }

    /// Legal moves for the piece on `pos`, or `None` if the square is empty.
    ///
    /// Each pseudo-legal candidate is played on a scratch board, the mover's
    /// king is tested, and the candidate is taken back before the next one.
    pub fn valid_moves(&self, pos: Position) -> Option<Vec<Move>> {
        let piece = self.board.get_piece(pos)?;
        let mut scratch = self.board.clone();

        let legal = piece_moves(&self.board, pos)
            .into_iter()
            .filter(|mv| {
                let undo = apply(&mut scratch, mv, piece);
                let exposed = king_attacked(&scratch, piece.color);
                revert(&mut scratch, mv, undo);
                !exposed
            })
            .collect();
        Some(legal)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        king_attacked(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_any_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_any_move(color)
    }

    /// Plays `mv` for the side to move and hands the turn over.
    pub fn make_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let from = mv.start_position;
        let piece = self
            .board
            .get_piece(from)
            .ok_or(MoveError::NoPieceAtSource(from))?;

        if piece.color != self.turn {
            return Err(MoveError::WrongTurn { turn: self.turn });
        }

        let promotes = piece.piece_type == PieceType::Pawn
            && mv.end_position.row() == piece.color.promotion_rank();
        if promotes != mv.promotion_piece.is_some() {
            return Err(MoveError::InvalidPromotion(mv));
        }

        let allowed = self
            .valid_moves(from)
            .map_or(false, |moves| moves.contains(&mv));
        if !allowed {
            return Err(MoveError::NotAllowed(mv));
        }

        apply(&mut self.board, &mv, piece);
        self.turn = self.turn.opposite();
        Ok(())
    }

    fn has_any_move(&self, color: Color) -> bool {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.color == color)
            .any(|(pos, _)| self.valid_moves(pos).map_or(false, |m| !m.is_empty()))
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(f, "\nTurn: {}", self.turn)
    }
}

/// Moves `moved` (promoting it if the move says so) and returns what is
/// needed to undo it.
fn apply(board: &mut Board, mv: &Move, moved: Piece) -> Undo {
    let captured = board.get_piece(mv.end_position);

    let landing = match mv.promotion_piece {
        Some(piece_type) => Piece::new(moved.color, piece_type),
        None => moved,
    };
    board.add_piece(mv.end_position, Some(landing));
    board.add_piece(mv.start_position, None);

    Undo { moved, captured }
}

fn revert(board: &mut Board, mv: &Move, undo: Undo) {
    board.add_piece(mv.start_position, Some(undo.moved));
    board.add_piece(mv.end_position, undo.captured);
}

/// True if any piece of the other color can reach `color`'s king.
fn king_attacked(board: &Board, color: Color) -> bool {
    let king = match board.find_king(color) {
        Some(pos) => pos,
        None => return false,
    };

    board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(pos, _)| {
            piece_moves(board, pos)
                .iter()
                .any(|mv| mv.end_position == king)
        })
}
