//////////////////////////
// movegen.rs
//////////////////////////

//! Pseudo-legal move generation. Nothing here looks at whether a move
//! leaves the mover's own king attacked; `Game` filters for that.

use crate::board::Board;
use crate::types::{Color, Move, PieceType, Position};

// Constants for piece movements
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];
const KNIGHT_MOVES: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// Every pseudo-legal move for the piece on `from`. Empty if the square is
/// empty.
pub fn piece_moves(board: &Board, from: Position) -> Vec<Move> {
    let piece = match board.get_piece(from) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut moves = Vec::new();
    match piece.piece_type {
        PieceType::King => step_moves(board, from, piece.color, &KING_STEPS, &mut moves),
        PieceType::Knight => step_moves(board, from, piece.color, &KNIGHT_MOVES, &mut moves),
        PieceType::Bishop => ray_moves(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves),
        PieceType::Rook => ray_moves(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves),
        PieceType::Queen => {
            ray_moves(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves);
            ray_moves(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves);
        }
        PieceType::Pawn => pawn_moves(board, from, piece.color, &mut moves),
    }
    moves
}

/// True if `to` can be entered by a piece of `color`: empty, or holding an
/// opposing piece when the step may capture.
fn reachable(board: &Board, to: Position, color: Color, can_capture: bool) -> bool {
    match board.get_piece(to) {
        None => true,
        Some(occupant) => can_capture && occupant.color != color,
    }
}

fn step_moves(
    board: &Board,
    from: Position,
    color: Color,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for (dr, dc) in steps {
        if let Some(to) = from.offset(*dr, *dc) {
            if reachable(board, to, color, true) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn ray_moves(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for (dr, dc) in directions {
        let mut current = from;
        while let Some(to) = current.offset(*dr, *dc) {
            match board.get_piece(to) {
                None => moves.push(Move::new(from, to)),
                Some(occupant) => {
                    if occupant.color != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

fn pawn_moves(board: &Board, from: Position, color: Color, moves: &mut Vec<Move>) {
    let forward = color.forward();

    if let Some(one) = from.offset(forward, 0) {
        if reachable(board, one, color, false) {
            push_pawn_move(from, one, color, moves);

            if from.row() == color.pawn_rank() {
                if let Some(two) = from.offset(2 * forward, 0) {
                    if reachable(board, two, color, false) {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        // offset() drops diagonals off either edge before the board is read
        if let Some(diagonal) = from.offset(forward, dc) {
            if matches!(board.get_piece(diagonal), Some(target) if target.color != color) {
                push_pawn_move(from, diagonal, color, moves);
            }
        }
    }
}

fn push_pawn_move(from: Position, to: Position, color: Color, moves: &mut Vec<Move>) {
    if to.row() == color.promotion_rank() {
        for promotion in PieceType::PROMOTIONS {
            moves.push(Move::promoting(from, to, promotion));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}
