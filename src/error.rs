//////////////////////////
// error.rs
//////////////////////////

use thiserror::Error;

use crate::types::{Color, GameId, Move, Position};

/// Problems building board coordinates from outside input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("'{0}' is not a square between a1 and h8")]
    InvalidSquare(String),

    #[error("position ({row}, {col}) is off the board")]
    OffBoard { row: i64, col: i64 },
}

/// Why the engine refused a move. Every variant is an illegal move.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no move given")]
    MissingMove,

    #[error("no piece at {0}")]
    NoPieceAtSource(Position),

    #[error("it is {turn}'s turn")]
    WrongTurn { turn: Color },

    #[error("invalid promotion for {0}")]
    InvalidPromotion(Move),

    #[error("{0} is not allowed")]
    NotAllowed(Move),
}

/// Failure reported by a game repository.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("no game with gameID {0}")]
    UnknownGame(GameId),

    #[error("{0}")]
    Unavailable(String),
}

/// Every way a command can be refused. Rendered straight into the text of
/// the requester's ERROR message.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Error: unauthorized")]
    Unauthorized,

    #[error("Error: cannot {0}")]
    Forbidden(String),

    #[error("Error: no game with gameID {0}")]
    NotFound(GameId),

    #[error("Error: invalid move ({0})")]
    IllegalMove(#[from] MoveError),

    #[error("Error: cannot {0} finished game")]
    GameOver(&'static str),

    #[error("Error: {0} is already taken")]
    AlreadyTaken(Color),

    #[error("Error: could not {action} ({source})")]
    Storage {
        action: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("Error: malformed command ({0})")]
    Malformed(#[from] serde_json::Error),
}

/// The socket behind a registry entry is gone.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("connection closed")]
pub struct TransportError;
