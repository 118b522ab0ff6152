//! Live multiplayer chess: a rules engine plus the session layer that lets
//! two players and any number of observers share one game over websockets.

pub mod types;
pub mod error;
pub mod board;
pub mod movegen;
pub mod game;
pub mod session;
pub mod store;
pub mod messages;
pub mod connections;
pub mod coordinator;
pub mod config;
pub mod server;

pub use board::Board;
pub use config::AppConfig;
pub use connections::{Connection, ConnectionRegistry};
pub use coordinator::SessionCoordinator;
pub use error::{ChessError, MoveError, RepositoryError, SessionError, TransportError};
pub use game::Game;
pub use messages::{CommandKind, ServerMessage, UserGameCommand};
pub use server::start_server;
pub use session::{GameSession, SharedSession};
pub use store::{AuthVerifier, GameRepository, MemoryAuthAccess, MemoryGameAccess};
pub use types::*;
