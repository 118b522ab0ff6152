//////////////////////////
// messages.rs
//////////////////////////

// Types for WebSocket communication

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::session::GameSession;
use crate::types::{GameId, Move};

/// A command sent by a client. Role is never part of it; the server works
/// that out from the credential.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserGameCommand {
    #[serde(flatten)]
    pub kind: CommandKind,
    #[serde(rename = "authToken")]
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "commandType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    Connect,
    MakeMove {
        #[serde(rename = "move", default)]
        chess_move: Option<Move>,
    },
    Leave,
    Resign,
}

impl UserGameCommand {
    pub fn new(kind: CommandKind, auth_token: impl Into<String>, game_id: GameId) -> Self {
        UserGameCommand {
            kind,
            auth_token: auth_token.into(),
            game_id,
        }
    }

    pub fn parse(text: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    LoadGame {
        game: GameSession,
    },
    Notification {
        message: String,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn load_game(session: &GameSession) -> Self {
        ServerMessage::LoadGame {
            game: session.clone(),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }

    pub fn error(err: &SessionError) -> Self {
        ServerMessage::Error {
            error_message: err.to_string(),
        }
    }
}
