//////////////////////////
// session.rs
//////////////////////////

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::SessionError;
use crate::game::Game;
use crate::types::{Color, GameId, Role};

/// A game as the server knows it: the engine state plus who is playing.
///
/// Player slots are set once. Filling an occupied slot is refused; a slot
/// only becomes free again when its player leaves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: Game,
}

/// A session behind its game's lock. Everything that changes a game or its
/// slots goes through this lock, one command at a time.
pub type SharedSession = Arc<Mutex<GameSession>>;

impl GameSession {
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        GameSession {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.into(),
            game: Game::new(),
        }
    }

    pub fn player(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    /// White is checked first, so a user holding both slots plays white.
    pub fn role_of(&self, username: &str) -> Role {
        if self.white_username.as_deref() == Some(username) {
            Role::Player(Color::White)
        } else if self.black_username.as_deref() == Some(username) {
            Role::Player(Color::Black)
        } else {
            Role::Observer
        }
    }

    pub fn claim_slot(&mut self, color: Color, username: &str) -> Result<(), SessionError> {
        let slot = self.slot_mut(color);
        if slot.is_some() {
            return Err(SessionError::AlreadyTaken(color));
        }
        *slot = Some(username.to_string());
        Ok(())
    }

    pub fn clear_slot(&mut self, color: Color) {
        *self.slot_mut(color) = None;
    }

    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    pub fn mark_over(&mut self) {
        self.game.mark_over();
    }

    fn slot_mut(&mut self, color: Color) -> &mut Option<String> {
        match color {
            Color::White => &mut self.white_username,
            Color::Black => &mut self.black_username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_open_slots() {
        let session = GameSession::new(1, "friday blitz");
        assert_eq!(session.player(Color::White), None);
        assert_eq!(session.player(Color::Black), None);
        assert!(!session.is_over());
        assert_eq!(session.role_of("anyone"), Role::Observer);
    }

    #[test]
    fn slots_are_set_once() {
        let mut session = GameSession::new(1, "g");
        session.claim_slot(Color::White, "alice").unwrap();
        let err = session.claim_slot(Color::White, "bob").unwrap_err();
        assert!(matches!(err, SessionError::AlreadyTaken(Color::White)));
        assert_eq!(session.player(Color::White), Some("alice"));
        assert_eq!(session.role_of("alice"), Role::Player(Color::White));

        session.clear_slot(Color::White);
        session.claim_slot(Color::White, "bob").unwrap();
        assert_eq!(session.role_of("bob"), Role::Player(Color::White));
    }

    #[test]
    fn snapshot_uses_wire_field_names() {
        let mut session = GameSession::new(7, "g");
        session.claim_slot(Color::Black, "bob").unwrap();
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["gameID"], 7);
        assert_eq!(value["blackUsername"], "bob");
        assert!(value["whiteUsername"].is_null());
        assert_eq!(value["game"]["turn"], "WHITE");
        assert_eq!(value["game"]["gameOver"], false);
        assert_eq!(value["game"]["board"]["squares"][0][4]["type"], "KING");
    }
}
