//////////////////////////
// store.rs
//////////////////////////

//! The collaborators the coordinator calls out to: credential lookup and
//! game storage. The in-memory versions back the binary and the tests.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{RepositoryError, SessionError};
use crate::session::{GameSession, SharedSession};
use crate::types::{Color, GameId};

/// Resolves a session credential to a username.
pub trait AuthVerifier: Send + Sync {
    fn verify(&self, auth_token: &str) -> Option<String>;
}

/// Storage of record for game sessions.
///
/// The slot and game-over operations receive the session already locked by
/// the caller. They either apply the change and persist it, or leave the
/// session untouched and return the error.
pub trait GameRepository: Send + Sync {
    fn find(&self, game_id: GameId) -> Option<SharedSession>;

    fn persist(&self, session: &GameSession) -> Result<(), RepositoryError>;

    fn clear_player_slot(
        &self,
        session: &mut GameSession,
        color: Color,
    ) -> Result<(), RepositoryError> {
        let mut updated = session.clone();
        updated.clear_slot(color);
        self.persist(&updated)?;
        *session = updated;
        Ok(())
    }

    fn mark_over(&self, session: &mut GameSession) -> Result<(), RepositoryError> {
        let mut updated = session.clone();
        updated.mark_over();
        self.persist(&updated)?;
        *session = updated;
        Ok(())
    }
}

// ---------- AUTH ----------

#[derive(Default)]
pub struct MemoryAuthAccess {
    tokens: DashMap<String, String>,
}

impl MemoryAuthAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for `username`.
    pub fn add_auth(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    pub fn delete_auth(&self, auth_token: &str) -> bool {
        self.tokens.remove(auth_token).is_some()
    }
}

impl AuthVerifier for MemoryAuthAccess {
    fn verify(&self, auth_token: &str) -> Option<String> {
        self.tokens.get(auth_token).map(|entry| entry.value().clone())
    }
}

// ---------- GAMES ----------

pub struct MemoryGameAccess {
    games: DashMap<GameId, SharedSession>,
    next_id: AtomicU32,
}

impl Default for MemoryGameAccess {
    fn default() -> Self {
        MemoryGameAccess {
            games: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }
}

impl MemoryGameAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a game in the opening position with both slots empty.
    pub fn create_game(&self, game_name: &str) -> GameId {
        let game_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let session = GameSession::new(game_id, game_name);
        self.games.insert(game_id, Arc::new(Mutex::new(session)));
        game_id
    }

    /// Snapshots of every game, ordered by id.
    pub async fn list_games(&self) -> Vec<GameSession> {
        let shared: Vec<SharedSession> =
            self.games.iter().map(|entry| entry.value().clone()).collect();
        let mut games = Vec::with_capacity(shared.len());
        for session in shared {
            games.push(session.lock().await.clone());
        }
        games.sort_by_key(|g| g.game_id);
        games
    }

    /// Puts `username` in the `color` slot of a game.
    pub async fn join_game(
        &self,
        game_id: GameId,
        color: Color,
        username: &str,
    ) -> Result<(), SessionError> {
        let session = self.find(game_id).ok_or(SessionError::NotFound(game_id))?;
        let mut session = session.lock().await;
        session.claim_slot(color, username)
    }
}

impl GameRepository for MemoryGameAccess {
    fn find(&self, game_id: GameId) -> Option<SharedSession> {
        self.games.get(&game_id).map(|entry| entry.value().clone())
    }

    // The map holds the live session, so a stored game is already current.
    fn persist(&self, session: &GameSession) -> Result<(), RepositoryError> {
        if self.games.contains_key(&session.game_id) {
            Ok(())
        } else {
            Err(RepositoryError::UnknownGame(session.game_id))
        }
    }
}
