//////////////////////////
// connections.rs
//////////////////////////

use dashmap::DashMap;
use log::debug;
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::TransportError;
use crate::messages::ServerMessage;
use crate::types::GameId;

/// Handle to one client socket. Messages go into a channel that the
/// socket's writer task drains; once that task is gone the handle is closed.
#[derive(Clone, Debug)]
pub struct Connection {
    id: Uuid,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    pub fn new(tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Connection {
            id: Uuid::new_v4(),
            tx,
        }
    }

    /// A connection plus the receiving end its writer would own.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Connection::new(tx), rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    pub fn send(&self, message: ServerMessage) -> Result<(), TransportError> {
        self.tx.send(message).map_err(|_| TransportError)
    }
}

/// Live connections per game, keyed by username.
///
/// Each game's set sits behind its own map shard, so games do not contend
/// with each other and a broadcast never sees a half-updated set.
#[derive(Default)]
pub struct ConnectionRegistry {
    games: DashMap<GameId, HashMap<String, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `connection` for `identity`, replacing any previous one.
    pub fn add(&self, game_id: GameId, identity: &str, connection: Connection) {
        self.games
            .entry(game_id)
            .or_default()
            .insert(identity.to_string(), connection);
    }

    pub fn remove(&self, game_id: GameId, identity: &str) {
        if let Some(mut members) = self.games.get_mut(&game_id) {
            members.remove(identity);
        }
        self.games.remove_if(&game_id, |_, members| members.is_empty());
    }

    /// Sends `message` to everyone in the game except `exclude`. Closed
    /// sockets are dropped from the registry on the way.
    pub fn broadcast(&self, game_id: GameId, exclude: Option<&str>, message: &ServerMessage) {
        if let Some(mut members) = self.games.get_mut(&game_id) {
            members.retain(|identity, connection| {
                if !connection.is_open() {
                    debug!("Pruning closed connection {} ({}) from game {}", connection.id(), identity, game_id);
                    return false;
                }
                if exclude == Some(identity.as_str()) {
                    return true;
                }
                match connection.send(message.clone()) {
                    Ok(()) => true,
                    Err(e) => {
                        debug!("Pruning {} from game {}: {}", identity, game_id, e);
                        false
                    }
                }
            });
        }
        self.games.remove_if(&game_id, |_, members| members.is_empty());
    }

    pub fn contains(&self, game_id: GameId, identity: &str) -> bool {
        self.games
            .get(&game_id)
            .map_or(false, |members| members.contains_key(identity))
    }

    /// Number of registered connections for a game, closed or not.
    pub fn count(&self, game_id: GameId) -> usize {
        self.games.get(&game_id).map_or(0, |members| members.len())
    }
}
