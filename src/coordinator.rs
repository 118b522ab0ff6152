//////////////////////////
// coordinator.rs
//////////////////////////

//! Turns client commands into game changes and the messages that announce
//! them.
//!
//! Every command resolves its credential, then its game, then locks that
//! game for the rest of its handling. Commands on one game therefore run
//! strictly one after another, while different games never wait on each
//! other. A refused command produces exactly one ERROR, sent only to the
//! client that issued it.

use log::{debug, info, warn};
use std::sync::Arc;

use crate::connections::{Connection, ConnectionRegistry};
use crate::error::{MoveError, SessionError};
use crate::messages::{CommandKind, ServerMessage, UserGameCommand};
use crate::session::GameSession;
use crate::store::{AuthVerifier, GameRepository};
use crate::types::{Move, Role};

pub struct SessionCoordinator {
    auth: Arc<dyn AuthVerifier>,
    games: Arc<dyn GameRepository>,
    connections: Arc<ConnectionRegistry>,
}

impl SessionCoordinator {
    pub fn new(
        auth: Arc<dyn AuthVerifier>,
        games: Arc<dyn GameRepository>,
        connections: Arc<ConnectionRegistry>,
    ) -> Self {
        SessionCoordinator {
            auth,
            games,
            connections,
        }
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Handles one text frame received on `connection`.
    pub async fn handle_text(&self, text: &str, connection: &Connection) {
        match UserGameCommand::parse(text) {
            Ok(command) => self.handle(command, connection).await,
            Err(e) => {
                warn!("Connection {} sent an unreadable command: {}", connection.id(), e);
                reply(connection, ServerMessage::error(&e));
            }
        }
    }

    pub async fn handle(&self, command: UserGameCommand, connection: &Connection) {
        let game_id = command.game_id;
        if let Err(e) = self.dispatch(command, connection).await {
            warn!("Rejected command on game {} from {}: {}", game_id, connection.id(), e);
            reply(connection, ServerMessage::error(&e));
        }
    }

    async fn dispatch(
        &self,
        command: UserGameCommand,
        connection: &Connection,
    ) -> Result<(), SessionError> {
        let username = self
            .auth
            .verify(&command.auth_token)
            .ok_or(SessionError::Unauthorized)?;
        let shared = self
            .games
            .find(command.game_id)
            .ok_or(SessionError::NotFound(command.game_id))?;

        let mut session = shared.lock().await;
        match command.kind {
            CommandKind::Connect => self.connect(&session, &username, connection),
            CommandKind::MakeMove { chess_move } => {
                self.make_move(&mut session, &username, chess_move)
            }
            CommandKind::Leave => self.leave(&mut session, &username),
            CommandKind::Resign => self.resign(&mut session, &username),
        }
    }

    fn connect(
        &self,
        session: &GameSession,
        username: &str,
        connection: &Connection,
    ) -> Result<(), SessionError> {
        let role = session.role_of(username);
        if role != Role::Observer && session.is_over() {
            return Err(SessionError::GameOver("join"));
        }

        self.connections.add(session.game_id, username, connection.clone());
        reply(connection, ServerMessage::load_game(session));

        info!("{} joined game {} as {}", username, session.game_id, role);
        self.connections.broadcast(
            session.game_id,
            Some(username),
            &ServerMessage::notification(format!("{} joined game as {}", username, role)),
        );
        Ok(())
    }

    fn make_move(
        &self,
        session: &mut GameSession,
        username: &str,
        chess_move: Option<Move>,
    ) -> Result<(), SessionError> {
        if session.is_over() {
            return Err(SessionError::GameOver("make a move on"));
        }

        let turn = session.game.turn();
        if session.player(turn) != Some(username) {
            return Err(match session.role_of(username) {
                Role::Observer => SessionError::Forbidden("make a move as observer".into()),
                Role::Player(_) => SessionError::Forbidden(format!("make a move on {}'s turn", turn)),
            });
        }

        let mv = chess_move.ok_or(MoveError::MissingMove)?;

        // Work on a copy so a storage failure leaves the live game untouched.
        let mut updated = session.clone();
        updated.game.make_move(mv)?;

        let next = updated.game.turn();
        let checkmate = updated.game.is_in_checkmate(next);
        let stalemate = !checkmate && updated.game.is_in_stalemate(next);
        if checkmate || stalemate {
            updated.mark_over();
        }

        self.games
            .persist(&updated)
            .map_err(|source| SessionError::Storage {
                action: "make move",
                source,
            })?;
        *session = updated;

        let game_id = session.game_id;
        info!("{} played {} in game {}", username, mv, game_id);
        debug!("Game {} now:\n{}", game_id, session.game);
        self.connections.broadcast(
            game_id,
            Some(username),
            &ServerMessage::notification(format!("{} made move: {}", username, mv)),
        );

        if checkmate {
            info!("Game {} over: {} is checkmated", game_id, next);
            self.connections.broadcast(
                game_id,
                None,
                &ServerMessage::notification(format!(
                    "{} is in checkmate - {} wins!",
                    next, username
                )),
            );
        } else if stalemate {
            info!("Game {} over: {} is stalemated", game_id, next);
            self.connections.broadcast(
                game_id,
                None,
                &ServerMessage::notification(format!(
                    "{} is in stalemate - the game is a draw",
                    next
                )),
            );
        }

        self.connections
            .broadcast(game_id, None, &ServerMessage::load_game(session));
        Ok(())
    }

    fn resign(&self, session: &mut GameSession, username: &str) -> Result<(), SessionError> {
        if session.is_over() {
            return Err(SessionError::GameOver("resign"));
        }
        let color = match session.role_of(username) {
            Role::Player(color) => color,
            Role::Observer => return Err(SessionError::Forbidden("resign as observer".into())),
        };

        self.games
            .mark_over(session)
            .map_err(|source| SessionError::Storage {
                action: "resign",
                source,
            })?;

        info!("{} resigned game {} as {}", username, session.game_id, color);
        self.connections.broadcast(
            session.game_id,
            None,
            &ServerMessage::notification(format!(
                "{} has resigned as {} - {} wins!",
                username,
                color,
                color.opposite()
            )),
        );
        Ok(())
    }

    fn leave(&self, session: &mut GameSession, username: &str) -> Result<(), SessionError> {
        let role = session.role_of(username);
        if let Role::Player(color) = role {
            self.games
                .clear_player_slot(session, color)
                .map_err(|source| SessionError::Storage {
                    action: "leave game",
                    source,
                })?;
        }

        self.connections.remove(session.game_id, username);

        info!("{} left game {} ({})", username, session.game_id, role);
        self.connections.broadcast(
            session.game_id,
            Some(username),
            &ServerMessage::notification(format!("{} ({}) has left the game", username, role)),
        );
        Ok(())
    }
}

/// Sends to one client. A dead socket here is not worth reporting; the
/// registry drops it on the next broadcast.
fn reply(connection: &Connection, message: ServerMessage) {
    if connection.send(message).is_err() {
        warn!("Could not reply to closed connection {}", connection.id());
    }
}
