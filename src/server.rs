//////////////////////////
// server.rs
//////////////////////////

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::sync::Arc;
use warp::ws::{Message, WebSocket, Ws};
use warp::Filter;

use crate::config::AppConfig;
use crate::connections::Connection;
use crate::coordinator::SessionCoordinator;

/// The websocket route, `GET /<ws_path>`.
pub fn routes(
    coordinator: Arc<SessionCoordinator>,
    ws_path: String,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let coordinator = warp::any().map(move || coordinator.clone());

    warp::path(ws_path)
        .and(warp::path::end())
        .and(warp::ws())
        .and(coordinator)
        .map(|ws: Ws, coordinator: Arc<SessionCoordinator>| {
            ws.on_upgrade(move |socket| handle_connection(socket, coordinator))
        })
}

/// Serves until Ctrl-C.
pub async fn start_server(config: &AppConfig, coordinator: Arc<SessionCoordinator>) -> Result<()> {
    let routes = routes(coordinator, config.ws_path.clone());

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(config.bind_addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Shutting down");
        })
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Chess server started on ws://{}/{}", addr, config.ws_path);
    server.await;
    Ok(())
}

async fn handle_connection(ws: WebSocket, coordinator: Arc<SessionCoordinator>) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (connection, mut outbox) = Connection::channel();
    let client_id = connection.id();
    info!("New client connected: {}", client_id);

    // Everything addressed to this client, replies and broadcasts alike,
    // is written here in the order it was queued.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbox.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    error!("Could not encode message for {}: {}", client_id, e);
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::text(text)).await {
                debug!("Send to {} failed: {}", client_id, e);
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!("WebSocket error on {}: {}", client_id, e);
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        let text = match msg.to_str() {
            Ok(text) => text,
            Err(_) => continue,
        };
        coordinator.handle_text(text, &connection).await;
    }

    // Dropping the outbox closes the handle the registry may still hold;
    // the next broadcast to this game prunes it.
    writer.abort();
    info!("Client {} disconnected", client_id);
}
