//////////////////////////
// main.rs
//////////////////////////

use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use live_chess::{
    start_server, AppConfig, ConnectionRegistry, MemoryAuthAccess, MemoryGameAccess,
    SessionCoordinator,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    let auth = Arc::new(MemoryAuthAccess::new());
    for username in &config.users {
        let token = auth.add_auth(username);
        info!("Issued token for {}: {}", username, token);
    }

    let games = Arc::new(MemoryGameAccess::new());
    for name in &config.games {
        let game_id = games.create_game(name);
        info!("Created game {} ({})", game_id, name);
    }

    let coordinator = Arc::new(SessionCoordinator::new(
        auth,
        games,
        Arc::new(ConnectionRegistry::new()),
    ));

    start_server(&config, coordinator).await?;
    info!("Server stopped");
    Ok(())
}
