//////////////////////////
// config.rs
//////////////////////////

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

pub const CONFIG_ENV: &str = "LIVE_CHESS_CONFIG";
pub const ADDR_ENV: &str = "LIVE_CHESS_ADDR";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Address the websocket server listens on.
    pub bind_addr: SocketAddr,
    /// Path segment of the websocket route, e.g. `ws` for `/ws`.
    pub ws_path: String,
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Usernames issued a token at startup, for local play.
    pub users: Vec<String>,
    /// Names of games created at startup.
    pub games: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            ws_path: "ws".to_string(),
            log_filter: "info".to_string(),
            users: Vec::new(),
            games: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid configuration JSON")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Defaults, then the JSON file (`path` or `LIVE_CHESS_CONFIG`), then
    /// `LIVE_CHESS_ADDR`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::resolve(
            path,
            std::env::var_os(CONFIG_ENV),
            std::env::var(ADDR_ENV).ok(),
        )
    }

    /// `load` with the environment passed in.
    pub fn resolve(
        path: Option<&Path>,
        env_path: Option<OsString>,
        env_addr: Option<String>,
    ) -> Result<Self> {
        let path = path.or_else(|| env_path.as_deref().map(Path::new));

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(addr) = env_addr {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("{} is not a socket address: {}", ADDR_ENV, addr))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// The websocket path must be a single non-empty segment.
    fn validate(&self) -> Result<()> {
        if self.ws_path.is_empty() || self.ws_path.contains('/') {
            bail!("ws_path must be a single path segment, got {:?}", self.ws_path);
        }
        Ok(())
    }
}
