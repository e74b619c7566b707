//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Smallest player-input queue the server accepts; bursts of turns from a
/// laggy client must not stall its reader.
pub const MIN_INPUT_BUFFER: usize = 50;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl Config {
    /// Load configuration from `path`, or write and use defaults if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Networking settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The single WebSocket path clients connect to.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            path: default_path(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_path() -> String {
    "/".to_string()
}

/// Match timing and channel sizing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameConfig {
    /// Simulation tick interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Seconds counted down before a round starts running.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
    /// Capacity of the shared player-input queue.
    #[serde(default = "default_input_buffer")]
    pub input_buffer: usize,
    /// Capacity of the tick loop -> broadcaster queue.
    #[serde(default = "default_snapshot_buffer")]
    pub snapshot_buffer: usize,
    /// Capacity of each connection's outbound queue.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl GameConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn input_capacity(&self) -> usize {
        self.input_buffer.max(MIN_INPUT_BUFFER)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            countdown_secs: default_countdown_secs(),
            input_buffer: default_input_buffer(),
            snapshot_buffer: default_snapshot_buffer(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn default_tick_interval() -> u64 {
    100
}
fn default_countdown_secs() -> u32 {
    10
}
fn default_input_buffer() -> usize {
    MIN_INPUT_BUFFER
}
fn default_snapshot_buffer() -> usize {
    32
}
fn default_outbound_buffer() -> usize {
    64
}
