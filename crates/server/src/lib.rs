//! Authoritative light cycles match server library.

pub mod collision;
pub mod config;
pub mod grid;
pub mod player;
pub mod server;
pub mod trail;

// Re-export commonly used types
pub use config::Config;
pub use server::{GameHandle, JoinError, Phase, run, serve};
