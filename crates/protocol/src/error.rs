//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while decoding or encoding messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message has no type tag")]
    MissingType,

    #[error("Invalid direction: {0}")]
    InvalidDirection(u8),
}
