//! Message definitions for the light cycles protocol.
//!
//! Every frame is a JSON object `{ "type": "<Kind>", "body": { ... } }`.
//! This module contains the envelope plus both client->server and
//! server->client bodies.

mod client;
mod server;

pub use client::*;
pub use server::*;

use crate::ProtocolError;
use serde::{Deserialize, Serialize};

/// The envelope shared by every direction of traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body")]
pub enum Message {
    /// Full match snapshot (server -> client).
    GameState(GameState),
    /// Slot assignment, sent once per connection (server -> client).
    PlayerAssignment(PlayerAssignment),
    /// Direction change request (client -> server).
    PlayerInput(PlayerInput),
    /// Administrative command such as `start` (client -> server).
    GameCommand(GameCommand),
}

impl Message {
    /// Every `type` tag this protocol understands.
    pub const KINDS: [&'static str; 4] = ["GameState", "PlayerAssignment", "PlayerInput", "GameCommand"];

    /// The `type` tag of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::GameState(_) => "GameState",
            Message::PlayerAssignment(_) => "PlayerAssignment",
            Message::PlayerInput(_) => "PlayerInput",
            Message::GameCommand(_) => "GameCommand",
        }
    }
}

/// Decode one text frame.
///
/// Returns `Ok(None)` for a well-formed envelope whose `type` is not known,
/// so callers can ignore it instead of treating it as an error.
pub fn decode(text: &str) -> Result<Option<Message>, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let known = match value.get("type").and_then(serde_json::Value::as_str) {
        Some(kind) => Message::KINDS.contains(&kind),
        None => return Err(ProtocolError::MissingType),
    };
    if !known {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

/// Encode one message as a text frame.
pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}
