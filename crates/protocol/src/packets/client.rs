//! Client -> Server message bodies.

use crate::{Direction, PlayerId};
use serde::{Deserialize, Serialize};

/// Request to steer a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub player_id: PlayerId,
    pub direction: Direction,
}

/// Administrative command. Only `start` is recognized by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCommand {
    pub command: String,
}

impl GameCommand {
    pub const START: &'static str = "start";

    pub fn start() -> Self {
        Self {
            command: Self::START.to_string(),
        }
    }

    /// Exact match on the command text.
    pub fn is_start(&self) -> bool {
        self.command == Self::START
    }
}
