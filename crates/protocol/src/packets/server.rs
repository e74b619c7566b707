//! Server -> Client message bodies.

use crate::{Coordinate, Direction, PlayerId, Status, TrailSegment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tells a connection which slot it controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAssignment {
    pub player_id: PlayerId,
}

/// One player as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player_id: PlayerId,
    pub position: Coordinate,
    pub direction: Direction,
    pub trail: Vec<TrailSegment>,
    pub status: Status,
    pub points: u32,
}

/// Full match snapshot, sent once per tick (or per countdown second).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    /// Keyed by slot id; `BTreeMap` keeps slot order on the wire.
    pub players: BTreeMap<PlayerId, PlayerState>,
    pub tick: u64,
    /// Seconds left before the round starts.
    pub countdown: u32,
}
