//! Shared protocol crate for the light cycles server.
//!
//! This crate contains:
//! - The JSON message envelope and its bodies
//! - Shared types (Direction, Coordinate, PlayerId, etc.)

mod error;
pub mod packets;

pub use error::ProtocolError;
pub use packets::{
    GameCommand, GameState, Message, PlayerAssignment, PlayerInput, PlayerState, decode, encode,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading of a light cycle. Encoded on the wire as 0=UP, 1=DOWN, 2=LEFT, 3=RIGHT.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// The heading pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step for this heading. Y grows downwards.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            other => Err(ProtocolError::InvalidDirection(other)),
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction as u8
    }
}

/// Integer grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One cell of a trail and the heading the cycle had when it left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailSegment {
    #[serde(rename = "position")]
    pub coordinate: Coordinate,
    pub direction: Direction,
}

/// Fixed player slot. The first connection gets `player_1`, the second `player_2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "player_1")]
    Player1,
    #[serde(rename = "player_2")]
    Player2,
}

impl PlayerId {
    /// Every slot, in assignment and evaluation order.
    pub const ALL: [PlayerId; 2] = [PlayerId::Player1, PlayerId::Player2];

    pub const fn index(self) -> usize {
        match self {
            PlayerId::Player1 => 0,
            PlayerId::Player2 => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PlayerId::Player1 => "player_1",
            PlayerId::Player2 => "player_2",
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a cycle is still racing. Serialized as `"alive"` / `"DEAD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "alive")]
    Alive,
    #[serde(rename = "DEAD")]
    Dead,
}
