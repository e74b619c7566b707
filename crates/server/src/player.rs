//! Light cycle state for one player slot.

use crate::grid;
use crate::server::client::ClientHandle;
use crate::trail::Trail;
use protocol::{Coordinate, Direction, PlayerId, PlayerState, Status, TrailSegment};

/// Row both cycles spawn on.
pub const SPAWN_ROW: i32 = 15;

/// Where a slot starts a round: head position, heading and ghost cell.
pub fn spawn_point(id: PlayerId) -> (Coordinate, Direction, Coordinate) {
    match id {
        PlayerId::Player1 => (
            Coordinate::new(1, SPAWN_ROW),
            Direction::Right,
            Coordinate::new(0, SPAWN_ROW),
        ),
        PlayerId::Player2 => (
            Coordinate::new(grid::WIDTH - 1, SPAWN_ROW),
            Direction::Left,
            Coordinate::new(grid::WIDTH - 2, SPAWN_ROW),
        ),
    }
}

/// A turn is legal unless it reverses straight into the cycle's own trail.
#[inline]
pub fn is_legal_turn(current: Direction, requested: Direction) -> bool {
    requested != current.opposite()
}

/// A player's cycle, owned by the match.
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub position: Coordinate,
    pub direction: Direction,
    pub trail: Trail,
    pub status: Status,
    pub points: u32,
    client: ClientHandle,
}

impl Player {
    /// Create a player at its slot's spawn point.
    pub fn spawn(id: PlayerId, points: u32, client: ClientHandle) -> Self {
        let (position, direction, ghost) = spawn_point(id);
        Self {
            id,
            position,
            direction,
            trail: Trail::with_ghost(TrailSegment {
                coordinate: ghost,
                direction,
            }),
            status: Status::Alive,
            points,
            client,
        }
    }

    /// Put the cycle back on its spawn point. Points and transport are kept.
    pub fn reset(&mut self) {
        let (position, direction, ghost) = spawn_point(self.id);
        self.position = position;
        self.direction = direction;
        self.trail = Trail::with_ghost(TrailSegment {
            coordinate: ghost,
            direction,
        });
        self.status = Status::Alive;
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    pub fn kill(&mut self) {
        self.status = Status::Dead;
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }

    /// Lay a trail segment on the current cell, then move one cell forward.
    /// Dead cycles stay where they are.
    pub fn advance(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.trail.push(TrailSegment {
            coordinate: self.position,
            direction: self.direction,
        });
        self.position = grid::step(self.position, self.direction);
        debug_assert!(grid::contains(self.position), "{:?} left the grid", self.position);
    }

    pub fn state(&self) -> PlayerState {
        PlayerState {
            player_id: self.id,
            position: self.position,
            direction: self.direction,
            trail: self.trail.to_vec(),
            status: self.status,
            points: self.points,
        }
    }
}
