//! Bounded trail buffer.

use protocol::{Coordinate, TrailSegment};
use std::collections::VecDeque;

/// Number of segments a cycle keeps behind it.
pub const TRAIL_CAPACITY: usize = 10;

/// FIFO of the most recent trail segments, oldest first.
///
/// Index 0 never counts for collisions. At spawn it holds the ghost segment
/// on the cell behind the cycle, which exists so the first rendered trail has
/// two points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    segments: VecDeque<TrailSegment>,
}

impl Trail {
    /// A trail holding only the ghost segment.
    pub fn with_ghost(ghost: TrailSegment) -> Self {
        let mut segments = VecDeque::with_capacity(TRAIL_CAPACITY + 1);
        segments.push_back(ghost);
        Self { segments }
    }

    /// Append a segment, evicting the oldest once the trail is over capacity.
    pub fn push(&mut self, segment: TrailSegment) {
        self.segments.push_back(segment);
        if self.segments.len() > TRAIL_CAPACITY {
            self.pop_oldest();
        }
    }

    /// Remove the oldest segment. `None` on an empty trail.
    pub fn pop_oldest(&mut self) -> Option<TrailSegment> {
        self.segments.pop_front()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Coordinates that kill on contact (everything but index 0).
    pub fn collidable(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.segments.iter().skip(1).map(|segment| segment.coordinate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailSegment> + '_ {
        self.segments.iter()
    }

    pub fn to_vec(&self) -> Vec<TrailSegment> {
        self.segments.iter().copied().collect()
    }
}
