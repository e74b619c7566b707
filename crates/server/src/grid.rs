//! Toroidal arena geometry.
//!
//! The arena is a fixed 48x24 grid. Leaving one edge re-enters at the opposite
//! edge, so every stored coordinate stays inside `[0, WIDTH) x [0, HEIGHT)`.

use protocol::{Coordinate, Direction};

pub const WIDTH: i32 = 48;
pub const HEIGHT: i32 = 24;

/// Fold any coordinate back onto the grid.
#[inline]
pub fn wrap(coordinate: Coordinate) -> Coordinate {
    Coordinate::new(coordinate.x.rem_euclid(WIDTH), coordinate.y.rem_euclid(HEIGHT))
}

/// The cell one step from `from` in `direction`, wrapped.
#[inline]
pub fn step(from: Coordinate, direction: Direction) -> Coordinate {
    let (dx, dy) = direction.offset();
    wrap(Coordinate::new(from.x + dx, from.y + dy))
}

/// Whether a coordinate is already normalized.
pub fn contains(coordinate: Coordinate) -> bool {
    (0..WIDTH).contains(&coordinate.x) && (0..HEIGHT).contains(&coordinate.y)
}
