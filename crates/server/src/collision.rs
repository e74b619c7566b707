//! Collision detection and scoring.
//!
//! This module decides, after every movement step:
//! - Head-to-head crashes (both cycles on one cell)
//! - Trail crashes (a head on any collidable trail cell, own or opponent's)
//! - Who scores when exactly one cycle went down

use crate::player::Player;
use protocol::{Coordinate, PlayerId};
use std::collections::HashSet;

/// Outcome of one collision pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Players that crashed this tick, in slot order.
    pub killed: Vec<PlayerId>,
    /// Survivor awarded a point, if exactly one player crashed.
    pub scorer: Option<PlayerId>,
}

impl Verdict {
    pub fn any_death(&self) -> bool {
        !self.killed.is_empty()
    }
}

/// Check post-move positions against each other and against every trail.
///
/// `players` must be in slot order. Only living players can crash; trails of
/// dead players still count as obstacles. Index 0 of each trail is ignored.
pub fn detect(players: &[&Player]) -> Verdict {
    let mut killed: Vec<PlayerId> = Vec::new();
    let mut mark = |id: PlayerId| {
        if !killed.contains(&id) {
            killed.push(id);
        }
    };

    let alive: Vec<&Player> = players.iter().copied().filter(|p| p.is_alive()).collect();

    for (i, a) in alive.iter().enumerate() {
        for b in &alive[i + 1..] {
            if a.position == b.position {
                mark(a.id);
                mark(b.id);
            }
        }
    }

    let trail_cells: HashSet<Coordinate> =
        players.iter().flat_map(|p| p.trail.collidable()).collect();
    for player in &alive {
        if trail_cells.contains(&player.position) {
            mark(player.id);
        }
    }

    killed.sort();

    let scorer = if killed.len() == 1 {
        let mut survivors = alive.iter().filter(|p| !killed.contains(&p.id));
        match (survivors.next(), survivors.next()) {
            (Some(survivor), None) => Some(survivor.id),
            _ => None,
        }
    } else {
        None
    };

    Verdict { killed, scorer }
}
