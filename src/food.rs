use std::collections::HashSet;

use glam::Vec3;
use rand::Rng;

use crate::grid::GridPosition;

/// A consumable target sitting on one tile.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Target {
    pub position: GridPosition,
}

impl Target {
    #[must_use]
    pub fn new(position: GridPosition) -> Self {
        Self { position }
    }

    /// Tile centre in world space.
    #[must_use]
    pub fn world_position(self) -> Vec3 {
        self.position.to_world()
    }
}

/// Picks a uniformly random candidate tile that is not blocked.
///
/// Returns `None` when every candidate is blocked.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[GridPosition],
    blocked: &HashSet<GridPosition>,
) -> Option<GridPosition> {
    let free: Vec<GridPosition> = candidates
        .iter()
        .copied()
        .filter(|position| !blocked.contains(position))
        .collect();

    if free.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..free.len());
    Some(free[index])
}
