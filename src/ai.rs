//! Path-following steering for computer-controlled snakes.

use std::iter;

use glam::Vec3;
use log::debug;

use crate::grid::{Direction, GridPosition, is_opposite, snap_to_tile};
use crate::motion::MotionController;
use crate::pathfinding::{NEIGHBOUR_ORDER, WalkableSet, find_tile_path};

/// Outcome of one [`AiAgent::think`] call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AiDecision {
    /// Still on the tile the last plan was made for.
    Waiting,
    /// No target, no path, or nowhere open to go.
    NoPlan,
    /// The path continues in the current direction.
    Straight,
    /// A turn was queued.
    Turn(Direction),
    /// The path starts with a reversal, which is never queued.
    ReversalSuppressed(Direction),
}

/// Plans once per completed tile and queues at most one turn per plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiAgent {
    last_planned_from: Option<GridPosition>,
}

impl AiAgent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-plans toward the nearest target when the head has entered a new tile.
    ///
    /// Turns only apply when the head completes its next tile, so the plan
    /// starts from that upcoming tile rather than the one just completed.
    pub fn think(
        &mut self,
        motion: &mut MotionController,
        targets: &[Vec3],
        walkable: &WalkableSet,
    ) -> AiDecision {
        let tile = motion.last_tile();
        let current = motion.direction();
        let upcoming = tile.step(current);
        if self.last_planned_from == Some(upcoming) {
            return AiDecision::Waiting;
        }
        self.last_planned_from = Some(upcoming);

        let Some(goal) = nearest_target(motion.last_tile_position(), targets) else {
            return AiDecision::NoPlan;
        };
        let goal = GridPosition::from_world(snap_to_tile(goal));

        let Some(path) = find_tile_path(upcoming, goal, walkable) else {
            return AiDecision::NoPlan;
        };
        // A target on the upcoming tile says nothing about where to go after it.
        let Some(next) =
            path_heading(&path).or_else(|| clear_heading(upcoming, current, walkable))
        else {
            return AiDecision::NoPlan;
        };
        if is_opposite(current, next) {
            debug!("ai at {tile:?} skips reversal {current:?} -> {next:?}");
            return AiDecision::ReversalSuppressed(next);
        }
        if next == current {
            return AiDecision::Straight;
        }

        motion.queue_turn(next);
        motion.face(next);
        AiDecision::Turn(next)
    }

    /// Forgets the last plan so the next call re-plans immediately.
    pub fn reset(&mut self) {
        self.last_planned_from = None;
    }
}

fn path_heading(path: &[GridPosition]) -> Option<Direction> {
    match path {
        [from, to, ..] => Some(step_direction(*from, *to)),
        _ => None,
    }
}

/// Keeps heading the same way out of `from` unless that runs into a
/// blocked tile, in which case the first open non-reversing side wins.
fn clear_heading(
    from: GridPosition,
    current: Direction,
    walkable: &WalkableSet,
) -> Option<Direction> {
    if current == Direction::None {
        return None;
    }
    iter::once(current)
        .chain(NEIGHBOUR_ORDER)
        .find(|direction| {
            !is_opposite(current, *direction) && walkable.contains(&from.step(*direction))
        })
}

/// Nearest target by Euclidean distance; ties go to the earliest entry.
#[must_use]
pub fn nearest_target(from: Vec3, targets: &[Vec3]) -> Option<Vec3> {
    let mut best: Option<(f32, Vec3)> = None;
    for target in targets {
        let distance = from.distance(*target);
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, *target));
        }
    }
    best.map(|(_, target)| target)
}

/// Direction of a single path step; X wins only when strictly larger.
#[must_use]
pub fn step_direction(from: GridPosition, to: GridPosition) -> Direction {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    if dx.abs() > dy.abs() {
        if dx > 0 {
            Direction::Up
        } else {
            Direction::Down
        }
    } else if dy > 0 {
        Direction::Right
    } else {
        Direction::Left
    }
}
