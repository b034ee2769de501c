use std::collections::VecDeque;

use glam::Vec3;
use log::debug;

use crate::config::{BOUNCE_DAMPING, BOUNCE_REST_SPEED, GRAVITY, JUMP_VELOCITY, TILE_SIZE};
use crate::grid::{Direction, GridPosition, direction_vector, snap_to_tile};

/// Most tiles a single [`MotionController::advance`] call may complete.
pub const MAX_CROSSINGS_PER_ADVANCE: usize = 16;

/// One completed tile, reported by [`MotionController::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileCrossing {
    /// Tile centre the head left.
    pub vacated: Vec3,
    /// Tile centre the head just completed.
    pub reached: Vec3,
}

impl TileCrossing {
    #[must_use]
    pub fn reached_tile(self) -> GridPosition {
        GridPosition::from_world(self.reached)
    }
}

/// Continuous head motion locked to the tile grid.
///
/// Direction changes only take effect on tile completion, one queued turn
/// per completed tile. The controller applies every queued turn as given;
/// callers decide which turns are legal.
#[derive(Debug, Clone)]
pub struct MotionController {
    position: Vec3,
    direction: Direction,
    facing_yaw: f32,
    turn_queue: VecDeque<Direction>,
    moved_tile_distance: f32,
    last_tile_position: Vec3,
    speed: f32,
    vertical_velocity: f32,
    airborne: bool,
}

impl MotionController {
    /// Creates a stationary controller on the tile containing `start`.
    #[must_use]
    pub fn new(start: Vec3, speed: f32) -> Self {
        Self::with_direction(start, speed, Direction::None)
    }

    /// Creates a controller already heading in `direction`.
    #[must_use]
    pub fn with_direction(start: Vec3, speed: f32, direction: Direction) -> Self {
        let tile = ground(snap_to_tile(start));
        Self {
            position: tile,
            direction,
            facing_yaw: direction.yaw_degrees().unwrap_or(0.0),
            turn_queue: VecDeque::new(),
            moved_tile_distance: 0.0,
            last_tile_position: tile,
            speed,
            vertical_velocity: 0.0,
            airborne: false,
        }
    }

    /// Advances motion by `delta_secs` and returns every tile completed.
    ///
    /// Travel is clipped at each tile boundary; the remainder carries into
    /// the next tile in the (possibly new) direction, so fast heads can
    /// complete several tiles in a single call.
    pub fn advance(&mut self, delta_secs: f32) -> Vec<TileCrossing> {
        self.update_falling(delta_secs);

        let mut crossings = Vec::new();
        let mut remaining = self.speed * delta_secs;
        if !remaining.is_finite() || remaining <= 0.0 {
            return crossings;
        }

        let whole_tiles = ((self.moved_tile_distance + remaining) / TILE_SIZE).floor();
        let whole_tiles = whole_tiles.min(MAX_CROSSINGS_PER_ADVANCE as f32) as usize;
        for _ in 0..whole_tiles {
            let step = TILE_SIZE - self.moved_tile_distance;
            self.move_by(step);
            remaining -= step;
            crossings.push(self.complete_tile());
        }

        // Travel past the crossing cap is dropped.
        let leftover = remaining.max(0.0) % TILE_SIZE;
        if leftover > 0.0 && self.moved_tile_distance + leftover < TILE_SIZE {
            self.move_by(leftover);
        }

        crossings
    }

    /// Appends a turn to the queue. `None` is ignored.
    pub fn queue_turn(&mut self, direction: Direction) {
        if direction == Direction::None {
            return;
        }
        self.turn_queue.push_back(direction);
    }

    /// Turns the facing toward `direction` without changing movement.
    pub fn face(&mut self, direction: Direction) {
        if let Some(yaw) = direction.yaw_degrees() {
            self.facing_yaw = yaw;
        }
    }

    /// Starts a hop when the head is on the ground.
    pub fn jump(&mut self) {
        if self.airborne {
            return;
        }
        self.vertical_velocity = JUMP_VELOCITY;
        self.airborne = true;
    }

    /// Direction the head will have once the queue drains.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.turn_queue.back().copied().unwrap_or(self.direction)
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn facing_yaw(&self) -> f32 {
        self.facing_yaw
    }

    #[must_use]
    pub fn last_tile_position(&self) -> Vec3 {
        self.last_tile_position
    }

    #[must_use]
    pub fn last_tile(&self) -> GridPosition {
        GridPosition::from_world(self.last_tile_position)
    }

    #[must_use]
    pub fn moved_tile_distance(&self) -> f32 {
        self.moved_tile_distance
    }

    #[must_use]
    pub fn queued_turns(&self) -> usize {
        self.turn_queue.len()
    }

    #[must_use]
    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    fn move_by(&mut self, distance: f32) {
        self.position += direction_vector(self.direction) * distance;
        self.moved_tile_distance += distance;
    }

    fn complete_tile(&mut self) -> TileCrossing {
        let vacated = self.last_tile_position;
        let snapped = snap_to_tile(self.position);
        self.position = snapped;
        self.last_tile_position = ground(snapped);
        self.moved_tile_distance = 0.0;

        if let Some(next) = self.turn_queue.pop_front() {
            debug!("turn {:?} -> {next:?} at {:?}", self.direction, self.last_tile());
            self.direction = next;
            self.face(next);
        }

        TileCrossing {
            vacated,
            reached: self.last_tile_position,
        }
    }

    fn update_falling(&mut self, delta_secs: f32) {
        if !delta_secs.is_finite() || delta_secs <= 0.0 {
            return;
        }
        if !self.airborne && self.position.z <= 0.0 && self.vertical_velocity == 0.0 {
            return;
        }

        self.vertical_velocity -= GRAVITY * delta_secs;
        self.position.z += self.vertical_velocity * delta_secs;

        if self.position.z <= 0.0 {
            self.position.z = -self.position.z;
            self.vertical_velocity = -self.vertical_velocity * BOUNCE_DAMPING;

            if self.vertical_velocity.abs() < BOUNCE_REST_SPEED {
                self.vertical_velocity = 0.0;
                self.position.z = 0.0;
                self.airborne = false;
            }
        } else {
            self.airborne = true;
        }
    }
}

fn ground(position: Vec3) -> Vec3 {
    Vec3::new(position.x, position.y, 0.0)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{MAX_CROSSINGS_PER_ADVANCE, MotionController};
    use crate::config::TILE_SIZE;
    use crate::grid::{Direction, GridPosition};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn moves_continuously_within_a_tile() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 500.0, Direction::Up);

        let crossings = motion.advance(0.1);

        assert!(crossings.is_empty());
        assert!(approx(motion.position(), Vec3::new(50.0, 0.0, 0.0)));
        assert!((motion.moved_tile_distance() - 50.0).abs() < 1e-3);
        assert_eq!(motion.last_tile(), GridPosition::new(0, 0));
    }

    #[test]
    fn crossing_lands_exactly_on_tile_boundary() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 400.0, Direction::Right);

        let crossings = motion.advance(0.25);

        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].vacated, Vec3::ZERO);
        assert_eq!(crossings[0].reached_tile(), GridPosition::new(0, 1));
        assert_eq!(motion.moved_tile_distance(), 0.0);
        assert!(approx(motion.position(), Vec3::new(0.0, TILE_SIZE, 0.0)));
    }

    #[test]
    fn runaway_speed_stops_at_the_crossing_cap() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 1.0e30, Direction::Up);

        let crossings = motion.advance(1.0 / 60.0);

        assert_eq!(crossings.len(), MAX_CROSSINGS_PER_ADVANCE);
        assert_eq!(motion.last_tile(), GridPosition::new(16, 0));
        assert!(motion.moved_tile_distance() < TILE_SIZE);
        assert!(motion.position().is_finite());
    }

    #[test]
    fn fast_tick_crosses_several_tiles_and_drains_queue_in_order() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 1400.0, Direction::Up);
        motion.queue_turn(Direction::Right);
        motion.queue_turn(Direction::Down);

        let crossings = motion.advance(0.25);

        let reached: Vec<GridPosition> = crossings.iter().map(|c| c.reached_tile()).collect();
        assert_eq!(
            reached,
            vec![
                GridPosition::new(1, 0),
                GridPosition::new(1, 1),
                GridPosition::new(0, 1),
            ]
        );
        assert_eq!(motion.direction(), Direction::Down);
        assert_eq!(motion.queued_turns(), 0);
        assert!(approx(motion.position(), Vec3::new(-50.0, 100.0, 0.0)));
        assert!((motion.moved_tile_distance() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn accumulator_stays_below_tile_size_between_ticks() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 730.0, Direction::Up);

        for _ in 0..200 {
            let _ = motion.advance(1.0 / 60.0);
            assert!(motion.moved_tile_distance() >= 0.0);
            assert!(motion.moved_tile_distance() < TILE_SIZE);
        }
    }

    #[test]
    fn stationary_head_picks_up_first_turn_within_one_tile_time() {
        let mut motion = MotionController::new(Vec3::new(210.0, 190.0, 0.0), 400.0);
        assert_eq!(motion.direction(), Direction::None);
        assert_eq!(motion.last_tile(), GridPosition::new(2, 2));

        motion.queue_turn(Direction::Left);
        let crossings = motion.advance(0.25);

        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].reached_tile(), GridPosition::new(2, 2));
        assert_eq!(motion.direction(), Direction::Left);

        let _ = motion.advance(0.25);
        assert_eq!(motion.last_tile(), GridPosition::new(2, 1));
    }

    #[test]
    fn queue_accepts_reversals_and_ignores_none() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 400.0, Direction::Up);

        motion.queue_turn(Direction::None);
        motion.queue_turn(Direction::Down);

        assert_eq!(motion.queued_turns(), 1);
        assert_eq!(motion.pending_direction(), Direction::Down);

        let _ = motion.advance(0.25);
        assert_eq!(motion.direction(), Direction::Down);
    }

    #[test]
    fn facing_follows_applied_turns_and_cosmetic_face() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 400.0, Direction::Up);
        assert_eq!(motion.facing_yaw(), 0.0);

        motion.face(Direction::Left);
        assert_eq!(motion.facing_yaw(), 270.0);
        assert_eq!(motion.direction(), Direction::Up);

        motion.queue_turn(Direction::Right);
        let _ = motion.advance(0.25);
        assert_eq!(motion.facing_yaw(), 90.0);
    }

    #[test]
    fn hop_rises_and_settles_back_on_the_ground() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 0.0, Direction::Up);

        motion.jump();
        let _ = motion.advance(0.1);
        assert!(motion.is_airborne());
        assert!(motion.position().z > 0.0);

        for _ in 0..600 {
            let _ = motion.advance(1.0 / 60.0);
        }

        assert!(!motion.is_airborne());
        assert_eq!(motion.position().z, 0.0);
    }

    #[test]
    fn zero_or_invalid_delta_does_nothing() {
        let mut motion = MotionController::with_direction(Vec3::ZERO, 500.0, Direction::Up);

        assert!(motion.advance(0.0).is_empty());
        assert!(motion.advance(f32::NAN).is_empty());
        assert!(motion.advance(-1.0).is_empty());
        assert_eq!(motion.position(), Vec3::ZERO);
    }
}
