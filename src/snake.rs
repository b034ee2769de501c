use glam::Vec3;

use crate::ai::{AiAgent, AiDecision};
use crate::body::{BodySettings, BodyTracker};
use crate::config::GameConfig;
use crate::grid::{Direction, GridPosition, is_opposite};
use crate::motion::{MotionController, TileCrossing};
use crate::pathfinding::WalkableSet;
use crate::session::{ParticipantId, ParticipantKind};

/// Turns a human may have buffered at once.
pub const MAX_BUFFERED_TURNS: usize = 2;

/// Who steers a snake.
#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    Human { player: usize },
    Ai(AiAgent),
}

impl From<ParticipantKind> for Controller {
    fn from(kind: ParticipantKind) -> Self {
        match kind {
            ParticipantKind::Human { player } => Self::Human { player },
            ParticipantKind::Ai => Self::Ai(AiAgent::new()),
        }
    }
}

/// One participant's head motion, trailing body and controller.
#[derive(Debug, Clone)]
pub struct Snake {
    participant: ParticipantId,
    controller: Controller,
    motion: MotionController,
    body: BodyTracker,
}

impl Snake {
    /// Creates a stationary snake with no segments on `spawn`.
    #[must_use]
    pub fn new(
        participant: ParticipantId,
        kind: ParticipantKind,
        spawn: GridPosition,
        config: &GameConfig,
    ) -> Self {
        let anchor = spawn.to_world();
        Self {
            participant,
            controller: Controller::from(kind),
            motion: MotionController::new(anchor, config.speed),
            body: BodyTracker::new(anchor, BodySettings::from(config)),
        }
    }

    /// Moves the head, shifts the trail on every completed tile and eases
    /// the body. Returns the tiles completed this tick.
    pub fn tick(&mut self, delta_secs: f32) -> Vec<TileCrossing> {
        let crossings = self.motion.advance(delta_secs);
        for crossing in &crossings {
            if crossing.vacated != crossing.reached {
                self.body.on_tile_completed(*crossing);
            }
        }
        self.body.record_head(self.motion.position());
        self.body.update(delta_secs);
        crossings
    }

    /// Lets an AI controller plan; humans return `None`.
    pub fn think(&mut self, targets: &[Vec3], walkable: &WalkableSet) -> Option<AiDecision> {
        match &mut self.controller {
            Controller::Ai(agent) => Some(agent.think(&mut self.motion, targets, walkable)),
            Controller::Human { .. } => None,
        }
    }

    /// Buffers a human turn.
    ///
    /// The turn is checked against the direction the head will have once
    /// already buffered turns apply, so a quick pair of turns can never add
    /// up to a reversal. Returns whether the turn was queued.
    pub fn steer(&mut self, direction: Direction) -> bool {
        let pending = self.motion.pending_direction();
        if direction == Direction::None
            || direction == pending
            || is_opposite(pending, direction)
            || self.motion.queued_turns() >= MAX_BUFFERED_TURNS
        {
            return false;
        }

        self.motion.queue_turn(direction);
        self.motion.face(direction);
        true
    }

    pub fn hop(&mut self) {
        self.motion.jump();
    }

    /// Adds one trailing segment.
    pub fn grow(&mut self) {
        self.body.grow();
    }

    /// Puts the snake back on `spawn` with no segments and no plan.
    pub fn respawn(&mut self, spawn: GridPosition) {
        let anchor = spawn.to_world();
        self.motion = MotionController::new(anchor, self.motion.speed());
        self.body.reset(anchor);
        if let Controller::Ai(agent) = &mut self.controller {
            agent.reset();
        }
    }

    #[must_use]
    pub fn participant(&self) -> ParticipantId {
        self.participant
    }

    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Player slot for human snakes.
    #[must_use]
    pub fn player(&self) -> Option<usize> {
        match self.controller {
            Controller::Human { player } => Some(player),
            Controller::Ai(_) => None,
        }
    }

    #[must_use]
    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }

    #[must_use]
    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    #[must_use]
    pub fn body(&self) -> &BodyTracker {
        &self.body
    }

    /// Last completed head tile.
    #[must_use]
    pub fn head_tile(&self) -> GridPosition {
        self.motion.last_tile()
    }

    /// Head tile plus every tile the body covers.
    pub fn occupied_tiles(&self) -> impl Iterator<Item = GridPosition> + '_ {
        std::iter::once(self.head_tile())
            .chain(std::iter::once(GridPosition::from_world(self.motion.position())))
            .chain(self.body.occupied_tiles())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::Snake;
    use crate::ai::AiDecision;
    use crate::config::GameConfig;
    use crate::grid::{Direction, GridPosition};
    use crate::pathfinding::WalkableSet;
    use crate::session::{ParticipantId, ParticipantKind};

    fn config() -> GameConfig {
        GameConfig {
            speed: 400.0,
            ..GameConfig::default()
        }
    }

    fn human(spawn: GridPosition) -> Snake {
        Snake::new(
            ParticipantId(0),
            ParticipantKind::Human { player: 0 },
            spawn,
            &config(),
        )
    }

    #[test]
    fn steer_rejects_reversal_of_pending_direction() {
        let mut snake = human(GridPosition::new(2, 2));

        assert!(snake.steer(Direction::Up));
        assert!(!snake.steer(Direction::Down));
        assert!(!snake.steer(Direction::Up));
        assert!(snake.steer(Direction::Left));
        assert_eq!(snake.motion().queued_turns(), 2);
    }

    #[test]
    fn steer_buffers_at_most_two_turns() {
        let mut snake = human(GridPosition::new(2, 2));

        assert!(snake.steer(Direction::Up));
        assert!(snake.steer(Direction::Right));
        assert!(!snake.steer(Direction::Up));
        assert!(!snake.steer(Direction::None));
    }

    #[test]
    fn tick_reports_crossings_and_shifts_trail() {
        let mut snake = human(GridPosition::new(0, 0));
        let _ = snake.steer(Direction::Up);
        let _ = snake.tick(0.25);
        snake.grow();

        let crossings = snake.tick(0.25);

        assert_eq!(crossings.len(), 1);
        assert_eq!(snake.head_tile(), GridPosition::new(1, 0));
        assert_eq!(snake.body().segments()[0].trail_tile(), GridPosition::new(0, 0));
    }

    #[test]
    fn in_place_completion_leaves_trail_alone() {
        let mut snake = human(GridPosition::new(3, 3));
        snake.grow();

        let _ = snake.tick(0.25);

        assert_eq!(snake.head_tile(), GridPosition::new(3, 3));
        assert_eq!(snake.body().segments()[0].trail_tile(), GridPosition::new(3, 3));
    }

    #[test]
    fn humans_do_not_think_and_ai_does() {
        let mut walkable = WalkableSet::new();
        for y in 0..4 {
            let _ = walkable.insert(GridPosition::new(0, y));
        }
        let target = [GridPosition::new(0, 3).to_world()];
        let mut person = human(GridPosition::new(0, 0));
        let mut bot = Snake::new(
            ParticipantId(1),
            ParticipantKind::Ai,
            GridPosition::new(0, 0),
            &config(),
        );

        assert_eq!(person.think(&target, &walkable), None);
        assert_eq!(
            bot.think(&target, &walkable),
            Some(AiDecision::Turn(Direction::Right))
        );
        assert!(bot.is_ai());
        assert_eq!(bot.player(), None);
    }

    #[test]
    fn respawn_clears_body_and_motion() {
        let mut snake = human(GridPosition::new(0, 0));
        let _ = snake.steer(Direction::Up);
        let _ = snake.tick(0.6);
        snake.grow();

        snake.respawn(GridPosition::new(5, 5));

        assert!(snake.body().is_empty());
        assert_eq!(snake.head_tile(), GridPosition::new(5, 5));
        assert_eq!(snake.motion().direction(), Direction::None);
        assert_eq!(snake.motion().position(), Vec3::new(500.0, 500.0, 0.0));
    }
}
