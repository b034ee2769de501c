//! One running match: the level world, the snakes and the session.

use std::collections::HashSet;

use glam::Vec3;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::collision::{OverlapEvent, OverlapKind, detect_overlaps};
use crate::config::{FIRST_LEVEL_INDEX, GameConfig, MAX_FRAME_DELTA_SECS};
use crate::error::LevelError;
use crate::food::{Target, spawn_position};
use crate::grid::{Direction, GridPosition};
use crate::level::{Level, LevelProvider};
use crate::session::{
    ConsumeOutcome, Crash, EndReason, GameMode, LevelDirector, ParticipantId, Session,
    SessionState,
};
use crate::snake::Snake;

/// Level, targets and randomness; the session drives it through
/// [`LevelDirector`].
#[derive(Debug)]
pub struct World<P> {
    provider: P,
    level: Option<Level>,
    targets: Vec<Target>,
    rng: StdRng,
    occupied: HashSet<GridPosition>,
    participants: usize,
}

impl<P: LevelProvider> World<P> {
    #[must_use]
    pub fn new(provider: P, seed: u64) -> Self {
        Self {
            provider,
            level: None,
            targets: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            occupied: HashSet::new(),
            participants: 0,
        }
    }

    #[must_use]
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Target tile centres, for planning.
    #[must_use]
    pub fn target_positions(&self) -> Vec<Vec3> {
        self.targets.iter().map(|target| target.world_position()).collect()
    }

    /// Places a target on `position`, replacing any spawned ones.
    pub fn place_target(&mut self, position: GridPosition) {
        self.targets.clear();
        self.targets.push(Target::new(position));
    }

    fn remove_target(&mut self, tile: GridPosition) {
        self.targets.retain(|target| target.position != tile);
    }

    fn mark_occupied(&mut self, snakes: &[Snake]) {
        self.occupied = snakes.iter().flat_map(Snake::occupied_tiles).collect();
    }
}

impl<P: LevelProvider> LevelDirector for World<P> {
    fn level_exists(&self, index: u32) -> bool {
        self.provider.level_exists(index)
    }

    fn load_level(&mut self, index: u32) -> Result<(), LevelError> {
        let level = self.provider.load(index)?;
        let spawns = level.spawn_points(self.participants);
        if spawns.len() < self.participants {
            return Err(LevelError::TooSmall {
                index,
                participants: self.participants,
            });
        }

        self.occupied = spawns.into_iter().collect();
        self.targets.clear();
        self.level = Some(level);
        Ok(())
    }

    fn spawn_target(&mut self) {
        let Some(level) = &self.level else {
            warn!("target requested with no level loaded");
            return;
        };

        let mut blocked = self.occupied.clone();
        blocked.extend(self.targets.iter().map(|target| target.position));

        match spawn_position(&mut self.rng, level.floor_tiles(), &blocked) {
            Some(position) => self.targets.push(Target::new(position)),
            None => warn!("no free tile for a target on level {}", level.index()),
        }
    }
}

/// Owns everything a match needs and runs the per-frame schedule.
#[derive(Debug)]
pub struct Arena<P> {
    config: GameConfig,
    session: Session,
    world: World<P>,
    snakes: Vec<Snake>,
}

impl<P: LevelProvider> Arena<P> {
    #[must_use]
    pub fn new(provider: P, config: GameConfig, seed: u64) -> Self {
        let config = config.sanitized();
        Self {
            config,
            session: Session::new(config.targets_per_level),
            world: World::new(provider, seed),
            snakes: Vec::new(),
        }
    }

    /// Starts `mode` on the first level.
    ///
    /// A first level that cannot be loaded ends the match straight away and
    /// the error is returned for reporting.
    pub fn start(&mut self, mode: GameMode) -> Result<(), LevelError> {
        let Some(roster) = self.session.start_mode(mode) else {
            return Ok(());
        };
        self.world.participants = roster.len();
        self.snakes.clear();

        if let Err(error) = self.world.load_level(FIRST_LEVEL_INDEX) {
            warn!("cannot start {}: {error}", mode.label());
            let _ = self.session.end_match(EndReason::LevelLoadFailed);
            return Err(error);
        }

        let spawns = self.spawn_points();
        self.snakes = roster
            .into_iter()
            .zip(spawns)
            .enumerate()
            .map(|(index, (kind, spawn))| {
                Snake::new(ParticipantId(index), kind, spawn, &self.config)
            })
            .collect();
        self.world.spawn_target();
        info!(
            "{} started with {} snakes",
            mode.label(),
            self.snakes.len()
        );

        Ok(())
    }

    /// Runs one frame: motion, overlaps and their session updates, then AI
    /// planning against the targets that are left.
    ///
    /// Returns the overlaps that were applied.
    pub fn tick(&mut self, delta_secs: f32) -> Vec<OverlapEvent> {
        if self.session.state() != SessionState::Playing {
            return Vec::new();
        }
        let Some(level) = self.world.level.as_ref() else {
            return Vec::new();
        };

        let delta_secs = delta_secs.clamp(0.0, MAX_FRAME_DELTA_SECS);
        let crossings: Vec<_> = self
            .snakes
            .iter_mut()
            .map(|snake| snake.tick(delta_secs))
            .collect();

        let events = detect_overlaps(
            &self.snakes,
            &crossings,
            level.walkable(),
            &self.world.targets,
        );
        self.apply(&events);
        self.plan();
        events
    }

    /// Buffers a turn for human `player`. Ignored unless playing.
    pub fn steer(&mut self, player: usize, direction: Direction) -> bool {
        if self.session.state() != SessionState::Playing {
            return false;
        }
        self.human_mut(player)
            .is_some_and(|snake| snake.steer(direction))
    }

    /// Makes human `player` hop.
    pub fn hop(&mut self, player: usize) {
        if self.session.state() != SessionState::Playing {
            return;
        }
        if let Some(snake) = self.human_mut(player) {
            snake.hop();
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.session.toggle_pause()
    }

    pub fn return_to_menu(&mut self) -> bool {
        self.session.return_to_menu()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn world(&self) -> &World<P> {
        &self.world
    }

    /// Mutable world access for scripted scenarios.
    pub fn world_mut(&mut self) -> &mut World<P> {
        &mut self.world
    }

    #[must_use]
    pub fn level(&self) -> Option<&Level> {
        self.world.level()
    }

    #[must_use]
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn apply(&mut self, events: &[OverlapEvent]) {
        for event in events {
            if self.session.state() != SessionState::Playing {
                break;
            }

            match event.kind {
                OverlapKind::TargetConsumed => self.consume_target(*event),
                OverlapKind::BodyOverlap => self.crash(event.snake, Crash::Body),
                OverlapKind::WallOverlap => self.crash(event.snake, Crash::Wall),
            }
        }
    }

    fn plan(&mut self) {
        if self.session.state() != SessionState::Playing {
            return;
        }
        let Some(level) = self.world.level.as_ref() else {
            return;
        };

        let targets = self.world.target_positions();
        for snake in &mut self.snakes {
            let _ = snake.think(&targets, level.walkable());
        }
    }

    fn consume_target(&mut self, event: OverlapEvent) {
        self.world.remove_target(event.tile);
        if let Some(snake) = self.snakes.get_mut(event.snake.0) {
            snake.grow();
        }
        self.world.mark_occupied(&self.snakes);

        let outcome = self
            .session
            .notify_target_consumed(event.snake, &mut self.world);
        if let ConsumeOutcome::LevelAdvanced { level } = outcome {
            info!("respawning snakes for level {level}");
            let spawns = self.spawn_points();
            for (snake, spawn) in self.snakes.iter_mut().zip(spawns) {
                snake.respawn(spawn);
            }
        }
    }

    fn crash(&mut self, participant: ParticipantId, crash: Crash) {
        let _ = self
            .session
            .end_match(EndReason::Crashed { participant, crash });
    }

    fn spawn_points(&self) -> Vec<GridPosition> {
        self.world
            .level()
            .map(|level| level.spawn_points(self.world.participants))
            .unwrap_or_default()
    }

    /// With one human aboard, every player slot steers that snake.
    fn human_mut(&mut self, player: usize) -> Option<&mut Snake> {
        let humans = self
            .snakes
            .iter()
            .filter(|snake| snake.player().is_some())
            .count();
        self.snakes
            .iter_mut()
            .find(|snake| snake.player().is_some_and(|slot| slot == player || humans == 1))
    }
}
