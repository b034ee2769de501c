use std::collections::VecDeque;

use glam::Vec3;
use log::debug;

use crate::config::GameConfig;
use crate::grid::GridPosition;
use crate::motion::TileCrossing;

const SNAP_EPSILON_SQUARED: f32 = 1e-4;

/// Tunables for body following, taken from [`GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySettings {
    pub record_distance: f32,
    pub spacing: usize,
    pub history_margin: usize,
    pub smooth_speed: f32,
    pub grace_period_secs: f32,
}

impl From<&GameConfig> for BodySettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            record_distance: config.record_distance,
            spacing: config.tail_spacing.max(1),
            history_margin: config.history_margin,
            smooth_speed: config.smooth_speed,
            grace_period_secs: config.grace_period_secs,
        }
    }
}

impl Default for BodySettings {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

/// One trailing body part.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySegment {
    position: Vec3,
    target: Vec3,
    trail_tile: Vec3,
    grace_remaining: f32,
}

impl BodySegment {
    /// Smoothed world position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// History sample this segment is easing toward.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Tile this segment occupies on the discrete trail.
    #[must_use]
    pub fn trail_tile(&self) -> GridPosition {
        GridPosition::from_world(self.trail_tile)
    }

    /// False while the post-growth grace period is running.
    #[must_use]
    pub fn can_collide(&self) -> bool {
        self.grace_remaining <= 0.0
    }
}

/// Head-position history and the segments trailing through it.
///
/// Segment `i` follows the history sample `(i + 1) * spacing` entries behind
/// the newest one, so each segment lags its predecessor by one spacing.
#[derive(Debug, Clone)]
pub struct BodyTracker {
    settings: BodySettings,
    history: VecDeque<Vec3>,
    segments: Vec<BodySegment>,
    last_tile: Vec3,
}

impl BodyTracker {
    #[must_use]
    pub fn new(anchor: Vec3, settings: BodySettings) -> Self {
        Self {
            settings,
            history: VecDeque::new(),
            segments: Vec::new(),
            last_tile: anchor,
        }
    }

    /// Records a head sample once it is far enough from the previous one.
    pub fn record_head(&mut self, position: Vec3) {
        let far_enough = self
            .history
            .back()
            .is_none_or(|last| last.distance(position) >= self.settings.record_distance);
        if far_enough {
            self.history.push_back(position);
        }

        let bound = self.history_bound();
        while self.history.len() > bound {
            let _ = self.history.pop_front();
        }
    }

    /// Adds one segment at the last completed head tile.
    pub fn grow(&mut self) {
        self.segments.push(BodySegment {
            position: self.last_tile,
            target: self.last_tile,
            trail_tile: self.last_tile,
            grace_remaining: self.settings.grace_period_secs,
        });
        debug!("body grown to {} segments", self.segments.len());
    }

    /// Shifts the discrete trail by one tile.
    pub fn on_tile_completed(&mut self, crossing: TileCrossing) {
        for index in (1..self.segments.len()).rev() {
            self.segments[index].trail_tile = self.segments[index - 1].trail_tile;
        }
        if let Some(first) = self.segments.first_mut() {
            first.trail_tile = crossing.vacated;
        }
        self.last_tile = crossing.reached;
    }

    /// Eases every segment toward its history target.
    pub fn update(&mut self, delta_secs: f32) {
        let delta_secs = if delta_secs.is_finite() {
            delta_secs.max(0.0)
        } else {
            0.0
        };

        for index in 0..self.segments.len() {
            let target = self.history_target(index);
            let segment = &mut self.segments[index];
            segment.target = target;
            segment.position = interpolate_toward(
                segment.position,
                target,
                delta_secs,
                self.settings.smooth_speed,
            );
            segment.grace_remaining = (segment.grace_remaining - delta_secs).max(0.0);
        }
    }

    /// Drops every segment and sample, re-anchoring at `anchor`.
    pub fn reset(&mut self, anchor: Vec3) {
        self.history.clear();
        self.segments.clear();
        self.last_tile = anchor;
    }

    /// Segments from head to tail.
    #[must_use]
    pub fn segments(&self) -> &[BodySegment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn history(&self) -> &VecDeque<Vec3> {
        &self.history
    }

    /// Trail tiles of segments past their grace period.
    pub fn collidable_tiles(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.segments
            .iter()
            .filter(|segment| segment.can_collide())
            .map(BodySegment::trail_tile)
    }

    /// Every tile covered by the body, smoothed or discrete.
    pub fn occupied_tiles(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.segments.iter().flat_map(|segment| {
            [
                segment.trail_tile(),
                GridPosition::from_world(segment.position),
            ]
        })
    }

    fn history_bound(&self) -> usize {
        (self.segments.len() + 1) * self.settings.spacing + self.settings.history_margin
    }

    fn history_target(&self, index: usize) -> Vec3 {
        let Some(newest) = self.history.len().checked_sub(1) else {
            return self.last_tile;
        };
        let offset = (index + 1) * self.settings.spacing;
        let history_index = newest.saturating_sub(offset);
        self.history[history_index]
    }
}

/// Moves `current` toward `target` at a rate proportional to the gap.
fn interpolate_toward(current: Vec3, target: Vec3, delta_secs: f32, speed: f32) -> Vec3 {
    if speed <= 0.0 {
        return target;
    }

    let gap = target - current;
    if gap.length_squared() < SNAP_EPSILON_SQUARED {
        return target;
    }

    current + gap * (delta_secs * speed).clamp(0.0, 1.0)
}
