use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::ConfigError;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Edge length of one tile in world units.
pub const TILE_SIZE: f32 = 100.0;

/// Default head speed in world units per second (five tiles per second).
pub const DEFAULT_SPEED: f32 = 500.0;

/// Minimum head travel between two history samples.
pub const DEFAULT_RECORD_DISTANCE: f32 = 10.0;

/// History samples between consecutive body segments.
///
/// `TILE_SIZE / DEFAULT_RECORD_DISTANCE` keeps the smoothed body one tile
/// apart, matching the discrete trail used for overlap checks.
pub const DEFAULT_TAIL_SPACING: usize = 10;

/// Extra history samples retained past the last segment.
pub const DEFAULT_HISTORY_MARGIN: usize = 10;

/// Interpolation rate for trailing segments, per second.
pub const DEFAULT_SMOOTH_SPEED: f32 = 10.0;

/// Seconds a freshly grown segment ignores overlaps.
pub const DEFAULT_GRACE_PERIOD_SECS: f32 = 0.5;

/// Targets consumed before the level advances.
pub const DEFAULT_TARGETS_PER_LEVEL: u32 = 5;

/// First level index served by level providers.
pub const FIRST_LEVEL_INDEX: u32 = 1;

/// Downward acceleration on the height axis, world units per second squared.
pub const GRAVITY: f32 = 600.0;

/// Upward velocity applied by a hop.
pub const JUMP_VELOCITY: f32 = 250.0;

/// Fraction of vertical speed kept after touching the ground.
pub const BOUNCE_DAMPING: f32 = 0.5;

/// Vertical speed below which a bounce settles on the ground.
pub const BOUNCE_REST_SPEED: f32 = 10.0;

/// Frame pacing for the terminal loop.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Longest simulated step per frame, in seconds.
pub const MAX_FRAME_DELTA_SECS: f32 = 0.25;

/// Fastest head speed accepted from `config.json`: eight tiles per
/// longest frame.
pub const MAX_SPEED: f32 = TILE_SIZE / MAX_FRAME_DELTA_SECS * 8.0;

/// Tunable simulation parameters, loaded from `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub speed: f32,
    pub record_distance: f32,
    pub tail_spacing: usize,
    pub history_margin: usize,
    pub smooth_speed: f32,
    pub grace_period_secs: f32,
    pub targets_per_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            record_distance: DEFAULT_RECORD_DISTANCE,
            tail_spacing: DEFAULT_TAIL_SPACING,
            history_margin: DEFAULT_HISTORY_MARGIN,
            smooth_speed: DEFAULT_SMOOTH_SPEED,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            targets_per_level: DEFAULT_TARGETS_PER_LEVEL,
        }
    }
}

impl GameConfig {
    /// Loads the config from the platform config directory.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&config_path())
    }

    /// Loads the config from `path`, falling back to defaults when absent.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Clamps values that would stall the simulation.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            speed: self.speed.max(0.0).min(MAX_SPEED),
            record_distance: self.record_distance.max(f32::EPSILON),
            tail_spacing: self.tail_spacing.max(1),
            history_margin: self.history_margin,
            smooth_speed: self.smooth_speed.max(0.0),
            grace_period_secs: self.grace_period_secs.max(0.0),
            targets_per_level: self.targets_per_level.max(1),
        }
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Returns the platform-correct directory for data files (scores, logs).
#[must_use]
pub fn data_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    /// Head color per participant slot; the AI uses the last entry.
    pub snake_heads: [Color; 3],
    /// Body color per participant slot.
    pub snake_bodies: [Color; 3],
    pub target: Color,
    pub wall: Color,
    pub door: Color,
    pub floor: Color,
    pub void: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Default dark theme.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_heads: [Color::White, Color::LightYellow, Color::LightMagenta],
    snake_bodies: [Color::Green, Color::Yellow, Color::Magenta],
    target: Color::Red,
    wall: Color::Gray,
    door: Color::Cyan,
    floor: Color::DarkGray,
    void: Color::Black,
    border_fg: Color::White,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Each tile is drawn two terminal columns wide so it looks square.
pub const TILE_COLUMNS: u16 = 2;

pub const GLYPH_WALL: &str = "██";
pub const GLYPH_DOOR: &str = "▒▒";
pub const GLYPH_FLOOR: &str = " ·";
pub const GLYPH_VOID: &str = "  ";
pub const GLYPH_TARGET: &str = "()";
pub const GLYPH_BODY: &str = "[]";
pub const GLYPH_HEAD_UP: &str = "/\\";
pub const GLYPH_HEAD_DOWN: &str = "\\/";
pub const GLYPH_HEAD_LEFT: &str = "<:";
pub const GLYPH_HEAD_RIGHT: &str = ":>";
pub const GLYPH_HEAD_IDLE: &str = "@@";
pub const GLYPH_HEAD_AIRBORNE: &str = "^^";
