use glam::Vec3;

use crate::config::TILE_SIZE;

/// Tile coordinate on the arena grid.
///
/// `x` grows forward (screen up) and `y` grows to the right.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the tile that contains `world` after snapping.
    #[must_use]
    pub fn from_world(world: Vec3) -> Self {
        Self {
            x: (world.x / TILE_SIZE).round() as i32,
            y: (world.y / TILE_SIZE).round() as i32,
        }
    }

    /// Returns the centre of this tile on the ground plane.
    #[must_use]
    pub fn to_world(self) -> Vec3 {
        Vec3::new(self.x as f32 * TILE_SIZE, self.y as f32 * TILE_SIZE, 0.0)
    }

    /// Returns the neighbouring tile one step along `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.grid_delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Squared Euclidean distance in tiles.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// Heading of a snake. `None` means not yet moving and is never queued.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
    #[default]
    None,
}

impl Direction {
    /// All moving directions, in clockwise order from `Up`.
    pub const MOVING: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the opposite direction. `None` has no opposite.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    /// Facing yaw in degrees around the height axis.
    #[must_use]
    pub fn yaw_degrees(self) -> Option<f32> {
        match self {
            Self::Up => Some(0.0),
            Self::Right => Some(90.0),
            Self::Down => Some(180.0),
            Self::Left => Some(270.0),
            Self::None => None,
        }
    }

    fn grid_delta(self) -> (i32, i32) {
        match self {
            Self::Up => (1, 0),
            Self::Right => (0, 1),
            Self::Down => (-1, 0),
            Self::Left => (0, -1),
            Self::None => (0, 0),
        }
    }
}

/// Snaps both planar axes to the nearest tile centre. Height is untouched.
#[must_use]
pub fn snap_to_tile(world: Vec3) -> Vec3 {
    Vec3::new(
        (world.x / TILE_SIZE).round() * TILE_SIZE,
        (world.y / TILE_SIZE).round() * TILE_SIZE,
        world.z,
    )
}

/// Unit vector for `direction`; forward (`Up`) is +X.
#[must_use]
pub fn direction_vector(direction: Direction) -> Vec3 {
    let (dx, dy) = direction.grid_delta();
    Vec3::new(dx as f32, dy as f32, 0.0)
}

/// Returns true iff `a` and `b` point in exactly opposite directions.
#[must_use]
pub fn is_opposite(a: Direction, b: Direction) -> bool {
    a != Direction::None && a.opposite() == b
}
