//! Text level maps and the providers that serve them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::FIRST_LEVEL_INDEX;
use crate::error::LevelError;
use crate::grid::GridPosition;
use crate::pathfinding::WalkableSet;

const LEVEL_FILE_PREFIX: &str = "Level";
const LEVEL_FILE_EXTENSION: &str = "txt";

const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../levels/Level1.txt"),
    include_str!("../levels/Level2.txt"),
    include_str!("../levels/Level3.txt"),
];

/// One map cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Tile {
    Floor,
    Wall,
    /// Closed door; blocks like a wall.
    Door,
    /// Outside the arena.
    Void,
}

impl Tile {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Self::Floor),
            '#' => Some(Self::Wall),
            'D' => Some(Self::Door),
            'O' | ' ' => Some(Self::Void),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_walkable(self) -> bool {
        self == Self::Floor
    }
}

/// A parsed level.
///
/// Text row 0 is the top of the screen. Grid `x` counts rows upward from
/// the bottom and grid `y` counts columns from the left.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    index: u32,
    width: usize,
    height: usize,
    rows: Vec<Vec<Tile>>,
    walkable: WalkableSet,
    floor: Vec<GridPosition>,
}

impl Level {
    /// Parses a level map. Short rows are padded with void.
    pub fn parse(index: u32, text: &str) -> Result<Self, LevelError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let used = lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(0, |last| last + 1);
        let lines = &lines[..used];
        if lines.is_empty() {
            return Err(LevelError::Empty);
        }

        let mut rows = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let mut tiles = Vec::with_capacity(line.len());
            for (column, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(LevelError::UnknownTile {
                    glyph,
                    row,
                    column,
                })?;
                tiles.push(tile);
            }
            rows.push(tiles);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for tiles in &mut rows {
            tiles.resize(width, Tile::Void);
        }
        let height = rows.len();

        let mut floor = Vec::new();
        for (row, tiles) in rows.iter().enumerate() {
            for (column, tile) in tiles.iter().enumerate() {
                if tile.is_walkable() {
                    floor.push(grid_from_cell(height, row, column));
                }
            }
        }
        floor.sort_unstable();
        let walkable = floor.iter().copied().collect();

        debug!(
            "parsed level {index}: {width}x{height}, {} walkable tiles",
            floor.len()
        );

        Ok(Self {
            index,
            width,
            height,
            rows,
            walkable,
            floor,
        })
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Width in tiles (text columns).
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles (text rows).
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at `position`; anything off the map is void.
    #[must_use]
    pub fn tile(&self, position: GridPosition) -> Tile {
        self.screen_cell(position)
            .and_then(|(column, row)| self.rows.get(row)?.get(column).copied())
            .unwrap_or(Tile::Void)
    }

    #[must_use]
    pub fn is_walkable(&self, position: GridPosition) -> bool {
        self.walkable.contains(&position)
    }

    #[must_use]
    pub fn walkable(&self) -> &WalkableSet {
        &self.walkable
    }

    /// Walkable tiles in ascending order; target spawn candidates.
    #[must_use]
    pub fn floor_tiles(&self) -> &[GridPosition] {
        &self.floor
    }

    /// Maps a grid position to its `(column, row)` text cell.
    #[must_use]
    pub fn screen_cell(&self, position: GridPosition) -> Option<(usize, usize)> {
        let column = usize::try_from(position.y).ok()?;
        let from_bottom = usize::try_from(position.x).ok()?;
        if column >= self.width || from_bottom >= self.height {
            return None;
        }
        Some((column, self.height - 1 - from_bottom))
    }

    /// Rows from the top of the screen down.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Up to `count` distinct start tiles near the left third, the right
    /// third and the centre of the map, in that order.
    #[must_use]
    pub fn spawn_points(&self, count: usize) -> Vec<GridPosition> {
        let middle_row = i32::try_from(self.height / 2).unwrap_or(0);
        let anchors = [self.width / 3, self.width * 2 / 3, self.width / 2]
            .map(|column| GridPosition::new(middle_row, i32::try_from(column).unwrap_or(0)));

        let mut chosen: Vec<GridPosition> = Vec::with_capacity(count);
        for anchor in anchors.iter().cycle().take(count) {
            let nearest = self
                .floor
                .iter()
                .copied()
                .filter(|tile| !chosen.contains(tile))
                .min_by_key(|tile| tile.distance_squared(*anchor));
            match nearest {
                Some(tile) => chosen.push(tile),
                None => break,
            }
        }
        chosen
    }
}

fn grid_from_cell(height: usize, row: usize, column: usize) -> GridPosition {
    let x = height - 1 - row;
    GridPosition::new(
        i32::try_from(x).unwrap_or(i32::MAX),
        i32::try_from(column).unwrap_or(i32::MAX),
    )
}

/// Source of levels, indexed from [`FIRST_LEVEL_INDEX`].
pub trait LevelProvider {
    fn level_exists(&self, index: u32) -> bool;
    fn load(&self, index: u32) -> Result<Level, LevelError>;
}

impl<P: LevelProvider + ?Sized> LevelProvider for Box<P> {
    fn level_exists(&self, index: u32) -> bool {
        (**self).level_exists(index)
    }

    fn load(&self, index: u32) -> Result<Level, LevelError> {
        (**self).load(index)
    }
}

/// Reads `Level<N>.txt` files from a directory.
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn level_path(&self, index: u32) -> PathBuf {
        self.root
            .join(format!("{LEVEL_FILE_PREFIX}{index}.{LEVEL_FILE_EXTENSION}"))
    }
}

impl LevelProvider for LevelDirectory {
    fn level_exists(&self, index: u32) -> bool {
        self.level_path(index).is_file()
    }

    fn load(&self, index: u32) -> Result<Level, LevelError> {
        let path = self.level_path(index);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(LevelError::Missing { index });
            }
            Err(source) => return Err(LevelError::Io { path, source }),
        };

        info!("loading level {index} from {}", path.display());
        Level::parse(index, &text)
    }
}

/// The maps bundled with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl LevelProvider for BuiltinLevels {
    fn level_exists(&self, index: u32) -> bool {
        builtin_text(index).is_some()
    }

    fn load(&self, index: u32) -> Result<Level, LevelError> {
        let text = builtin_text(index).ok_or(LevelError::Missing { index })?;
        info!("loading built-in level {index}");
        Level::parse(index, text)
    }
}

fn builtin_text(index: u32) -> Option<&'static str> {
    let offset = index.checked_sub(FIRST_LEVEL_INDEX)?;
    BUILTIN_LEVELS.get(usize::try_from(offset).ok()?).copied()
}
