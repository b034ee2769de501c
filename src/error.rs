use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by level providers.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level {index} does not exist")]
    Missing { index: u32 },
    #[error("failed to read level file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown tile {glyph:?} at row {row}, column {column}")]
    UnknownTile {
        glyph: char,
        row: usize,
        column: usize,
    },
    #[error("level map has no rows")]
    Empty,
    #[error("level {index} has no room for {participants} snakes")]
    TooSmall { index: u32, participants: usize },
}

/// Failures raised while reading `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for the terminal front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialise logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}
