use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::data_dir;
use crate::session::GameMode;

const SCORE_FILE_NAME: &str = "scores.json";

/// Best scores keyed by [`GameMode::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    by_mode: BTreeMap<String, u32>,
}

impl HighScores {
    #[must_use]
    pub fn get(&self, mode: GameMode) -> u32 {
        self.by_mode.get(mode.key()).copied().unwrap_or(0)
    }

    /// Records `score` for `mode`. Returns whether it beat the old best.
    pub fn submit(&mut self, mode: GameMode, score: u32) -> bool {
        if score <= self.get(mode) {
            return false;
        }
        let _ = self.by_mode.insert(mode.key().to_owned(), score);
        true
    }
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    data_dir().join(SCORE_FILE_NAME)
}

/// Loads high scores from disk.
///
/// Returns empty scores when the file does not yet exist (first run).
/// Returns `Err` when the file exists but cannot be read or parsed, so the
/// caller can surface a warning before entering raw terminal mode.
pub fn load_high_scores() -> io::Result<HighScores> {
    load_high_scores_from_path(&scores_path())
}

/// Saves high scores, creating parent directories when needed.
pub fn save_high_scores(scores: &HighScores) -> io::Result<()> {
    save_high_scores_to_path(&scores_path(), scores)
}

fn load_high_scores_from_path(path: &Path) -> io::Result<HighScores> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HighScores::default()),
        Err(e) => return Err(e),
    };

    serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn save_high_scores_to_path(path: &Path, scores: &HighScores) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(scores)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

    fs::write(path, json)
}
