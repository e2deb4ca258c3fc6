//! High-score persistence across runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::{GameState, GameStatus};
use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Records {
    pub high_score: u32,
    /// Highest level number reached in any run.
    pub furthest_level: u32,
    pub victories: u32,
}

impl Records {
    /// A missing file is a fresh record book; a corrupt one is an error.
    pub fn load(path: &Path) -> Result<Records> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Records::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Fold a finished run into the records. Returns `true` when the run set
    /// a new high score.
    pub fn record_run(&mut self, state: &GameState) -> bool {
        self.furthest_level = self.furthest_level.max(state.level);
        if state.status == GameStatus::Victory {
            self.victories += 1;
        }
        if state.score > self.high_score {
            self.high_score = state.score;
            true
        } else {
            false
        }
    }
}
