//! Runtime configuration, read from an optional JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

const RECORDS_FILE: &str = ".stellar_strike.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Wall-clock pacing of one simulated frame.
    pub frame_ms: u64,
    pub starting_lives: u32,
    /// Cap applied by the extra-life pickup.
    pub max_lives: u32,
    /// Game time between scheduled power-up drops.
    pub power_up_interval_ms: u64,
    /// Where high scores are kept; `None` means `$HOME/.stellar_strike.json`.
    pub records_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            starting_lives: 3,
            max_lives: 5,
            power_up_interval_ms: 15_000,
            records_path: None,
        }
    }
}

impl GameConfig {
    /// Read a JSON config. Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<GameConfig> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            return Err(GameError::InvalidConfig("frame_ms must be positive".into()));
        }
        if self.starting_lives == 0 {
            return Err(GameError::InvalidConfig(
                "starting_lives must be positive".into(),
            ));
        }
        if self.starting_lives > self.max_lives {
            return Err(GameError::InvalidConfig(format!(
                "starting_lives ({}) exceeds max_lives ({})",
                self.starting_lives, self.max_lives
            )));
        }
        if self.power_up_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "power_up_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn records_path(&self) -> PathBuf {
        self.records_path.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(RECORDS_FILE)
        })
    }
}
