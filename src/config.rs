/// Persisted settings and the high-score table.
///
/// Stored as JSON in the user's home directory. Missing keys take their
/// defaults, so older files keep loading; a file from an incompatible
/// version is rejected and the caller falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entities::Settings;
use crate::error::{GameError, Result};

pub const CONF_VERSION: u32 = 2;
pub const HIGHSCORES_AMOUNT: usize = 10;
pub const MAX_NAME_LEN: usize = 25;
const CONFIG_FILE: &str = ".geocom.json";
const LOG_FILE: &str = ".geocom.log";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub conf_version: u32,
    /// (name, score), best first.
    pub highscores: Vec<(String, u32)>,
    pub debug: bool,
    pub effects: bool,
    pub fullscreen: bool,
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            conf_version: CONF_VERSION,
            highscores: Vec::new(),
            debug: false,
            effects: true,
            fullscreen: false,
            sound: true,
        }
    }
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

pub fn default_path() -> PathBuf {
    home_dir().join(CONFIG_FILE)
}

pub fn log_path() -> PathBuf {
    home_dir().join(LOG_FILE)
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        if config.conf_version != CONF_VERSION {
            return Err(GameError::ConfigVersion {
                found: config.conf_version,
                expected: CONF_VERSION,
            });
        }
        Ok(config)
    }

    /// Load, or start from defaults when the file is absent or unusable.
    pub fn load_or_default(path: &Path) -> Config {
        if !path.exists() {
            return Config::default();
        }
        match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring {}: {err}", path.display());
                Config::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            debug: self.debug,
            effects: self.effects,
        }
    }

    /// Would `score` earn a place in the table?
    pub fn is_highscore(&self, score: u32) -> bool {
        if self.highscores.len() < HIGHSCORES_AMOUNT {
            return true;
        }
        self.highscores
            .last()
            .map_or(true, |(_, lowest)| score > *lowest)
    }

    pub fn register_highscore(&mut self, name: &str, score: u32) {
        let name: String = name.chars().take(MAX_NAME_LEN).collect();
        self.highscores.push((name, score));
        // Stable, so earlier entries win ties.
        self.highscores.sort_by(|a, b| b.1.cmp(&a.1));
        self.highscores.truncate(HIGHSCORES_AMOUNT);
    }

    pub fn best(&self) -> u32 {
        self.highscores.first().map_or(0, |(_, score)| *score)
    }
}
