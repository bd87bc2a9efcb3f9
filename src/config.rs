//! Driver configuration
//!
//! Read from environment variables; anything missing or malformed falls
//! back to the default with a warning.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::persistence;
use crate::state::Difficulty;

pub const ENV_DIFFICULTY: &str = "RBMK_DIFFICULTY";
pub const ENV_TICK_MS: &str = "RBMK_TICK_MS";
pub const ENV_SAVE_DIR: &str = "RBMK_SAVE_DIR";
pub const ENV_SEED: &str = "RBMK_SEED";

/// One simulated second per real second
pub const DEFAULT_TICK_MS: u64 = 1000;
pub const MIN_TICK_MS: u64 = 10;
pub const MAX_TICK_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub difficulty: Difficulty,
    pub tick_interval: Duration,
    pub save_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            save_dir: PathBuf::from("."),
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DIFFICULTY) {
            match raw.parse::<Difficulty>() {
                Ok(difficulty) => config.difficulty = difficulty,
                Err(err) => warn!("{}: {}, using {:?}", ENV_DIFFICULTY, err, config.difficulty),
            }
        }

        if let Some(raw) = lookup(ENV_TICK_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.tick_interval = Duration::from_millis(ms.clamp(MIN_TICK_MS, MAX_TICK_MS)),
                Err(err) => warn!("{}='{}': {}, using {} ms", ENV_TICK_MS, raw, err, DEFAULT_TICK_MS),
            }
        }

        if let Some(raw) = lookup(ENV_SAVE_DIR) {
            if raw.trim().is_empty() {
                warn!("{} is empty, saving to the current directory", ENV_SAVE_DIR);
            } else {
                config.save_dir = PathBuf::from(raw);
            }
        }

        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(err) => warn!("{}='{}': {}, seeding from entropy", ENV_SEED, raw, err),
            }
        }

        config
    }

    pub fn save_path(&self) -> PathBuf {
        persistence::save_path(&self.save_dir)
    }
}
