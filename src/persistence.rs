//! Snapshot persistence
//!
//! The whole `ReactorState` is stored as one JSON document under a fixed
//! storage key. Loading never fails: a missing, unreadable or out-of-range
//! save gives the initial state for the requested difficulty.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::state::{Difficulty, ReactorState};

pub const STORAGE_KEY: &str = "chernobyl-game-state";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file is not a valid snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save file holds an impossible state: {0}")]
    Invalid(String),
}

/// Save file location inside `dir`
pub fn save_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.json", STORAGE_KEY))
}

pub fn to_json(state: &ReactorState) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parse a snapshot and reject any state the simulation could not have produced
pub fn from_json(json: &str) -> Result<ReactorState, PersistError> {
    let state: ReactorState = serde_json::from_str(json)?;
    state.validate().map_err(PersistError::Invalid)?;
    Ok(state)
}

pub fn save(path: &Path, state: &ReactorState) -> Result<(), PersistError> {
    let json = to_json(state)?;
    fs::write(path, json).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load(path: &Path) -> Result<ReactorState, PersistError> {
    let json = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json)
}

/// Saved snapshot, or a fresh one if there is nothing usable on disk
pub fn load_or_initial(path: &Path, difficulty: Difficulty) -> ReactorState {
    match load(path) {
        Ok(state) => {
            debug!("Loaded saved state from {}", path.display());
            state
        }
        Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            debug!("No saved state at {}, starting fresh", path.display());
            ReactorState::new(difficulty)
        }
        Err(err) => {
            warn!("Discarding saved state: {}", err);
            ReactorState::new(difficulty)
        }
    }
}

/// Forget the saved game
pub fn clear(path: &Path) -> Result<(), PersistError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PersistError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
