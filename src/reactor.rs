//! RBMK control-room simulator handle
//!
//! `ReactorSimulator` owns the single authoritative `ReactorState` and the
//! random source behind mutexes. Every tick and every operator action
//! computes a whole new state from a snapshot and swaps it in under the
//! lock, so a tick never sees half of a control change.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::controls::{self, ControlUpdate};
use crate::engine;
use crate::state::{Difficulty, ReactorState};

/// Reactor simulation engine
pub struct ReactorSimulator {
    pub state: Mutex<ReactorState>,
    rng: Mutex<ChaCha8Rng>,
}

impl Default for ReactorSimulator {
    fn default() -> Self {
        Self::new(Difficulty::default(), None)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ReactorSimulator {
    /// Fresh shift. A seed makes the run reproducible.
    pub fn new(difficulty: Difficulty, seed: Option<u64>) -> Self {
        Self::from_state(ReactorState::new(difficulty), seed)
    }

    /// Resume from a saved snapshot
    pub fn from_state(state: ReactorState, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            state: Mutex::new(state),
            rng: Mutex::new(rng),
        }
    }

    /// Swap in the result of `f` under a single lock
    fn replace<F>(&self, f: F) -> ReactorState
    where
        F: FnOnce(&ReactorState) -> ReactorState,
    {
        let mut state = lock(&self.state);
        let next = f(&state);
        *state = next.clone();
        next
    }

    /// Advance one simulated second
    pub fn step(&self) -> ReactorState {
        let mut rng = lock(&self.rng);
        self.replace(|state| engine::tick(state, &mut *rng))
    }

    /// Get current state snapshot
    pub fn get_state(&self) -> ReactorState {
        lock(&self.state).clone()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).is_running()
    }

    pub fn set_rod_insertions(&self, insertions: &BTreeMap<usize, i64>) -> ReactorState {
        self.replace(|state| controls::set_rod_insertions(state, insertions))
    }

    /// AZ-5
    pub fn trigger_emergency_scram(&self) -> ReactorState {
        info!("AZ-5 pressed: inserting all free control rods");
        self.replace(controls::emergency_scram)
    }

    pub fn set_pump_on(&self, pump_id: usize, on: bool) -> ReactorState {
        self.replace(|state| controls::set_pump_on(state, pump_id, on))
    }

    pub fn set_turbine_connected(&self, connected: bool) -> ReactorState {
        self.replace(|state| controls::set_turbine_connected(state, connected))
    }

    pub fn apply_controls(&self, update: &ControlUpdate) -> ReactorState {
        self.replace(|state| controls::apply_controls(state, update))
    }

    pub fn toggle_pause(&self) -> ReactorState {
        self.replace(controls::toggle_pause)
    }

    /// Reset simulation to initial state
    pub fn reset(&self, difficulty: Difficulty) -> ReactorState {
        info!("Resetting simulation ({:?})", difficulty);
        self.replace(|_| ReactorState::new(difficulty))
    }
}
