//! Operator actions
//!
//! Every function takes the current state and returns the replacement
//! state. Unknown rod or pump ids are ignored and insertion requests are
//! clamped to 0..=100, so none of these can fail.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{constants, ReactorState};

/// Graphite-tip transient when a fully withdrawn rod goes back in
pub const REINSERTION_RADIOACTIVITY_SPIKE: f64 = 50.0;
pub const REINSERTION_TEMP_SPIKE: f64 = 20.0;

/// A batch of operator changes applied as one replacement
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControlUpdate {
    /// Rod id (1-based) to requested insertion [%]
    #[serde(default)]
    pub rods: BTreeMap<usize, i64>,
    /// Pump id (1-based) to on/off
    #[serde(default)]
    pub pumps: BTreeMap<usize, bool>,
    #[serde(default)]
    pub turbine: Option<bool>,
}

pub fn clamp_insertion(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Move rods to new insertions.
///
/// Stuck rods keep their position. A rod leaving the fully withdrawn
/// position is flagged as just reinserted, the spike is applied to the
/// core, and the flag is cleared again before the state is returned, so
/// the spike lands exactly once.
pub fn set_rod_insertions(state: &ReactorState, insertions: &BTreeMap<usize, i64>) -> ReactorState {
    let mut next = state.clone();
    let mut spikes = 0usize;

    for rod in next.control_rods.iter_mut() {
        let Some(&requested) = insertions.get(&rod.id) else {
            continue;
        };
        if rod.stuck {
            continue;
        }

        let insertion = clamp_insertion(requested);
        rod.just_reinserted = rod.currently_fully_removed && insertion > 0;
        rod.currently_fully_removed = insertion == 0;
        rod.insertion = insertion;

        if rod.just_reinserted {
            spikes += 1;
            rod.just_reinserted = false;
        }
    }

    if spikes > 0 {
        let n = spikes as f64;
        next.radioactivity = (next.radioactivity + REINSERTION_RADIOACTIVITY_SPIKE * n)
            .clamp(0.0, constants::RADIOACTIVITY_MAX);
        next.reactor_temp += REINSERTION_TEMP_SPIKE * n;
    }

    next
}

/// AZ-5: drive every rod that can move to full insertion
pub fn emergency_scram(state: &ReactorState) -> ReactorState {
    let all_in: BTreeMap<usize, i64> = state
        .control_rods
        .iter()
        .filter(|rod| !rod.stuck)
        .map(|rod| (rod.id, 100))
        .collect();
    set_rod_insertions(state, &all_in)
}

pub fn set_pump_on(state: &ReactorState, pump_id: usize, on: bool) -> ReactorState {
    let mut next = state.clone();
    if let Some(pump) = next.water_pumps.iter_mut().find(|p| p.id == pump_id) {
        pump.on = on;
    }
    next
}

pub fn set_turbine_connected(state: &ReactorState, connected: bool) -> ReactorState {
    let mut next = state.clone();
    next.turbine_connected = connected;
    next
}

/// Pausing has no effect once the game has ended
pub fn toggle_pause(state: &ReactorState) -> ReactorState {
    let mut next = state.clone();
    if !next.is_terminal() {
        next.is_paused = !next.is_paused;
    }
    next
}

pub fn apply_controls(state: &ReactorState, update: &ControlUpdate) -> ReactorState {
    let mut next = if update.rods.is_empty() {
        state.clone()
    } else {
        set_rod_insertions(state, &update.rods)
    };
    for (&pump_id, &on) in &update.pumps {
        if let Some(pump) = next.water_pumps.iter_mut().find(|p| p.id == pump_id) {
            pump.on = on;
        }
    }
    if let Some(connected) = update.turbine {
        next.turbine_connected = connected;
    }
    next
}
