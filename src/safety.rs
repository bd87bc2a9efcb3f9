//! Warnings and terminal conditions
//!
//! Warnings are recomputed from scratch each tick. Termination is checked
//! separately and is one-way: once the game is over it stays over.

use std::fmt;

use crate::state::{ReactorState, Thresholds};

pub const WARN_RADIOACTIVITY_HIGH: &str =
    "WARNING: High radioactivity. Reactor temperature expected to spike. Insert control rods further to reduce radioactivity.";
pub const WARN_RADIOACTIVITY_LOW: &str =
    "WARNING: Low radioactivity. Xenon is expected to build up and suppress the core further. Withdraw control rods to raise radioactivity.";
pub const WARN_REACTOR_TEMP_HIGH: &str =
    "WARNING: High reactor temperature. Steam and radioactivity expected to spike. Start more water pumps to cool the core.";
pub const WARN_FUEL_TEMP_HIGH: &str =
    "WARNING: High fuel temperature. Radioactivity may drop as a result. Start more water pumps to cool the fuel.";
pub const WARN_FUEL_TEMP_LOW: &str =
    "WARNING: Low fuel temperature. Radioactivity is expected to spike. Stop some water pumps to let the core warm up.";
pub const WARN_STEAM_HIGH: &str =
    "WARNING: High steam pressure. Disconnect the turbine to protect the transmission infrastructure.";
pub const WARN_STEAM_LOW: &str =
    "WARNING: Low steam pressure is reducing power generation. Stop some water pumps and withdraw control rods.";
pub const WARN_PERFORMANCE_LOW: &str =
    "WARNING: The grid reports low target performance. Review the power target.";

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    Meltdown,
    PerformanceFailure,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Meltdown => write!(f, "MELTDOWN - Reactor temperature exceeded safe limits"),
            TerminationReason::PerformanceFailure => {
                write!(f, "PERFORMANCE FAILURE - Unable to meet power requirements")
            }
        }
    }
}

pub fn check_warnings(state: &ReactorState) -> Vec<String> {
    let checks = [
        (state.radioactivity >= Thresholds::RADIOACTIVITY_HIGH, WARN_RADIOACTIVITY_HIGH),
        (state.radioactivity <= Thresholds::RADIOACTIVITY_LOW, WARN_RADIOACTIVITY_LOW),
        (state.reactor_temp >= Thresholds::REACTOR_TEMP_WARNING, WARN_REACTOR_TEMP_HIGH),
        (state.fuel_temp >= Thresholds::FUEL_TEMP_HIGH, WARN_FUEL_TEMP_HIGH),
        (state.fuel_temp <= Thresholds::FUEL_TEMP_LOW, WARN_FUEL_TEMP_LOW),
        (state.steam_volume >= Thresholds::STEAM_HIGH, WARN_STEAM_HIGH),
        (state.steam_volume <= Thresholds::STEAM_LOW, WARN_STEAM_LOW),
        (state.performance < Thresholds::PERFORMANCE_WARNING, WARN_PERFORMANCE_LOW),
    ];

    checks
        .iter()
        .filter(|(active, _)| *active)
        .map(|(_, message)| message.to_string())
        .collect()
}

/// Meltdown takes precedence when both conditions hold
pub fn check_termination(state: &ReactorState) -> Option<TerminationReason> {
    if state.reactor_temp >= Thresholds::MELTDOWN_TEMP {
        Some(TerminationReason::Meltdown)
    } else if state.performance <= Thresholds::PERFORMANCE_GAME_OVER {
        Some(TerminationReason::PerformanceFailure)
    } else {
        None
    }
}

/// Nothing to report: no warnings and no disruption in progress
pub fn is_nominal(state: &ReactorState) -> bool {
    check_warnings(state).is_empty() && !state.has_active_disruption()
}
