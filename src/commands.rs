//! Tauri commands for the control-room simulator
//!
//! These commands are exposed to the frontend via Tauri's IPC mechanism.
//! Every command returns the full state snapshot so the UI can re-render
//! from a single value.

use std::collections::BTreeMap;
use std::sync::Arc;

use tauri::State;

use crate::controls::ControlUpdate;
use crate::reactor::ReactorSimulator;
use crate::state::{Difficulty, ReactorState};

/// Simulation state wrapper for Tauri
pub struct SimulatorState(pub Arc<ReactorSimulator>);

/// Get current reactor state
#[tauri::command]
pub fn get_reactor_state(simulator: State<SimulatorState>) -> ReactorState {
    simulator.0.get_state()
}

/// Advance one simulated second (the frontend timer calls this at 1 Hz)
#[tauri::command]
pub fn simulation_step(simulator: State<SimulatorState>) -> ReactorState {
    simulator.0.step()
}

#[tauri::command(rename_all = "camelCase")]
pub fn set_rod_insertions(simulator: State<SimulatorState>, insertions: BTreeMap<usize, i64>) -> ReactorState {
    simulator.0.set_rod_insertions(&insertions)
}

/// AZ-5
#[tauri::command]
pub fn trigger_emergency_scram(simulator: State<SimulatorState>) -> ReactorState {
    simulator.0.trigger_emergency_scram()
}

#[tauri::command(rename_all = "camelCase")]
pub fn set_pump_on(simulator: State<SimulatorState>, pump_id: usize, on: bool) -> ReactorState {
    simulator.0.set_pump_on(pump_id, on)
}

#[tauri::command]
pub fn set_turbine_connected(simulator: State<SimulatorState>, connected: bool) -> ReactorState {
    simulator.0.set_turbine_connected(connected)
}

/// Rods, pumps and turbine from one modal submit, applied as a single change
#[tauri::command]
pub fn apply_controls(simulator: State<SimulatorState>, update: ControlUpdate) -> ReactorState {
    simulator.0.apply_controls(&update)
}

#[tauri::command]
pub fn toggle_pause(simulator: State<SimulatorState>) -> ReactorState {
    simulator.0.toggle_pause()
}

/// Reset simulation to initial state
#[tauri::command]
pub fn reset_to_initial(simulator: State<SimulatorState>, difficulty: Difficulty) -> ReactorState {
    simulator.0.reset(difficulty)
}

/// Builder with the simulator managed and every command registered.
/// The host application supplies its own context when running it.
pub fn builder(simulator: Arc<ReactorSimulator>) -> tauri::Builder<tauri::Wry> {
    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .manage(SimulatorState(simulator))
        .invoke_handler(tauri::generate_handler![
            get_reactor_state,
            simulation_step,
            set_rod_insertions,
            trigger_emergency_scram,
            set_pump_on,
            set_turbine_connected,
            apply_controls,
            toggle_pause,
            reset_to_initial,
        ])
}
