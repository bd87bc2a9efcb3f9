//! RBMK Control Room Library
//!
//! Tick-driven simulation of an RBMK core as seen from the control room:
//! the operator moves control rods, starts pumps and connects the turbine,
//! while the core evolves radioactivity, temperatures, steam and xenon,
//! random grid and plant events arrive, and the shift ends in victory,
//! meltdown or a missed grid target.
//!
//! The physics and event logic are pure functions over one `ReactorState`
//! value; `ReactorSimulator` wraps that value for a driver that ticks it
//! once per second.

pub mod state;
pub mod physics;
pub mod controls;
pub mod events;
pub mod safety;
pub mod engine;
pub mod reactor;
pub mod persistence;
pub mod config;
pub mod console;
#[cfg(feature = "desktop")]
pub mod commands;

pub use config::SimulatorConfig;
pub use controls::ControlUpdate;
pub use engine::tick;
pub use reactor::ReactorSimulator;
pub use state::{ControlRod, Difficulty, EventKind, GameEvent, ReactorState, WaterPump};
