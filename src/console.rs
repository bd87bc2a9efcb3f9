//! Operator console for the headless driver
//!
//! One command per line:
//!
//! ```text
//! rods 1=0 2=50      set rod insertions [%]
//! az5                emergency insertion of all free rods
//! pump 3 on|off
//! turbine on|off
//! pause              toggle pause
//! reset [easy|hard]
//! status
//! quit
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::persistence::{self, PersistError};
use crate::reactor::ReactorSimulator;
use crate::safety;
use crate::state::{format_clock, Difficulty, ReactorState};

#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    Rods(BTreeMap<usize, i64>),
    Az5,
    Pump { id: usize, on: bool },
    Turbine(bool),
    Pause,
    Reset(Difficulty),
    Status,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid value '{0}'")]
    InvalidValue(String),
}

fn parse_switch(word: Option<&str>, usage: &'static str) -> Result<bool, CommandError> {
    match word {
        Some("on") | Some("connect") => Ok(true),
        Some("off") | Some("disconnect") => Ok(false),
        Some(other) => Err(CommandError::InvalidValue(other.to_string())),
        None => Err(CommandError::Usage(usage)),
    }
}

pub fn parse_command(line: &str) -> Result<OperatorCommand, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Empty);
    };

    match head.to_ascii_lowercase().as_str() {
        "rods" | "rod" => {
            let mut insertions = BTreeMap::new();
            for pair in words {
                let (id, value) = pair
                    .split_once('=')
                    .ok_or(CommandError::Usage("rods <id>=<insertion> ..."))?;
                let id: usize = id.parse().map_err(|_| CommandError::InvalidValue(id.to_string()))?;
                let value: i64 = value.parse().map_err(|_| CommandError::InvalidValue(value.to_string()))?;
                insertions.insert(id, value);
            }
            if insertions.is_empty() {
                return Err(CommandError::Usage("rods <id>=<insertion> ..."));
            }
            Ok(OperatorCommand::Rods(insertions))
        }
        "az5" | "az-5" | "scram" => Ok(OperatorCommand::Az5),
        "pump" => {
            const USAGE: &str = "pump <id> on|off";
            let id = words.next().ok_or(CommandError::Usage(USAGE))?;
            let id: usize = id.parse().map_err(|_| CommandError::InvalidValue(id.to_string()))?;
            let on = parse_switch(words.next(), USAGE)?;
            Ok(OperatorCommand::Pump { id, on })
        }
        "turbine" => Ok(OperatorCommand::Turbine(parse_switch(words.next(), "turbine on|off")?)),
        "pause" | "resume" => Ok(OperatorCommand::Pause),
        "reset" => {
            let difficulty: Difficulty = match words.next() {
                Some(word) => word.parse().map_err(|_| CommandError::InvalidValue(word.to_string()))?,
                None => Difficulty::default(),
            };
            Ok(OperatorCommand::Reset(difficulty))
        }
        "status" => Ok(OperatorCommand::Status),
        "quit" | "exit" => Ok(OperatorCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Apply a state-changing command. Status and Quit leave the state alone.
pub fn execute(simulator: &ReactorSimulator, command: &OperatorCommand) -> ReactorState {
    match command {
        OperatorCommand::Rods(insertions) => simulator.set_rod_insertions(insertions),
        OperatorCommand::Az5 => simulator.trigger_emergency_scram(),
        OperatorCommand::Pump { id, on } => simulator.set_pump_on(*id, *on),
        OperatorCommand::Turbine(connected) => simulator.set_turbine_connected(*connected),
        OperatorCommand::Pause => simulator.toggle_pause(),
        OperatorCommand::Reset(difficulty) => simulator.reset(*difficulty),
        OperatorCommand::Status | OperatorCommand::Quit => simulator.get_state(),
    }
}

/// Update the save file after a command: a reset forgets the saved game,
/// anything else stores the new snapshot.
pub fn persist_after(command: &OperatorCommand, path: &Path, state: &ReactorState) -> Result<(), PersistError> {
    match command {
        OperatorCommand::Reset(_) => persistence::clear(path),
        _ => persistence::save(path, state),
    }
}

/// Multi-line readout for the terminal
pub fn status_report(state: &ReactorState) -> String {
    let rods = state
        .control_rods
        .iter()
        .map(|r| format!("{}{}", r.insertion, if r.stuck { "!" } else { "" }))
        .collect::<Vec<_>>()
        .join(" ");
    let pumps = state
        .water_pumps
        .iter()
        .map(|p| match (p.on, p.powered) {
            (true, true) => "ON",
            (true, false) => "ON(no power)",
            (false, _) => "off",
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = vec![
        format!(
            "[{}] radioactivity {:.0}  reactor {:.0}°  fuel {:.0}°  steam {:.0}  xenon {:.1}",
            format_clock(state.game_time),
            state.radioactivity,
            state.reactor_temp,
            state.fuel_temp,
            state.steam_volume,
            state.xenon,
        ),
        format!(
            "power {:.0}/{:.0} MW  performance {:.1}%  turbine {}",
            state.power_output,
            state.power_target,
            state.performance,
            if state.turbine_connected { "connected" } else { "disconnected" },
        ),
        format!("rods {}", rods),
        format!("pumps {}", pumps),
    ];

    for event in &state.active_events {
        lines.push(format!("EVENT: {}", event.message));
    }
    lines.extend(state.warnings.iter().cloned());
    if safety::is_nominal(state) {
        lines.push("All systems nominal".to_string());
    }
    if let Some(reason) = &state.game_over_reason {
        lines.push(format!("GAME OVER: {}", reason));
    } else if state.has_won {
        lines.push("SHIFT COMPLETE: the grid held until relief arrived".to_string());
    } else if state.is_paused {
        lines.push("PAUSED".to_string());
    }
    lines.join("\n")
}
