//! RBMK Control Room - Headless Driver
//!
//! Ticks the simulator once per configured interval, reads operator
//! commands from stdin between ticks and saves the snapshot after every
//! change. The timer stops when the shift is won or lost.

use std::sync::Arc;

use anyhow::Context;
use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};

use rbmk_control_room_lib::console::{self, OperatorCommand};
use rbmk_control_room_lib::persistence;
use rbmk_control_room_lib::{ReactorSimulator, ReactorState, SimulatorConfig};

fn save(path: &std::path::Path, state: &ReactorState) {
    if let Err(err) = persistence::save(path, state) {
        warn!("Could not save state: {}", err);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let config = SimulatorConfig::from_env();
    std::fs::create_dir_all(&config.save_dir)
        .with_context(|| format!("creating save directory {}", config.save_dir.display()))?;
    let save_path = config.save_path();

    let initial = persistence::load_or_initial(&save_path, config.difficulty);
    info!(
        "Starting {:?} shift with {}s on the clock (tick every {:?})",
        initial.difficulty, initial.game_time, config.tick_interval
    );
    let simulator = Arc::new(ReactorSimulator::from_state(initial, config.seed));
    println!("{}", console::status_report(&simulator.get_state()));

    let mut ticker = interval(config.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !simulator.is_running() {
                    continue;
                }
                let state = simulator.step();
                save(&save_path, &state);
                if state.is_terminal() {
                    println!("{}", console::status_report(&state));
                    info!("Simulation stopped; type 'reset' to start again or 'quit' to leave");
                }
            }
            line = lines.next_line(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        stdin_open = false;
                        continue;
                    }
                    Err(err) => {
                        error!("Reading operator input failed: {}", err);
                        stdin_open = false;
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match console::parse_command(&line) {
                    Ok(OperatorCommand::Quit) => break,
                    Ok(command) => {
                        let state = console::execute(&simulator, &command);
                        if let Err(err) = console::persist_after(&command, &save_path, &state) {
                            warn!("Could not update save file: {}", err);
                        }
                        println!("{}", console::status_report(&state));
                    }
                    Err(err) => println!("{}", err),
                }
            }
        }

        if !stdin_open && !simulator.is_running() {
            break;
        }
    }

    save(&save_path, &simulator.get_state());
    info!("Shutting down");
    Ok(())
}
