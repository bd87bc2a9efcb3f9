//! Random grid and plant events
//!
//! An event slot goes idle -> armed -> active -> expired. Target changes
//! replace the previous target and never expire. Power cuts and stuck rods
//! are timed, never overlap, and alternate with each other.
//!
//! All timestamps are in countdown seconds (`gameTime`), so elapsed time is
//! `timestamp - game_time`.

use rand::seq::index;
use rand::Rng;

use crate::state::{constants, Difficulty, EventKind, GameEvent, ReactorState};

/// No new event until this long after the previous one [s]
pub const EVENT_MIN_INTERVAL: i64 = 120;
/// Trigger probability reaches 100 % this long after the previous event [s]
pub const EVENT_MAX_INTERVAL: i64 = 240;
pub const BASE_TRIGGER_PROBABILITY: f64 = 0.01;
pub const DISRUPTIVE_PROBABILITY: f64 = 1.0 / 3.0;

/// Difficulty-dependent event ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventProfile {
    /// No events in the last seconds of the countdown
    pub quiet_window: u32,
    pub target_range: (f64, f64),
    pub power_cut_duration: (f64, f64),
    pub rod_stuck_duration: (f64, f64),
    pub rod_stuck_count: (usize, usize),
}

impl EventProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                quiet_window: 30,
                target_range: (2000.0, 8000.0),
                power_cut_duration: (20.0, 60.0),
                rod_stuck_duration: (30.0, 90.0),
                rod_stuck_count: (4, 7),
            },
            Difficulty::Hard => Self {
                quiet_window: 60,
                target_range: (1000.0, 11000.0),
                power_cut_duration: (30.0, 90.0),
                rod_stuck_duration: (60.0, 180.0),
                rod_stuck_count: (5, 8),
            },
        }
    }
}

/// Seconds since the last event fired
pub fn time_since_last_event(state: &ReactorState) -> i64 {
    state.last_event_time as i64 - state.game_time as i64
}

/// Chance of firing this tick, ramping 1 % -> 100 % between the intervals
pub fn trigger_probability(elapsed: i64) -> f64 {
    if elapsed < EVENT_MIN_INTERVAL {
        return 0.0;
    }
    let ramp = ((elapsed - EVENT_MIN_INTERVAL) as f64 / (EVENT_MAX_INTERVAL - EVENT_MIN_INTERVAL) as f64).min(1.0);
    (BASE_TRIGGER_PROBABILITY + ramp * (1.0 - BASE_TRIGGER_PROBABILITY)).min(1.0)
}

pub fn should_trigger<R: Rng + ?Sized>(state: &ReactorState, rng: &mut R) -> bool {
    let profile = EventProfile::for_difficulty(state.difficulty);
    if state.game_time <= profile.quiet_window || state.has_active_disruption() {
        return false;
    }

    let probability = trigger_probability(time_since_last_event(state));
    probability > 0.0 && rng.gen_bool(probability)
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    low + rng.gen::<f64>() * (high - low)
}

pub fn generate_event<R: Rng + ?Sized>(state: &ReactorState, rng: &mut R) -> GameEvent {
    let profile = EventProfile::for_difficulty(state.difficulty);
    let id = format!("event-{}", state.event_history.len() + 1);
    let timestamp = state.game_time;

    if rng.gen::<f64>() < DISRUPTIVE_PROBABILITY {
        if state.just_had_power_cut {
            rod_stuck_event(id, timestamp, &profile, rng)
        } else {
            power_cut_event(id, timestamp, &profile, rng)
        }
    } else {
        target_change_event(id, timestamp, &profile, rng)
    }
}

fn target_change_event<R: Rng + ?Sized>(
    id: String,
    timestamp: u32,
    profile: &EventProfile,
    rng: &mut R,
) -> GameEvent {
    let new_target = (uniform(rng, profile.target_range) / 100.0).round() * 100.0;
    GameEvent {
        id,
        kind: EventKind::TargetChange { new_target },
        message: format!("INCOMING FROM GRID CONTROLLER: Power target changed to {:.0} MW", new_target),
        timestamp,
        duration: None,
    }
}

fn power_cut_event<R: Rng + ?Sized>(
    id: String,
    timestamp: u32,
    profile: &EventProfile,
    rng: &mut R,
) -> GameEvent {
    GameEvent {
        id,
        kind: EventKind::PowerCut {
            affected_pumps: (0..constants::NUM_WATER_PUMPS).collect(),
        },
        message: "UPDATE FROM HEAD ENGINEER: Power cut detected. The pumps have no power and are not moving cooling water through the core.".to_string(),
        timestamp,
        duration: Some(uniform(rng, profile.power_cut_duration)),
    }
}

fn rod_stuck_event<R: Rng + ?Sized>(
    id: String,
    timestamp: u32,
    profile: &EventProfile,
    rng: &mut R,
) -> GameEvent {
    let duration = uniform(rng, profile.rod_stuck_duration);
    let (min_rods, max_rods) = profile.rod_stuck_count;
    let count = rng.gen_range(min_rods..=max_rods);
    let affected_rods = index::sample(rng, constants::NUM_CONTROL_RODS, count).into_vec();

    let mut rod_numbers: Vec<usize> = affected_rods.iter().map(|idx| idx + 1).collect();
    rod_numbers.sort_unstable();
    let listed = rod_numbers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ");

    GameEvent {
        id,
        kind: EventKind::RodStuck { affected_rods },
        message: format!(
            "UPDATE FROM HEAD ENGINEER: Control rods {} are stuck in position after a fuel channel rupture",
            listed
        ),
        timestamp,
        duration: Some(duration),
    }
}

/// Put an event into force
pub fn apply_event(state: &mut ReactorState, event: GameEvent) {
    match &event.kind {
        EventKind::TargetChange { new_target } => {
            state
                .active_events
                .retain(|e| !matches!(e.kind, EventKind::TargetChange { .. }));
            state.power_target = *new_target;
        }
        EventKind::PowerCut { affected_pumps } => {
            for (idx, pump) in state.water_pumps.iter_mut().enumerate() {
                if affected_pumps.contains(&idx) {
                    pump.powered = false;
                }
            }
            state.just_had_power_cut = true;
        }
        EventKind::RodStuck { affected_rods } => {
            for (idx, rod) in state.control_rods.iter_mut().enumerate() {
                if affected_rods.contains(&idx) {
                    rod.stuck = true;
                }
            }
            state.just_had_power_cut = false;
        }
    }

    state.last_event_time = state.game_time;
    state.event_history.push(event.clone());
    state.active_events.push(event);
}

pub fn is_expired(event: &GameEvent, game_time: u32) -> bool {
    match event.duration {
        Some(duration) => (event.timestamp as f64 - game_time as f64) >= duration,
        None => false,
    }
}

fn revert_event(state: &mut ReactorState, event: &GameEvent) {
    match &event.kind {
        EventKind::TargetChange { .. } => {}
        EventKind::PowerCut { affected_pumps } => {
            for (idx, pump) in state.water_pumps.iter_mut().enumerate() {
                if affected_pumps.contains(&idx) {
                    pump.powered = true;
                }
            }
        }
        EventKind::RodStuck { affected_rods } => {
            for (idx, rod) in state.control_rods.iter_mut().enumerate() {
                if affected_rods.contains(&idx) {
                    rod.stuck = false;
                }
            }
        }
    }
}

/// Drop timed-out events and restore what they took away. Returns the expired events.
pub fn expire_events(state: &mut ReactorState) -> Vec<GameEvent> {
    let game_time = state.game_time;
    let (expired, still_active): (Vec<_>, Vec<_>) = std::mem::take(&mut state.active_events)
        .into_iter()
        .partition(|e| is_expired(e, game_time));
    state.active_events = still_active;

    for event in &expired {
        revert_event(state, event);
    }
    expired
}
