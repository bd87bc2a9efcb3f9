//! Control-room state model
//!
//! One `ReactorState` value holds everything the simulation knows: the five
//! coupled core variables, the operator-facing hardware (rods, pumps,
//! turbine), the countdown clock and the event lists. It is owned by the
//! caller and replaced wholesale on every tick or control action.

use serde::{Deserialize, Serialize};

/// Game-design constants (tuned for play, not taken from plant data)
pub mod constants {
    pub const NUM_CONTROL_RODS: usize = 10;
    pub const NUM_WATER_PUMPS: usize = 4;

    pub const RADIOACTIVITY_MAX: f64 = 1000.0;
    pub const STEAM_MAX: f64 = 600.0;
    pub const XENON_MAX: f64 = 100.0;
    pub const PERFORMANCE_MAX: f64 = 100.0;
    /// Floor for reactor and fuel temperature
    pub const TEMP_FLOOR: f64 = 5.0;

    pub const EASY_TIME_LIMIT: u32 = 900;
    pub const HARD_TIME_LIMIT: u32 = 1800;

    pub const INITIAL_RADIOACTIVITY: f64 = 100.0;
    pub const INITIAL_TEMP: f64 = 330.0;
    pub const INITIAL_STEAM: f64 = 100.0;
    pub const INITIAL_POWER_TARGET: f64 = 5000.0;
    pub const INITIAL_PERFORMANCE: f64 = 100.0;

    /// Power delivered per unit of steam when the turbine is connected [MW]
    pub const MW_PER_STEAM: f64 = 50.0;
}

/// Warning and termination thresholds
pub struct Thresholds;

impl Thresholds {
    pub const RADIOACTIVITY_HIGH: f64 = 250.0;
    pub const RADIOACTIVITY_LOW: f64 = 50.0;
    pub const REACTOR_TEMP_WARNING: f64 = 800.0;
    pub const MELTDOWN_TEMP: f64 = 1200.0;
    pub const FUEL_TEMP_HIGH: f64 = 900.0;
    pub const FUEL_TEMP_LOW: f64 = 90.0;
    pub const STEAM_HIGH: f64 = 300.0;
    pub const STEAM_LOW: f64 = 0.0;
    pub const PERFORMANCE_WARNING: f64 = 50.0;
    pub const PERFORMANCE_GAME_OVER: f64 = 0.0;
    /// Fraction of the power target accepted as "on target"
    pub const POWER_TOLERANCE: f64 = 0.1;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    /// Countdown length in seconds
    pub fn time_limit(self) -> u32 {
        match self {
            Difficulty::Easy => constants::EASY_TIME_LIMIT,
            Difficulty::Hard => constants::HARD_TIME_LIMIT,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// State of a single control rod
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControlRod {
    pub id: usize,                     // 1..=10
    pub insertion: u8,                 // 0 = fully withdrawn, 100 = fully inserted [%]
    pub stuck: bool,
    pub currently_fully_removed: bool,
    pub just_reinserted: bool,         // one-shot, cleared in the same control action
}

impl ControlRod {
    pub fn new(id: usize, insertion: u8) -> Self {
        Self {
            id,
            insertion,
            stuck: false,
            currently_fully_removed: insertion == 0,
            just_reinserted: false,
        }
    }
}

/// State of a primary coolant pump
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaterPump {
    pub id: usize,     // 1..=4
    pub on: bool,      // operator intent
    pub powered: bool, // grid availability
}

impl WaterPump {
    /// A pump only moves water when it is both switched on and powered
    pub fn is_cooling(&self) -> bool {
        self.on && self.powered
    }
}

/// What an event does to the plant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EventKind {
    #[serde(rename_all = "camelCase")]
    TargetChange { new_target: f64 },
    /// Pump indices (0-based) that lose grid power
    #[serde(rename_all = "camelCase")]
    PowerCut { affected_pumps: Vec<usize> },
    /// Rod indices (0-based) that jam in place
    #[serde(rename_all = "camelCase")]
    RodStuck { affected_rods: Vec<usize> },
}

impl EventKind {
    /// Power cuts and stuck rods take capability away from the operator
    pub fn is_disruptive(&self) -> bool {
        !matches!(self, EventKind::TargetChange { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::TargetChange { .. } => "target-change",
            EventKind::PowerCut { .. } => "power-cut",
            EventKind::RodStuck { .. } => "rod-stuck",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub id: String,
    pub kind: EventKind,
    pub message: String,
    pub timestamp: u32,        // gameTime when the event fired
    pub duration: Option<f64>, // [s], none for target changes
}

/// Complete control-room state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReactorState {
    // Core
    pub radioactivity: f64,
    pub reactor_temp: f64,
    pub fuel_temp: f64,
    pub steam_volume: f64,
    pub xenon: f64,

    // Power and grid
    pub power_output: f64,   // [MW]
    pub power_target: f64,   // [MW]
    pub performance: f64,    // [%]

    // Controls
    pub control_rods: Vec<ControlRod>,
    pub water_pumps: Vec<WaterPump>,
    pub turbine_connected: bool,

    // Game
    pub difficulty: Difficulty,
    pub time_limit: u32,     // [s]
    pub game_time: u32,      // countdown [s]
    pub is_paused: bool,
    pub is_game_over: bool,
    pub has_won: bool,
    pub game_over_reason: Option<String>,

    // Events
    pub active_events: Vec<GameEvent>,
    pub event_history: Vec<GameEvent>,
    pub last_event_time: u32,
    pub just_had_power_cut: bool,

    // Derived every tick
    pub warnings: Vec<String>,
}

impl ReactorState {
    /// Start-of-shift state for the chosen difficulty
    pub fn new(difficulty: Difficulty) -> Self {
        let time_limit = difficulty.time_limit();

        // Six rods at 37 %, four at 44 %
        let control_rods = (0..constants::NUM_CONTROL_RODS)
            .map(|i| ControlRod::new(i + 1, if i < 6 { 37 } else { 44 }))
            .collect();

        // Pumps 1-2 running
        let water_pumps = (0..constants::NUM_WATER_PUMPS)
            .map(|i| WaterPump { id: i + 1, on: i < 2, powered: true })
            .collect();

        Self {
            radioactivity: constants::INITIAL_RADIOACTIVITY,
            reactor_temp: constants::INITIAL_TEMP,
            fuel_temp: constants::INITIAL_TEMP,
            steam_volume: constants::INITIAL_STEAM,
            xenon: 0.0,
            power_output: constants::INITIAL_POWER_TARGET,
            power_target: constants::INITIAL_POWER_TARGET,
            performance: constants::INITIAL_PERFORMANCE,
            control_rods,
            water_pumps,
            turbine_connected: true,
            difficulty,
            time_limit,
            game_time: time_limit,
            is_paused: false,
            is_game_over: false,
            has_won: false,
            game_over_reason: None,
            active_events: Vec::new(),
            event_history: Vec::new(),
            last_event_time: time_limit,
            just_had_power_cut: false,
            warnings: Vec::new(),
        }
    }

    /// Ticks only advance while the game is live and not paused
    pub fn is_running(&self) -> bool {
        !self.is_paused && !self.is_game_over && !self.has_won
    }

    pub fn is_terminal(&self) -> bool {
        self.is_game_over || self.has_won
    }

    pub fn active_cooling_pumps(&self) -> usize {
        self.water_pumps.iter().filter(|p| p.is_cooling()).count()
    }

    pub fn has_active_disruption(&self) -> bool {
        self.active_events.iter().any(|e| e.kind.is_disruptive())
    }

    /// Check a state that came from outside the simulation (a save file)
    /// against the shape and ranges every tick preserves.
    pub fn validate(&self) -> Result<(), String> {
        fn in_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), String> {
            if value.is_finite() && (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(format!("{} {} outside {}..={}", name, value, min, max))
            }
        }

        if self.control_rods.len() != constants::NUM_CONTROL_RODS {
            return Err(format!("expected {} control rods, found {}", constants::NUM_CONTROL_RODS, self.control_rods.len()));
        }
        for (i, rod) in self.control_rods.iter().enumerate() {
            if rod.id != i + 1 {
                return Err(format!("control rod {} has id {}", i + 1, rod.id));
            }
            if rod.insertion > 100 {
                return Err(format!("control rod {} inserted {}%", rod.id, rod.insertion));
            }
        }
        if self.water_pumps.len() != constants::NUM_WATER_PUMPS {
            return Err(format!("expected {} water pumps, found {}", constants::NUM_WATER_PUMPS, self.water_pumps.len()));
        }
        for (i, pump) in self.water_pumps.iter().enumerate() {
            if pump.id != i + 1 {
                return Err(format!("water pump {} has id {}", i + 1, pump.id));
            }
        }

        in_range("radioactivity", self.radioactivity, 0.0, constants::RADIOACTIVITY_MAX)?;
        in_range("steamVolume", self.steam_volume, 0.0, constants::STEAM_MAX)?;
        in_range("xenon", self.xenon, 0.0, constants::XENON_MAX)?;
        in_range("performance", self.performance, 0.0, constants::PERFORMANCE_MAX)?;
        in_range("reactorTemp", self.reactor_temp, constants::TEMP_FLOOR, f64::MAX)?;
        in_range("fuelTemp", self.fuel_temp, constants::TEMP_FLOOR, f64::MAX)?;
        in_range("powerOutput", self.power_output, 0.0, f64::MAX)?;
        in_range("powerTarget", self.power_target, 0.0, f64::MAX)?;

        if self.time_limit != self.difficulty.time_limit() {
            return Err(format!("time limit {} does not match {:?}", self.time_limit, self.difficulty));
        }
        if self.game_time > self.time_limit || self.last_event_time > self.time_limit {
            return Err(format!("clock {} beyond time limit {}", self.game_time, self.time_limit));
        }

        for event in &self.active_events {
            let out_of_bounds = match &event.kind {
                EventKind::TargetChange { .. } => false,
                EventKind::PowerCut { affected_pumps } => {
                    affected_pumps.iter().any(|&i| i >= constants::NUM_WATER_PUMPS)
                }
                EventKind::RodStuck { affected_rods } => {
                    affected_rods.iter().any(|&i| i >= constants::NUM_CONTROL_RODS)
                }
            };
            if out_of_bounds {
                return Err(format!("event {} refers to missing hardware", event.id));
            }
        }
        Ok(())
    }
}

impl Default for ReactorState {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

/// Countdown display, `HH:MM:SS`
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
