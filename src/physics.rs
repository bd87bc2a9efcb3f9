//! Core physics for one simulated second
//!
//! Pure functions: each computes a per-tick change from the current state.
//! `apply` runs them in order (radioactivity, temperatures, steam, power,
//! performance, xenon) so later stages see the values written by earlier ones.
//! The ambient sea-water temperature is drawn by the caller and passed in.

use crate::state::{constants, ControlRod, ReactorState, Thresholds};

/// Radioactivity model coefficients
pub mod reactivity {
    /// Constant source term per tick
    pub const BASELINE: f64 = 2.0;
    pub const ROD_SCALE: f64 = 0.05;
    /// Per-rod contribution when only the graphite tip is in the core
    pub const GRAPHITE_TIP: f64 = 4.0;
    pub const GRAPHITE_TIP_DEPTH: u8 = 5;
    pub const BORON_PER_PERCENT: f64 = 0.2;

    pub const HOT_FUEL: f64 = 700.0;
    pub const HOT_FUEL_COEFF: f64 = 0.01;
    pub const WARM_FUEL_LOW: f64 = 50.0;
    pub const WARM_FUEL_HIGH: f64 = 120.0;
    pub const WARM_FUEL_COEFF: f64 = 0.01;
    pub const COLD_FUEL_COEFF: f64 = 0.19;

    pub const XENON_COEFF: f64 = 0.065;
    pub const VOID_ONSET: f64 = 20.0;
    pub const VOID_COEFF: f64 = 0.02;
}

/// Thermal model coefficients
pub mod thermal {
    pub const PASSIVE_COOLING_COEFF: f64 = 0.0003;
    pub const PASSIVE_COOLING_MAX: f64 = 3.0;
    /// (band upper edge, heating rate) for each radioactivity tier
    pub const HEATING_TIERS: [(f64, f64); 4] = [
        (50.0, 0.01),
        (150.0, 0.032),
        (250.0, 0.013),
        (f64::INFINITY, 0.045),
    ];
    pub const PUMP_COOLING: f64 = 1.0;
    pub const PUMP_COOLING_OFFSET: f64 = 0.002;
    pub const FUEL_LAG: f64 = 0.03;
}

/// Steam model coefficients
pub mod steam {
    pub const BOILING_ONSET: f64 = 90.0;
    pub const CONDENSATION_RATE: f64 = 0.5;
    pub const TARGET_TEMP_MAX: f64 = 800.0;
    pub const TARGET_STEAM_MAX: f64 = 300.0;
    pub const CHASE_RATE: f64 = 0.5;
    /// Extra steam per unit radioactivity when no pump is cooling
    pub const RUNAWAY_COEFF: f64 = 0.1;
}

/// Performance and xenon coefficients
pub mod grid {
    pub const PERFORMANCE_STEP: f64 = 0.2;

    pub const XENON_FAST_BUILD_BELOW: f64 = 10.0;
    pub const XENON_SLOW_BUILD_BELOW: f64 = 50.0;
    pub const XENON_FAST_BUILD: f64 = 0.5;
    pub const XENON_SLOW_BUILD: f64 = 0.25;
    pub const XENON_FAST_BURN_ABOVE: f64 = 150.0;
    pub const XENON_SLOW_BURN_ABOVE: f64 = 90.0;
    pub const XENON_FAST_BURN: f64 = 24.0;
    pub const XENON_SLOW_BURN: f64 = 16.0;
}

/// Raw rod contribution before scaling
pub fn rod_contribution(rods: &[ControlRod]) -> f64 {
    rods.iter()
        .map(|rod| match rod.insertion {
            0 => 0.0,
            i if i <= reactivity::GRAPHITE_TIP_DEPTH => reactivity::GRAPHITE_TIP,
            i => -(i as f64) * reactivity::BORON_PER_PERCENT,
        })
        .sum()
}

/// Fuel temperature feedback: hot fuel damps, cold fuel excites
pub fn fuel_temperature_term(fuel_temp: f64) -> f64 {
    use reactivity::*;
    if fuel_temp > HOT_FUEL {
        -(fuel_temp - HOT_FUEL) * HOT_FUEL_COEFF
    } else if fuel_temp > WARM_FUEL_LOW && fuel_temp < WARM_FUEL_HIGH {
        (WARM_FUEL_HIGH - fuel_temp) * WARM_FUEL_COEFF
    } else if fuel_temp <= WARM_FUEL_LOW {
        (WARM_FUEL_LOW - fuel_temp) * COLD_FUEL_COEFF
    } else {
        0.0
    }
}

pub fn radioactivity_change(state: &ReactorState) -> f64 {
    use reactivity::*;
    let mut change = BASELINE + ROD_SCALE * rod_contribution(&state.control_rods);
    change += fuel_temperature_term(state.fuel_temp);
    change -= state.xenon * XENON_COEFF;
    // Positive void coefficient
    if state.steam_volume > VOID_ONSET {
        change += state.steam_volume * VOID_COEFF;
    }
    change
}

/// Heating from radioactivity, each tier's rate applied to its own band
pub fn radioactive_heating(radioactivity: f64) -> f64 {
    let mut lower = 0.0;
    let mut heat = 0.0;
    for (upper, rate) in thermal::HEATING_TIERS {
        if radioactivity <= lower {
            break;
        }
        heat += (radioactivity.min(upper) - lower) * rate;
        lower = upper;
    }
    heat
}

pub fn passive_cooling(reactor_temp: f64, ambient: f64) -> f64 {
    if reactor_temp > ambient {
        ((reactor_temp - ambient) * thermal::PASSIVE_COOLING_COEFF).min(thermal::PASSIVE_COOLING_MAX)
    } else {
        0.0
    }
}

/// Returns (reactor temperature change, fuel temperature change)
pub fn temperature_change(state: &ReactorState, ambient: f64) -> (f64, f64) {
    let pump_cooling = state.active_cooling_pumps() as f64 * thermal::PUMP_COOLING + thermal::PUMP_COOLING_OFFSET;
    let reactor = radioactive_heating(state.radioactivity)
        - passive_cooling(state.reactor_temp, ambient)
        - pump_cooling;
    let fuel = (state.reactor_temp - state.fuel_temp) * thermal::FUEL_LAG;
    (reactor, fuel)
}

/// Steam level the boiler settles at for a given reactor temperature
pub fn steam_target(reactor_temp: f64) -> f64 {
    let span = steam::TARGET_TEMP_MAX - steam::BOILING_ONSET;
    let t = reactor_temp.clamp(steam::BOILING_ONSET, steam::TARGET_TEMP_MAX);
    (t - steam::BOILING_ONSET) / span * steam::TARGET_STEAM_MAX
}

pub fn steam_change(state: &ReactorState) -> f64 {
    let t = state.reactor_temp;
    if t < steam::BOILING_ONSET {
        return -(steam::BOILING_ONSET - t) * steam::CONDENSATION_RATE;
    }
    let mut change = (steam_target(t) - state.steam_volume) * steam::CHASE_RATE;
    if state.active_cooling_pumps() == 0 {
        change += state.radioactivity * steam::RUNAWAY_COEFF;
    }
    change
}

pub fn power_output(state: &ReactorState) -> f64 {
    if state.turbine_connected {
        state.steam_volume * constants::MW_PER_STEAM
    } else {
        0.0
    }
}

/// Whether output sits inside the ±10 % band around the target
pub fn on_target(power_output: f64, power_target: f64) -> bool {
    let tolerance = power_target * Thresholds::POWER_TOLERANCE;
    power_output >= power_target - tolerance && power_output <= power_target + tolerance
}

pub fn performance_change(state: &ReactorState) -> f64 {
    if on_target(state.power_output, state.power_target) {
        grid::PERFORMANCE_STEP
    } else {
        -grid::PERFORMANCE_STEP
    }
}

/// Xenon builds up in a quiet core and burns off in a busy one
pub fn xenon_change(radioactivity: f64) -> f64 {
    use grid::*;
    let mut change = 0.0;
    if radioactivity <= XENON_FAST_BUILD_BELOW {
        change += XENON_FAST_BUILD;
    } else if radioactivity < XENON_SLOW_BUILD_BELOW {
        change += XENON_SLOW_BUILD;
    }
    if radioactivity > XENON_FAST_BURN_ABOVE {
        change -= XENON_FAST_BURN;
    } else if radioactivity > XENON_SLOW_BURN_ABOVE {
        change -= XENON_SLOW_BURN;
    }
    change
}

/// Advance the core one tick in place
pub fn apply(state: &mut ReactorState, ambient: f64) {
    state.radioactivity = (state.radioactivity + radioactivity_change(state))
        .clamp(0.0, constants::RADIOACTIVITY_MAX);

    let (reactor_delta, fuel_delta) = temperature_change(state, ambient);
    state.reactor_temp = (state.reactor_temp + reactor_delta).max(constants::TEMP_FLOOR);
    state.fuel_temp = (state.fuel_temp + fuel_delta).max(constants::TEMP_FLOOR);

    state.steam_volume = (state.steam_volume + steam_change(state)).clamp(0.0, constants::STEAM_MAX);

    state.power_output = power_output(state);

    state.performance = (state.performance + performance_change(state))
        .clamp(0.0, constants::PERFORMANCE_MAX);

    state.xenon = (state.xenon + xenon_change(state.radioactivity)).clamp(0.0, constants::XENON_MAX);
}
