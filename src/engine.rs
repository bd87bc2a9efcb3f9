//! One simulated second
//!
//! `tick` is the only place the countdown advances. The caller drives it
//! once per elapsed second; it holds no timers of its own.

use log::{debug, info};
use rand::Rng;

use crate::events;
use crate::physics;
use crate::safety;
use crate::state::ReactorState;

/// Sea-water intake temperature range [°C]
pub const AMBIENT_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

pub fn draw_ambient<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(AMBIENT_RANGE) as f64
}

/// Compute the next state. Paused or finished games come back unchanged.
pub fn tick<R: Rng + ?Sized>(state: &ReactorState, rng: &mut R) -> ReactorState {
    let mut next = state.clone();
    if !next.is_running() {
        return next;
    }

    let ambient = draw_ambient(rng);
    physics::apply(&mut next, ambient);

    next.game_time = next.game_time.saturating_sub(1);
    if next.game_time == 0 && !next.has_won {
        next.has_won = true;
        next.is_paused = true;
        info!("Shift completed: countdown reached zero with performance {:.1}%", next.performance);
        return next;
    }

    for event in events::expire_events(&mut next) {
        info!("Event {} ({}) expired", event.id, event.kind.label());
    }

    if events::should_trigger(&next, rng) {
        let event = events::generate_event(&next, rng);
        info!("Event {} ({}): {}", event.id, event.kind.label(), event.message);
        events::apply_event(&mut next, event);
    }

    next.warnings = safety::check_warnings(&next);

    if let Some(reason) = safety::check_termination(&next) {
        next.is_game_over = true;
        next.game_over_reason = Some(reason.to_string());
        info!("Game over at {}s remaining: {}", next.game_time, reason);
    }

    debug!(
        "t={} R={:.1} Tr={:.1} Tf={:.1} steam={:.1} Xe={:.2} P={:.0}/{:.0} perf={:.1}",
        next.game_time,
        next.radioactivity,
        next.reactor_temp,
        next.fuel_temp,
        next.steam_volume,
        next.xenon,
        next.power_output,
        next.power_target,
        next.performance,
    );

    next
}
