//! Demand-pressure formulas.
//!
//! Wait time, surge and cancellation all read the same two signals,
//! hour-load and zone-load, so they move together across the dataset.
//! Every function here is pure: randomness is drawn by the generator
//! and passed in as an explicit noise term.

pub const WAIT_MIN_MINUTES: f64 = 2.0;
pub const WAIT_MAX_MINUTES: f64 = 15.0;
pub const WAIT_NOISE_SD: f64 = 0.6;

pub const SURGE_MIN: f64 = 1.0;
pub const SURGE_MAX: f64 = 3.0;
pub const SURGE_NOISE_SD: f64 = 0.10;

pub const CANCEL_BASE_RATE: f64 = 0.05;
pub const CANCEL_MIN: f64 = 0.02;
pub const CANCEL_MAX: f64 = 0.35;

const HOUR_WEIGHT: f64 = 0.65;
const ZONE_WEIGHT: f64 = 0.35;

// wait = WAIT_MIN + WAIT_SPAN × sigmoid(WAIT_STEEPNESS × (pressure − 0.5))
const WAIT_SPAN: f64 = 8.0;
const WAIT_STEEPNESS: f64 = 6.0;

const SURGE_PRESSURE_GAIN: f64 = 1.2;
const SURGE_WAIT_GAIN: f64 = 0.08;

const CANCEL_WAIT_FROM: f64 = 5.0;
const CANCEL_WAIT_TO: f64 = 20.0;
const CANCEL_WAIT_MAX_TERM: f64 = 0.20;
const CANCEL_SURGE_FROM: f64 = 2.5;
const CANCEL_SURGE_MAX_TERM: f64 = 0.10;

pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Blend of the two pressure signals, in [0, 1].
pub fn demand_pressure(hour_load: f64, zone_load: f64) -> f64 {
    (HOUR_WEIGHT * hour_load + ZONE_WEIGHT * zone_load).clamp(0.0, 1.0)
}

/// Minutes until pickup. Off-peak in a quiet zone lands near 2–4
/// minutes, peak hours in the busiest zones near 10–12.
pub fn wait_time_minutes(hour_load: f64, zone_load: f64, zone_offset: f64, noise: f64) -> f64 {
    let pressure = demand_pressure(hour_load, zone_load);
    let base = WAIT_MIN_MINUTES + WAIT_SPAN * logistic(WAIT_STEEPNESS * (pressure - 0.5));
    (base + zone_offset + noise).clamp(WAIT_MIN_MINUTES, WAIT_MAX_MINUTES)
}

/// Surge multiplier. Rises with pressure and with the already drawn
/// wait time.
pub fn surge_multiplier(hour_load: f64, zone_load: f64, wait_minutes: f64, noise: f64) -> f64 {
    let pressure = demand_pressure(hour_load, zone_load);
    let surge = SURGE_MIN
        + SURGE_PRESSURE_GAIN * pressure.powf(1.5)
        + SURGE_WAIT_GAIN * (wait_minutes - WAIT_MIN_MINUTES).max(0.0)
        + noise;
    surge.clamp(SURGE_MIN, SURGE_MAX)
}

/// Wait contribution to cancellation, 0 at ≤5 minutes and
/// CANCEL_WAIT_MAX_TERM at ≥20 minutes, S-shaped in between.
fn wait_cancel_term(wait_minutes: f64) -> f64 {
    let x = ((wait_minutes - CANCEL_WAIT_FROM) / (CANCEL_WAIT_TO - CANCEL_WAIT_FROM)).clamp(0.0, 1.0);
    let lo = logistic(-5.0);
    let hi = logistic(5.0);
    CANCEL_WAIT_MAX_TERM * (logistic(10.0 * (x - 0.5)) - lo) / (hi - lo)
}

/// Surge contribution to cancellation, 0 until 2.5× and linear up to
/// CANCEL_SURGE_MAX_TERM at 3.0×.
fn surge_cancel_term(surge: f64) -> f64 {
    let x = ((surge - CANCEL_SURGE_FROM) / (SURGE_MAX - CANCEL_SURGE_FROM)).clamp(0.0, 1.0);
    CANCEL_SURGE_MAX_TERM * x
}

pub fn cancellation_probability(wait_minutes: f64, surge: f64) -> f64 {
    (CANCEL_BASE_RATE + wait_cancel_term(wait_minutes) + surge_cancel_term(surge))
        .clamp(CANCEL_MIN, CANCEL_MAX)
}
