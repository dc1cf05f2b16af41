//! Vehicle-class selection.
//!
//! The global mix is boosted per zone, for evening pickups and for
//! weekends, renormalized, then forced inside the configured bounds.

use crate::{
    calendar::{is_weekend, EVENING_PEAK},
    config::{VehicleBoosts, VehicleBounds, VehicleMix, ZoneProfile},
    rng::StreamRng,
    types::{Hour, VehicleType},
};
use chrono::Weekday;

const ECONOMY: usize = 0;
const COMFORT: usize = 1;
const XL: usize = 2;

/// Boosted, normalized and bounded shares for one pickup.
pub fn vehicle_shares(
    mix: &VehicleMix,
    boosts: &VehicleBoosts,
    bounds: &VehicleBounds,
    zone: &ZoneProfile,
    hour: Hour,
    weekday: Weekday,
) -> [f64; 3] {
    let mut shares = mix.shares();
    shares[COMFORT] += zone.comfort_boost;
    if EVENING_PEAK.contains(&hour) {
        shares[COMFORT] += boosts.evening_comfort;
    }
    if is_weekend(weekday) {
        shares[XL] += boosts.weekend_xl;
    }
    apply_bounds(shares, bounds)
}

/// Normalize `shares`, then pin any share that breaks its bound to the
/// bound and spread the difference over the remaining classes in
/// proportion to their shares. The economy floor is checked first.
pub fn apply_bounds(shares: [f64; 3], bounds: &VehicleBounds) -> [f64; 3] {
    let mut shares = shares.map(|s| s.max(0.0));
    let mut pinned = [false; 3];

    for _ in 0..=shares.len() {
        rescale_free(&mut shares, &pinned);

        let violation = if !pinned[ECONOMY] && shares[ECONOMY] < bounds.economy_floor {
            Some((ECONOMY, bounds.economy_floor))
        } else if !pinned[COMFORT] && shares[COMFORT] > bounds.comfort_ceiling {
            Some((COMFORT, bounds.comfort_ceiling))
        } else if !pinned[XL] && shares[XL] > bounds.xl_ceiling {
            Some((XL, bounds.xl_ceiling))
        } else {
            None
        };

        match violation {
            Some((i, bound)) => {
                shares[i] = bound;
                pinned[i] = true;
            }
            None => break,
        }
    }
    shares
}

/// Scale the unpinned shares so that all shares sum to 1.
fn rescale_free(shares: &mut [f64; 3], pinned: &[bool; 3]) {
    let pinned_total: f64 = (0..3).filter(|i| pinned[*i]).map(|i| shares[i]).sum();
    let free: Vec<usize> = (0..3).filter(|i| !pinned[*i]).collect();
    if free.is_empty() {
        return;
    }
    let target = (1.0 - pinned_total).max(0.0);
    let free_total: f64 = free.iter().map(|i| shares[*i]).sum();
    for i in free.iter().copied() {
        shares[i] = if free_total > 0.0 {
            shares[i] * target / free_total
        } else {
            target / free.len() as f64
        };
    }
}

pub fn draw_vehicle(shares: &[f64; 3], rng: &mut StreamRng) -> VehicleType {
    VehicleType::ALL[rng.weighted_index(shares)]
}
