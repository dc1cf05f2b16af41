//! Trip distance and fare.

use crate::{
    config::{FareConfig, ZoneProfile},
    rng::StreamRng,
    types::VehicleType,
};

/// Shortest trip the generator emits.
pub const MIN_DISTANCE_KM: f64 = 0.3;

/// Gamma-distributed trip length using the pickup zone's parameters.
pub fn draw_distance_km(zone: &ZoneProfile, rng: &mut StreamRng) -> f64 {
    rng.gamma(zone.distance_shape, zone.distance_scale_km)
        .max(MIN_DISTANCE_KM)
}

/// fare = (base_fee + per_km_rate × distance × surge) × class multiplier
///
/// Strictly positive and increasing in both distance and surge.
pub fn fare(config: &FareConfig, distance_km: f64, surge: f64, vehicle: VehicleType) -> f64 {
    let metered = config.per_km_rate * distance_km.max(0.0) * surge.max(0.0);
    (config.base_fee + metered) * config.class_multipliers.share(vehicle)
}
