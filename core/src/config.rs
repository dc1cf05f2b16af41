use crate::{
    error::{SimError, SimResult},
    types::{VehicleType, Zone},
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a weight set sums to 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Longest window a config may ask for: ten years of hourly slots.
pub const MAX_WINDOW_DAYS: u32 = 3_660;

// ── Simulation window ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationWindow {
    pub start_date: NaiveDate,
    pub days: u32,
}

impl SimulationWindow {
    /// Date `day_offset` days after the start. Saturates at
    /// `NaiveDate::MAX`; a validated window never gets there.
    pub fn date_at(&self, day_offset: u32) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(day_offset as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    /// First date after the window, or `None` when it is not representable.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.start_date.checked_add_days(Days::new(self.days as u64))
    }

    /// Day offset of `date` inside the window, if it falls inside.
    pub fn offset_of(&self, date: NaiveDate) -> Option<u32> {
        let offset = (date - self.start_date).num_days();
        (0..self.days as i64).contains(&offset).then_some(offset as u32)
    }

    pub fn hour_slots(&self) -> usize {
        self.days as usize * 24
    }
}

impl Default for SimulationWindow {
    fn default() -> Self {
        Self {
            // 2023 is not a leap year, so 365 days cover it exactly.
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            days: 365,
        }
    }
}

// ── Demand curve ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandConfig {
    /// Baseline request weight for each hour of the day (index = hour).
    pub hourly_baseline: [f64; 24],
    /// Day-of-week multipliers, Monday first.
    pub weekday_multipliers: [f64; 7],
    /// Applied to hours 18..=21 in June, July and August.
    pub summer_evening_multiplier: f64,
    /// Applied to hours 6..=9 in December, January and February.
    pub winter_morning_multiplier: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            hourly_baseline: [
                0.30, 0.20, 0.14, 0.10, 0.10, 0.18, // 00-05 overnight
                0.55, 0.90, 1.00, 0.82,             // 06-09 morning peak
                0.62, 0.60, 0.66, 0.63, 0.60, 0.64, // 10-15 midday
                0.72, 0.86,                         // 16-17 shoulder
                1.00, 1.05, 0.96, 0.80,             // 18-21 evening peak
                0.52, 0.38,                         // 22-23 wind-down
            ],
            weekday_multipliers: [0.85, 0.95, 1.00, 1.00, 1.18, 1.25, 0.92],
            summer_evening_multiplier: 1.12,
            winter_morning_multiplier: 1.08,
        }
    }
}

// ── Zones ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub zone: Zone,
    /// Share of pickups; all zone weights form one distribution.
    pub demand_weight: f64,
    /// Minutes added to the modelled wait time for this zone.
    pub wait_offset_minutes: f64,
    pub distance_shape: f64,
    pub distance_scale_km: f64,
    /// Additive boost to the Comfort share for pickups in this zone.
    #[serde(default)]
    pub comfort_boost: f64,
}

fn default_zones() -> Vec<ZoneProfile> {
    let profile = |zone, demand_weight, wait_offset_minutes, shape, scale, comfort_boost| {
        ZoneProfile {
            zone,
            demand_weight,
            wait_offset_minutes,
            distance_shape: shape,
            distance_scale_km: scale,
            comfort_boost,
        }
    };
    vec![
        profile(Zone::Vake,        0.28, 2.5, 2.2, 1.4, 0.10),
        profile(Zone::Saburtalo,   0.24, 2.0, 2.3, 1.5, 0.06),
        profile(Zone::OldTown,     0.18, 0.8, 1.6, 1.0, 0.0),
        profile(Zone::Shardeni,    0.12, 0.5, 1.9, 1.2, 0.0),
        profile(Zone::Nadzaladevi, 0.10, 0.0, 2.5, 1.7, 0.0),
        profile(Zone::Gldani,      0.08, 0.0, 2.9, 1.9, 0.0),
    ]
}

// ── Vehicles ───────────────────────────────────────────────────────

/// A share per vehicle class, in `VehicleType::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleMix {
    pub economy: f64,
    pub comfort: f64,
    pub xl: f64,
}

impl VehicleMix {
    pub fn shares(&self) -> [f64; 3] {
        [self.economy, self.comfort, self.xl]
    }

    pub fn from_shares(shares: [f64; 3]) -> Self {
        Self {
            economy: shares[0],
            comfort: shares[1],
            xl: shares[2],
        }
    }

    pub fn share(&self, vehicle: VehicleType) -> f64 {
        self.shares()[vehicle.index()]
    }
}

impl Default for VehicleMix {
    fn default() -> Self {
        Self {
            economy: 0.72,
            comfort: 0.20,
            xl: 0.08,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleBoosts {
    /// Comfort boost for pickups in hours 18..=21.
    pub evening_comfort: f64,
    /// XL boost for pickups on Saturday and Sunday.
    pub weekend_xl: f64,
}

impl Default for VehicleBoosts {
    fn default() -> Self {
        Self {
            evening_comfort: 0.05,
            weekend_xl: 0.06,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleBounds {
    pub economy_floor: f64,
    pub comfort_ceiling: f64,
    pub xl_ceiling: f64,
}

impl Default for VehicleBounds {
    fn default() -> Self {
        Self {
            economy_floor: 0.45,
            comfort_ceiling: 0.45,
            xl_ceiling: 0.25,
        }
    }
}

// ── Fares ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareConfig {
    pub base_fee: f64,
    pub per_km_rate: f64,
    /// Class multipliers applied to the whole fare.
    pub class_multipliers: VehicleMix,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fee: 2.50,
            per_km_rate: 1.20,
            class_multipliers: VehicleMix {
                economy: 1.0,
                comfort: 1.35,
                xl: 1.70,
            },
        }
    }
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub window: SimulationWindow,
    #[serde(default)]
    pub demand: DemandConfig,
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneProfile>,
    #[serde(default)]
    pub vehicle_mix: VehicleMix,
    #[serde(default)]
    pub vehicle_boosts: VehicleBoosts,
    #[serde(default)]
    pub vehicle_bounds: VehicleBounds,
    #[serde(default)]
    pub fare: FareConfig,
    /// Probability that a ride ends in the zone it started in.
    #[serde(default = "default_same_zone_dropoff")]
    pub same_zone_dropoff_probability: f64,
}

fn default_same_zone_dropoff() -> f64 {
    0.45
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window: SimulationWindow::default(),
            demand: DemandConfig::default(),
            zones: default_zones(),
            vehicle_mix: VehicleMix::default(),
            vehicle_boosts: VehicleBoosts::default(),
            vehicle_bounds: VehicleBounds::default(),
            fare: FareConfig::default(),
            same_zone_dropoff_probability: default_same_zone_dropoff(),
        }
    }
}

impl GeneratorConfig {
    /// Load a JSON config file. Omitted sections fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Profile for `zone`; always `Some` on a validated config.
    pub fn zone_profile(&self, zone: Zone) -> Option<&ZoneProfile> {
        self.zones.iter().find(|p| p.zone == zone)
    }

    /// Zone weights in `Zone::ALL` order. A zone without a profile weighs 0.
    pub fn zone_weights(&self) -> [f64; 6] {
        Zone::ALL.map(|z| self.zone_profile(z).map_or(0.0, |p| p.demand_weight))
    }

    /// Reject any config the generator cannot honour.
    /// Called before any generation work starts.
    pub fn validate(&self) -> SimResult<()> {
        if self.window.days == 0 {
            return invalid("simulation window must cover at least one day");
        }
        if self.window.days > MAX_WINDOW_DAYS {
            return invalid(&format!(
                "simulation window of {} days exceeds the {MAX_WINDOW_DAYS}-day maximum",
                self.window.days
            ));
        }
        if self.window.end_date().is_none() {
            return invalid(&format!(
                "simulation window starting {} runs past the last representable date",
                self.window.start_date
            ));
        }

        self.validate_demand()?;
        self.validate_zones()?;
        self.validate_vehicles()?;

        let fare = &self.fare;
        if fare.base_fee <= 0.0 || fare.per_km_rate <= 0.0 {
            return invalid("fare base_fee and per_km_rate must be > 0");
        }
        if fare.class_multipliers.shares().iter().any(|m| *m <= 0.0) {
            return invalid("fare class multipliers must be > 0");
        }

        if !(0.0..=1.0).contains(&self.same_zone_dropoff_probability) {
            return invalid("same_zone_dropoff_probability must be within [0, 1]");
        }
        Ok(())
    }

    fn validate_demand(&self) -> SimResult<()> {
        let demand = &self.demand;
        if demand.hourly_baseline.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return invalid("hourly baseline weights must be finite and >= 0");
        }
        let (min, max) = min_max(&demand.hourly_baseline);
        if max <= min {
            return invalid("hourly baseline must not be flat");
        }
        if demand.weekday_multipliers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return invalid("weekday multipliers must be finite and > 0");
        }
        if demand.summer_evening_multiplier <= 0.0 || demand.winter_morning_multiplier <= 0.0 {
            return invalid("seasonal multipliers must be > 0");
        }
        Ok(())
    }

    fn validate_zones(&self) -> SimResult<()> {
        for zone in Zone::ALL {
            let count = self.zones.iter().filter(|p| p.zone == zone).count();
            if count != 1 {
                return invalid(&format!(
                    "zone '{zone}' must appear exactly once, found {count}"
                ));
            }
        }
        if self.zones.len() != Zone::ALL.len() {
            return invalid("unexpected extra zone profiles");
        }

        for p in &self.zones {
            if !p.demand_weight.is_finite() || p.demand_weight < 0.0 {
                return invalid(&format!("zone '{}' has a negative weight", p.zone));
            }
            if p.distance_shape <= 0.0 || p.distance_scale_km <= 0.0 {
                return invalid(&format!(
                    "zone '{}' gamma shape and scale must be > 0",
                    p.zone
                ));
            }
            if p.wait_offset_minutes < 0.0 || p.comfort_boost < 0.0 {
                return invalid(&format!("zone '{}' offsets must be >= 0", p.zone));
            }
        }

        let weights: Vec<f64> = self.zones.iter().map(|p| p.demand_weight).collect();
        check_distribution("zone weights", &weights)?;
        let (min, max) = min_max(&weights);
        if max <= min {
            return invalid("zone weights must not all be equal");
        }

        for (i, a) in self.zones.iter().enumerate() {
            if self.zones[i + 1..]
                .iter()
                .any(|b| a.distance_shape == b.distance_shape)
            {
                return invalid(&format!(
                    "distance shape {} is reused across zones",
                    a.distance_shape
                ));
            }
        }
        Ok(())
    }

    fn validate_vehicles(&self) -> SimResult<()> {
        let mix = self.vehicle_mix.shares();
        if mix.iter().any(|s| *s < 0.0) {
            return invalid("vehicle mix shares must be >= 0");
        }
        check_distribution("vehicle mix", &mix)?;

        let boosts = &self.vehicle_boosts;
        if boosts.evening_comfort < 0.0 || boosts.weekend_xl < 0.0 {
            return invalid("vehicle boosts must be >= 0");
        }

        let b = &self.vehicle_bounds;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(b.economy_floor) || !in_unit(b.comfort_ceiling) || !in_unit(b.xl_ceiling) {
            return invalid("vehicle bounds must lie within [0, 1]");
        }
        if b.economy_floor + b.comfort_ceiling + b.xl_ceiling < 1.0 {
            return invalid("vehicle bounds leave no feasible mix");
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> SimResult<()> {
    Err(SimError::InvalidConfig(reason.to_string()))
}

fn check_distribution(label: &str, weights: &[f64]) -> SimResult<()> {
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return invalid(&format!("{label} must sum to 1.0, got {total:.6}"));
    }
    Ok(())
}

pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        GeneratorConfig::default().validate().unwrap();
    }

    #[test]
    fn zone_weights_follow_all_order() {
        let weights = GeneratorConfig::default().zone_weights();
        assert_eq!(weights, [0.08, 0.10, 0.18, 0.24, 0.12, 0.28]);
    }

    #[test]
    fn window_offsets_round_trip() {
        let window = SimulationWindow::default();
        let last = window.date_at(364);
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(window.offset_of(last), Some(364));
        assert_eq!(window.offset_of(window.date_at(365)), None);
        assert_eq!(window.hour_slots(), 8_760);
    }

    #[test]
    fn date_at_saturates_instead_of_overflowing() {
        let window = SimulationWindow {
            start_date: NaiveDate::MAX,
            days: 1,
        };
        assert_eq!(window.date_at(30), NaiveDate::MAX);
        assert_eq!(window.end_date(), None);
    }

    #[test]
    fn oversized_windows_are_rejected() {
        let mut config = GeneratorConfig::default();
        config.window.days = MAX_WINDOW_DAYS + 1;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        config.window.days = MAX_WINDOW_DAYS;
        config.validate().unwrap();
    }

    #[test]
    fn missing_zone_has_no_profile() {
        let mut config = GeneratorConfig::default();
        config.zones.clear();
        assert!(config.zone_profile(Zone::Vake).is_none());
        assert_eq!(config.zone_weights(), [0.0; 6]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "same_zone_dropoff_probability": 0.3 }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.same_zone_dropoff_probability, 0.3);
        assert_eq!(config.zones.len(), 6);
        config.validate().unwrap();
    }
}
