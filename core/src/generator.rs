//! The row generator.
//!
//! PER-RECORD ORDER (fixed, documented, never reordered):
//!   1. Timestamp      (demand calendar)
//!   2. Pickup zone    (zone weights)
//!   3. Hour-load / zone-load
//!   4. Wait time      (pressure)
//!   5. Surge          (pressure + wait)
//!   6. Cancellation   (wait + surge)
//!   7. Distance       (zone gamma)
//!   8. Vehicle type   (zone / hour / weekend mix)
//!   9. Fare           (distance × surge × class)
//!
//! RULES:
//!   - Each step reads only the record's own earlier steps.
//!   - Each step draws from its own stream in the RngBank.
//!   - No record reads another record.

use crate::{
    calendar::{normalize, DemandCalendar},
    config::{min_max, GeneratorConfig, ZoneProfile},
    error::{SimError, SimResult},
    pressure,
    pricing,
    rng::{RngBank, StreamSlot},
    trip::{round2, TripRecord},
    types::{RideIndex, Zone},
    vehicle,
};

/// Default master seed.
pub const DEFAULT_SEED: u64 = 42;

/// A generated record plus the intermediate signals that produced it.
/// The signals are not part of the exported row.
#[derive(Debug, Clone)]
pub struct TracedRide {
    pub record: TripRecord,
    pub hour_load: f64,
    pub zone_load: f64,
    pub cancel_probability: f64,
}

pub struct RideGenerator {
    config: GeneratorConfig,
    rng_bank: RngBank,
    calendar: DemandCalendar,
    /// Profiles and derived signals in `Zone::ALL` order.
    zone_profiles: Vec<ZoneProfile>,
    zone_weights: [f64; 6],
    zone_loads: [f64; 6],
}

impl RideGenerator {
    /// Validate `config` and precompute the demand tables.
    pub fn new(config: GeneratorConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;

        let zone_profiles = Zone::ALL
            .iter()
            .map(|z| {
                config.zone_profile(*z).cloned().ok_or_else(|| {
                    SimError::InvalidConfig(format!("no profile for zone {z}"))
                })
            })
            .collect::<SimResult<Vec<ZoneProfile>>>()?;
        let zone_weights = config.zone_weights();
        let (min, max) = min_max(&zone_weights);
        let zone_loads = zone_weights.map(|w| normalize(w, min, max));

        Ok(Self {
            calendar: DemandCalendar::new(config.window, &config.demand),
            rng_bank: RngBank::new(seed),
            zone_profiles,
            zone_weights,
            zone_loads,
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Build record `index`. Pure in (seed, config, index).
    pub fn ride(&self, index: RideIndex) -> TracedRide {
        let bank = &self.rng_bank;

        let slot = self
            .calendar
            .sample(&mut bank.for_ride(StreamSlot::Timestamp, index));

        let pickup = Zone::ALL[bank
            .for_ride(StreamSlot::Zone, index)
            .weighted_index(&self.zone_weights)];
        let profile = &self.zone_profiles[pickup.index()];

        let hour_load = self.calendar.hour_load(slot.hour);
        let zone_load = self.zone_loads[pickup.index()];

        let wait_noise = bank
            .for_ride(StreamSlot::Wait, index)
            .normal(0.0, pressure::WAIT_NOISE_SD);
        let wait = round2(pressure::wait_time_minutes(
            hour_load,
            zone_load,
            profile.wait_offset_minutes,
            wait_noise,
        ));

        let surge_noise = bank
            .for_ride(StreamSlot::Surge, index)
            .normal(0.0, pressure::SURGE_NOISE_SD);
        let surge = round2(pressure::surge_multiplier(hour_load, zone_load, wait, surge_noise));

        let cancel_probability = pressure::cancellation_probability(wait, surge);
        let cancelled = bank
            .for_ride(StreamSlot::Cancellation, index)
            .chance(cancel_probability);

        let distance_km = round2(pricing::draw_distance_km(
            profile,
            &mut bank.for_ride(StreamSlot::Distance, index),
        ));

        let shares = vehicle::vehicle_shares(
            &self.config.vehicle_mix,
            &self.config.vehicle_boosts,
            &self.config.vehicle_bounds,
            profile,
            slot.hour,
            slot.weekday,
        );
        let vehicle_type =
            vehicle::draw_vehicle(&shares, &mut bank.for_ride(StreamSlot::Vehicle, index));

        let fare = round2(pricing::fare(&self.config.fare, distance_km, surge, vehicle_type));

        let ride_id = uuid::Builder::from_random_bytes(
            bank.for_ride(StreamSlot::Identity, index).next_bytes16(),
        )
        .into_uuid();

        let dropoff_zone = {
            let mut rng = bank.for_ride(StreamSlot::Dropoff, index);
            if rng.chance(self.config.same_zone_dropoff_probability) {
                pickup
            } else {
                Zone::ALL[rng.weighted_index(&self.zone_weights)]
            }
        };

        TracedRide {
            record: TripRecord {
                ride_id,
                timestamp: slot.timestamp,
                pickup_zone: pickup,
                dropoff_zone,
                vehicle_type,
                distance_km,
                fare,
                wait_time_minutes: wait,
                completed: !cancelled,
                surge_multiplier: surge,
            },
            hour_load,
            zone_load,
            cancel_probability,
        }
    }

    /// Generate records 0..n. Rejects n <= 0 before any work starts.
    pub fn generate(&self, n: i64) -> SimResult<Vec<TripRecord>> {
        if n <= 0 {
            return Err(SimError::InvalidRideCount(n));
        }
        log::info!("Generating {n} rides (seed={})", self.seed());

        let rides: Vec<TripRecord> = (0..n as RideIndex).map(|i| self.ride(i).record).collect();

        let cancelled = rides.iter().filter(|r| r.cancelled()).count();
        log::info!(
            "Generated {} rides, {} cancelled ({:.1}%)",
            rides.len(),
            cancelled,
            100.0 * cancelled as f64 / rides.len() as f64
        );
        Ok(rides)
    }
}

/// Generate `n` rides with the default config.
pub fn generate(n: i64, seed: u64) -> SimResult<Vec<TripRecord>> {
    RideGenerator::new(GeneratorConfig::default(), seed)?.generate(n)
}
