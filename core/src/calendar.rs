//! Demand calendar: owns the hour-by-hour selection weights for the
//! whole simulation window and samples pickup timestamps from them.
//!
//! Each (day, hour) slot is weighted by:
//!   baseline[hour] × weekday multiplier × seasonal multiplier
//! Slots are sampled jointly, so the weekday multipliers shift volume
//! between days as well as between hours.

use crate::{
    config::{min_max, DemandConfig, SimulationWindow},
    rng::StreamRng,
    types::Hour,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

pub const MORNING_PEAK: std::ops::RangeInclusive<Hour> = 6..=9;
pub const EVENING_PEAK: std::ops::RangeInclusive<Hour> = 18..=21;

/// A sampled pickup slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotDraw {
    pub timestamp: NaiveDateTime,
    pub hour: Hour,
    pub weekday: Weekday,
}

pub struct DemandCalendar {
    window: SimulationWindow,
    /// Running total of slot weights, one entry per (day, hour).
    cumulative: Vec<f64>,
    hour_loads: [f64; 24],
}

impl DemandCalendar {
    pub fn new(window: SimulationWindow, demand: &DemandConfig) -> Self {
        let mut cumulative = Vec::with_capacity(window.hour_slots());
        let mut total = 0.0;
        for day in 0..window.days {
            let date = window.date_at(day);
            let day_mult = demand.weekday_multipliers[date.weekday().num_days_from_monday() as usize];
            for hour in 0..24u32 {
                total += demand.hourly_baseline[hour as usize]
                    * day_mult
                    * seasonal_multiplier(demand, date, hour);
                cumulative.push(total);
            }
        }

        let (min, max) = min_max(&demand.hourly_baseline);
        let hour_loads = demand.hourly_baseline.map(|w| normalize(w, min, max));

        Self {
            window,
            cumulative,
            hour_loads,
        }
    }

    pub fn window(&self) -> &SimulationWindow {
        &self.window
    }

    /// Hour-load for `hour`: the baseline weight rescaled onto [0, 1].
    pub fn hour_load(&self, hour: Hour) -> f64 {
        self.hour_loads[hour as usize % 24]
    }

    /// Draw a slot, then a uniform minute and second inside it.
    pub fn sample(&self, rng: &mut StreamRng) -> SlotDraw {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let target = rng.next_f64() * total;
        let slot = self
            .cumulative
            .partition_point(|c| *c <= target)
            .min(self.cumulative.len().saturating_sub(1));

        let date = self.window.date_at((slot / 24) as u32);
        let hour = (slot % 24) as Hour;
        let minute = rng.next_u64_below(60) as u32;
        let second = rng.next_u64_below(60) as u32;
        let timestamp = date
            .and_hms_opt(hour, minute, second)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));

        SlotDraw {
            timestamp,
            hour,
            weekday: date.weekday(),
        }
    }
}

pub fn seasonal_multiplier(demand: &DemandConfig, date: NaiveDate, hour: Hour) -> f64 {
    match date.month() {
        6..=8 if EVENING_PEAK.contains(&hour) => demand.summer_evening_multiplier,
        12 | 1 | 2 if MORNING_PEAK.contains(&hour) => demand.winter_morning_multiplier,
        _ => 1.0,
    }
}

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Rescale `value` from [min, max] onto [0, 1].
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::StreamRng;
    use chrono::Timelike;

    fn calendar() -> DemandCalendar {
        DemandCalendar::new(SimulationWindow::default(), &DemandConfig::default())
    }

    #[test]
    fn hour_loads_span_unit_interval() {
        let cal = calendar();
        let loads: Vec<f64> = (0..24).map(|h| cal.hour_load(h)).collect();
        assert!(loads.iter().all(|l| (0.0..=1.0).contains(l)));
        assert_eq!(cal.hour_load(19), 1.0);
        assert_eq!(cal.hour_load(3), 0.0);
    }

    #[test]
    fn samples_stay_inside_window() {
        let cal = calendar();
        let window = *cal.window();
        let mut rng = StreamRng::new(42, 0, 0);
        for _ in 0..2_000 {
            let draw = cal.sample(&mut rng);
            assert!(window.offset_of(draw.timestamp.date()).is_some());
            assert_eq!(draw.timestamp.hour(), draw.hour);
        }
    }

    #[test]
    fn evening_peak_outdraws_overnight() {
        let cal = calendar();
        let mut rng = StreamRng::new(1, 0, 0);
        let mut by_hour = [0usize; 24];
        for _ in 0..20_000 {
            by_hour[cal.sample(&mut rng).hour as usize] += 1;
        }
        assert!(by_hour[19] > by_hour[3] * 4, "19h={} 3h={}", by_hour[19], by_hour[3]);
        assert!(by_hour[8] > by_hour[13]);
    }

    #[test]
    fn seasonal_multipliers_apply_to_their_windows() {
        let demand = DemandConfig::default();
        let july = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        let january = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
        assert_eq!(seasonal_multiplier(&demand, july, 19), 1.12);
        assert_eq!(seasonal_multiplier(&demand, july, 8), 1.0);
        assert_eq!(seasonal_multiplier(&demand, january, 8), 1.08);
        assert_eq!(seasonal_multiplier(&demand, january, 19), 1.0);
    }
}
