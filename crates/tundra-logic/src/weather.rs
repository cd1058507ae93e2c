//! Outdoor temperature - a rolling three-day window of daily min/max.
//!
//! The generator keeps yesterday, today and tomorrow. Each day rollover
//! slides the window forward and rolls a new tomorrow: its average drifts
//! a little from today's, its spread is a random fluctuation around that
//! average, and both ends get a constant one-degree nudge toward the
//! month's climate average so the weather cannot wander off indefinitely.
//!
//! Within a day the outdoor temperature is a piecewise-linear curve through
//! yesterday's max, today's min (at 05:00), today's max (at 15:00) and
//! tomorrow's min.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WeatherConfig;
use crate::constants::calendar::{SECONDS_PER_DAY, SECONDS_PER_HOUR};
use crate::constants::weather::monthly_average;
use crate::geometry::lerp;

const COLDEST_AT: f32 = 5.0 * SECONDS_PER_HOUR;
const WARMEST_AT: f32 = 15.0 * SECONDS_PER_HOUR;

/// One day's temperature range in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTemperature {
    pub min: f32,
    pub max: f32,
}

impl DayTemperature {
    /// A range of `spread` degrees either side of `average`.
    pub fn around(average: f32, spread: f32) -> Self {
        let spread = spread.abs();
        Self {
            min: average - spread,
            max: average + spread,
        }
    }

    pub fn average(&self) -> f32 {
        (self.min + self.max) / 2.0
    }
}

/// The draws behind one rolled day, kept so callers can inspect them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRoll {
    /// Today's average at the moment of the roll.
    pub previous_average: f32,
    /// Average drawn for the new tomorrow.
    pub average: f32,
    /// Half spread drawn for the new tomorrow, before the monthly nudge.
    pub fluctuation: f32,
    /// `+pull` when the average sat below the month's climate, `-pull` otherwise.
    pub nudge: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureGenerator {
    pub yesterday: DayTemperature,
    pub today: DayTemperature,
    pub tomorrow: DayTemperature,
    config: WeatherConfig,
}

impl TemperatureGenerator {
    /// Seed all three days from the month's climate average.
    pub fn new(month: u32, config: WeatherConfig) -> Self {
        let day = DayTemperature::around(monthly_average(month), config.daily_fluctuation / 2.0);
        Self {
            yesterday: day,
            today: day,
            tomorrow: day,
            config,
        }
    }

    /// Slide the window by one day and roll a new tomorrow.
    ///
    /// `month` is the calendar month the rollover landed in; its climate
    /// average decides the direction of the nudge.
    pub fn roll_day(&mut self, month: u32, rng: &mut impl Rng) -> DailyRoll {
        let drift = self.config.daily_average_drift;
        let previous_average = self.today.average();
        let average = rng.gen_range(previous_average - drift..=previous_average + drift);

        self.yesterday = self.today;
        self.today = self.tomorrow;

        let spread = self.config.daily_fluctuation;
        let fluctuation: f32 = rng.gen_range(-spread..=spread);
        let nudge = if average < monthly_average(month) {
            self.config.monthly_pull
        } else {
            -self.config.monthly_pull
        };

        let mut tomorrow = DayTemperature::around(average, fluctuation);
        tomorrow.min += nudge;
        tomorrow.max += nudge;
        self.tomorrow = tomorrow;

        DailyRoll {
            previous_average,
            average,
            fluctuation,
            nudge,
        }
    }

    /// Outdoor temperature at a point of the current day.
    pub fn temperature_at(&self, seconds_in_day: f32) -> f32 {
        let s = seconds_in_day.clamp(0.0, SECONDS_PER_DAY);
        if s < COLDEST_AT {
            lerp(self.yesterday.max, self.today.min, s / COLDEST_AT)
        } else if s < WARMEST_AT {
            lerp(
                self.today.min,
                self.today.max,
                (s - COLDEST_AT) / (WARMEST_AT - COLDEST_AT),
            )
        } else {
            lerp(
                self.today.max,
                self.tomorrow.min,
                (s - WARMEST_AT) / (SECONDS_PER_DAY - WARMEST_AT),
            )
        }
    }
}
