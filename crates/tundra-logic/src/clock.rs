//! World clock - simulated time, calendar, and the environment it drives.
//!
//! A single `f64` of seconds into the current day is authoritative; hour
//! and minute are derived from it after every tick. When the day overflows
//! the clock resets to midnight, dropping whatever excess the tick carried,
//! and cascades day → month → year over a fixed 365-day calendar.
//!
//! The clock never calls out to listeners. `tick` returns a [`ClockTick`]
//! describing what happened (day rollover, respawn timer) and the owner
//! broadcasts it, so no listener can re-enter the clock mid-tick.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ClockConfig, ConfigError, WeatherConfig};
use crate::constants::calendar::{
    days_in_month, MONTHS_PER_YEAR, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::lighting::{light_color, light_intensity, LightColor};
use crate::weather::{DailyRoll, TemperatureGenerator};

/// A calendar date. Months and days are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    /// The following day, cascading into the next month and year.
    pub fn next_day(self) -> Self {
        let mut next = self;
        next.day += 1;
        if next.day > days_in_month(next.month) {
            next.day = 1;
            next.month += 1;
            if next.month > MONTHS_PER_YEAR {
                next.month = 1;
                next.year += 1;
            }
        }
        next
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year {} {:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Why a respawn attempt was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RespawnCause {
    /// The world was just loaded.
    InitialLoad,
    DayRollover,
    /// The periodic respawn timer elapsed.
    Timer,
}

impl RespawnCause {
    pub fn is_initial_load(self) -> bool {
        self == RespawnCause::InitialLoad
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockTick {
    /// Simulated seconds added this tick.
    pub delta: f32,
    /// Set when the day rolled over, with the new date and the weather draw.
    pub rollover: Option<(CalendarDate, DailyRoll)>,
    pub respawn_timer_fired: bool,
}

impl ClockTick {
    pub fn day_rolled(&self) -> bool {
        self.rollover.is_some()
    }

    /// Respawn attempts to broadcast, in firing order.
    pub fn respawn_causes(&self) -> impl Iterator<Item = RespawnCause> {
        let rollover = self.day_rolled().then_some(RespawnCause::DayRollover);
        let timer = self.respawn_timer_fired.then_some(RespawnCause::Timer);
        rollover.into_iter().chain(timer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldClock {
    date: CalendarDate,
    hour: u32,
    minute: u32,
    seconds_in_day: f64,
    seconds_from_start: f64,
    time_multiplier: f32,
    running: bool,
    respawn_interval: f32,
    respawn_accumulator: f32,
    weather: TemperatureGenerator,
    outside_temp: f32,
    light_intensity: f32,
    light_color: LightColor,
}

impl WorldClock {
    pub fn new(clock: &ClockConfig, weather: WeatherConfig) -> Result<Self, ConfigError> {
        clock.validate()?;
        weather.validate()?;

        let mut world_clock = Self {
            date: CalendarDate {
                year: clock.start_year,
                month: clock.start_month,
                day: clock.start_day,
            },
            hour: 0,
            minute: 0,
            seconds_in_day: f64::from(clock.start_seconds_in_day),
            seconds_from_start: 0.0,
            time_multiplier: clock.time_multiplier,
            running: true,
            respawn_interval: clock.respawn_interval_seconds,
            respawn_accumulator: 0.0,
            weather: TemperatureGenerator::new(clock.start_month, weather),
            outside_temp: 0.0,
            light_intensity: 0.0,
            light_color: LightColor::WHITE,
        };
        world_clock.refresh_derived();
        Ok(world_clock)
    }

    /// Advance simulated time by `elapsed_real` real seconds.
    pub fn tick(&mut self, elapsed_real: f32, rng: &mut impl Rng) -> ClockTick {
        if !self.running || elapsed_real <= 0.0 {
            return ClockTick::default();
        }

        let delta = elapsed_real * self.time_multiplier;
        let mut tick = ClockTick {
            delta,
            ..ClockTick::default()
        };
        self.seconds_in_day += f64::from(delta);
        self.seconds_from_start += f64::from(delta);

        if self.seconds_in_day >= f64::from(SECONDS_PER_DAY) {
            self.seconds_in_day = 0.0;
            self.date = self.date.next_day();
            let roll = self.weather.roll_day(self.date.month, rng);
            tick.rollover = Some((self.date, roll));
        }

        self.respawn_accumulator += delta;
        if self.respawn_accumulator >= self.respawn_interval {
            self.respawn_accumulator = 0.0;
            tick.respawn_timer_fired = true;
        }

        self.refresh_derived();
        tick
    }

    fn refresh_derived(&mut self) {
        let hour_seconds = f64::from(SECONDS_PER_HOUR);
        self.hour = (self.seconds_in_day / hour_seconds).floor() as u32;
        let into_hour = self.seconds_in_day - f64::from(self.hour) * hour_seconds;
        self.minute = (into_hour / f64::from(SECONDS_PER_MINUTE)).floor() as u32;
        let s = self.seconds_in_day as f32;
        self.outside_temp = self.weather.temperature_at(s);
        self.light_intensity = light_intensity(s);
        self.light_color = light_color(s);
    }

    pub fn stop_time(&mut self) {
        self.running = false;
    }

    pub fn start_time(&mut self) {
        self.running = true;
    }

    /// Returns `false` and leaves the multiplier unchanged when `multiplier`
    /// is negative or not finite.
    pub fn set_time_multiplier(&mut self, multiplier: f32) -> bool {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return false;
        }
        self.time_multiplier = multiplier;
        true
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn year(&self) -> u32 {
        self.date.year
    }

    pub fn month(&self) -> u32 {
        self.date.month
    }

    pub fn day(&self) -> u32 {
        self.date.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn seconds_in_day(&self) -> f64 {
        self.seconds_in_day
    }

    /// Simulated seconds since the clock was created. Never resets.
    pub fn seconds_from_start(&self) -> f64 {
        self.seconds_from_start
    }

    pub fn time_multiplier(&self) -> f32 {
        self.time_multiplier
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Outdoor temperature in °C.
    pub fn outside_temp(&self) -> f32 {
        self.outside_temp
    }

    pub fn light_intensity(&self) -> f32 {
        self.light_intensity
    }

    pub fn light_color(&self) -> LightColor {
        self.light_color
    }

    pub fn weather(&self) -> &TemperatureGenerator {
        &self.weather
    }
}
