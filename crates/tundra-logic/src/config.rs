//! Simulation configuration - grid, pathfinding, clock, weather and survival tunables.
//!
//! Every section has serde defaults taken from [`crate::constants`], so a
//! world file only needs to name what it overrides. `validate` rejects the
//! construction-time inputs the simulation cannot run with; everything past
//! construction reports expected failures as sentinels instead of errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{calendar, grid, path, survival, weather};

/// Errors raised while building a simulation from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),
    #[error("day {day} is outside 1..={max} for month {month}")]
    InvalidDay { day: u32, month: u32, max: u32 },
    #[error("start time {0}s is outside a single day")]
    InvalidStartTime(f32),
    #[error("time multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f32),
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level configuration for one simulated world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub pathfinding: PathfindingConfig,
    pub clock: ClockConfig,
    pub weather: WeatherConfig,
    pub survival: SurvivalConfig,
    /// Seed for the engine's random stream. `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    pub origin_offset: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: grid::WIDTH,
            height: grid::HEIGHT,
            cell_size: grid::CELL_SIZE,
            origin_offset: grid::ORIGIN_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// f-cost above which a search gives up.
    pub max_f_cost: u32,
    /// Per-axis jitter bound for the final waypoint of an ideal path.
    pub end_jitter: f32,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_f_cost: path::MAX_F_COST,
            end_jitter: path::END_JITTER,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub start_year: u32,
    pub start_month: u32,
    pub start_day: u32,
    /// Seconds into the starting day (08:00 by default).
    pub start_seconds_in_day: f32,
    /// Simulated seconds per real second.
    pub time_multiplier: f32,
    pub respawn_interval_seconds: f32,
    /// Real seconds a full rest takes regardless of how many hours it skips.
    pub rest_real_seconds: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_year: 1,
            start_month: 1,
            start_day: 1,
            start_seconds_in_day: 8.0 * calendar::SECONDS_PER_HOUR,
            time_multiplier: 60.0,
            respawn_interval_seconds: calendar::RESPAWN_INTERVAL_SECONDS,
            rest_real_seconds: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub daily_average_drift: f32,
    pub daily_fluctuation: f32,
    pub monthly_pull: f32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            daily_average_drift: weather::DAILY_AVERAGE_DRIFT,
            daily_fluctuation: weather::DAILY_FLUCTUATION,
            monthly_pull: weather::MONTHLY_PULL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    pub hunger_hours: f32,
    pub thirst_hours: f32,
    pub tiredness_hours: f32,
    pub rest_hours_for_full: f32,
    pub stamina_drain: f32,
    pub stamina_regen: f32,
    pub indoor_temp: f32,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            hunger_hours: survival::HUNGER_HOURS,
            thirst_hours: survival::THIRST_HOURS,
            tiredness_hours: survival::TIREDNESS_HOURS,
            rest_hours_for_full: survival::REST_HOURS_FOR_FULL,
            stamina_drain: survival::STAMINA_DRAIN,
            stamina_regen: survival::STAMINA_REGEN,
            indoor_temp: survival::INDOOR_TEMP,
        }
    }
}

fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn require_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

impl SimulationConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot be constructed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.clock.validate()?;
        self.weather.validate()?;
        self.survival.validate()?;
        require_non_negative("pathfinding.end_jitter", self.pathfinding.end_jitter)
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        Ok(())
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=calendar::MONTHS_PER_YEAR).contains(&self.start_month) {
            return Err(ConfigError::InvalidMonth(self.start_month));
        }
        let max = calendar::days_in_month(self.start_month);
        if !(1..=max).contains(&self.start_day) {
            return Err(ConfigError::InvalidDay {
                day: self.start_day,
                month: self.start_month,
                max,
            });
        }
        if !(0.0..calendar::SECONDS_PER_DAY).contains(&self.start_seconds_in_day) {
            return Err(ConfigError::InvalidStartTime(self.start_seconds_in_day));
        }
        if !self.time_multiplier.is_finite() || self.time_multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.time_multiplier));
        }
        require_positive("clock.respawn_interval_seconds", self.respawn_interval_seconds)?;
        require_positive("clock.rest_real_seconds", self.rest_real_seconds)
    }
}

impl WeatherConfig {
    /// Drift and fluctuation are sampling half-widths; the pull is a step size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("weather.daily_average_drift", self.daily_average_drift)?;
        require_non_negative("weather.daily_fluctuation", self.daily_fluctuation)?;
        require_non_negative("weather.monthly_pull", self.monthly_pull)
    }
}

impl SurvivalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("survival.hunger_hours", self.hunger_hours)?;
        require_positive("survival.thirst_hours", self.thirst_hours)?;
        require_positive("survival.tiredness_hours", self.tiredness_hours)?;
        require_positive("survival.rest_hours_for_full", self.rest_hours_for_full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.width, 200);
        assert_eq!(config.pathfinding.max_f_cost, 1000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{ "grid": { "width": 32 }, "seed": 7 }"#)
            .expect("valid config");
        assert_eq!(config.grid.width, 32);
        assert_eq!(config.grid.height, 200);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.clock.start_month, 1);
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = SimulationConfig::from_json(r#"{ "grid": { "width": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid { width: 0, .. }));
    }

    #[test]
    fn test_bad_day_rejected() {
        let config = SimulationConfig {
            clock: ClockConfig {
                start_month: 2,
                start_day: 30,
                ..ClockConfig::default()
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDay { day: 30, month: 2, max: 28 })
        ));
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let config = SimulationConfig {
            clock: ClockConfig {
                time_multiplier: -1.0,
                ..ClockConfig::default()
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMultiplier(_))
        ));
    }

    #[test]
    fn test_zero_need_duration_rejected() {
        let err = SimulationConfig::from_json(r#"{ "survival": { "thirst_hours": 0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive { name: "survival.thirst_hours", .. }
        ));
    }

    #[test]
    fn test_negative_weather_drift_rejected() {
        let err = SimulationConfig::from_json(r#"{ "weather": { "daily_average_drift": -1.0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Negative { name: "weather.daily_average_drift", .. }
        ));
    }

    #[test]
    fn test_weather_fluctuation_must_be_finite() {
        let mut weather = WeatherConfig {
            daily_fluctuation: f32::NAN,
            ..WeatherConfig::default()
        };
        assert!(weather.validate().is_err());
        weather.daily_fluctuation = -2.0;
        assert!(weather.validate().is_err());
        weather.daily_fluctuation = 0.0;
        weather.monthly_pull = 0.0;
        assert!(weather.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SimulationConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }
}
