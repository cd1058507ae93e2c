//! Game constants - grid dimensions, path costs, calendar tables, hit odds.
//!
//! Plain constants with no engine dependency. Tunables that a world file may
//! override live in [`crate::config`]; these are the defaults it falls back to.

pub mod grid {
    /// Default grid width in cells.
    pub const WIDTH: usize = 200;
    /// Default grid height in cells.
    pub const HEIGHT: usize = 200;
    /// World units per cell edge.
    pub const CELL_SIZE: f32 = 10.0;
    /// Half extent of the playable area; grid (0,0) sits at (-ORIGIN_OFFSET, -ORIGIN_OFFSET).
    pub const ORIGIN_OFFSET: f32 = 1000.0;
}

pub mod path {
    /// Cost of an orthogonal step.
    pub const STRAIGHT_COST: u32 = 10;
    /// Cost of a diagonal step (√2 × 10, truncated).
    pub const DIAGONAL_COST: u32 = 14;
    /// Searches abort once the cheapest open node exceeds this f-cost.
    pub const MAX_F_COST: u32 = 1000;
    /// Maximum jitter applied to a path's final waypoint on each axis.
    pub const END_JITTER: f32 = 1.0;
}

pub mod calendar {
    pub const SECONDS_PER_MINUTE: f32 = 60.0;
    pub const SECONDS_PER_HOUR: f32 = 3600.0;
    pub const SECONDS_PER_DAY: f32 = 86_400.0;
    pub const MONTHS_PER_YEAR: u32 = 12;

    /// Days per month, January first. No leap years.
    pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    /// Simulated seconds between periodic enemy respawn attempts (5 in-game hours).
    pub const RESPAWN_INTERVAL_SECONDS: f32 = 18_000.0;

    /// Days in a 1-based month. Out-of-range months clamp to the table edges.
    pub fn days_in_month(month: u32) -> u32 {
        let index = month.clamp(1, MONTHS_PER_YEAR) as usize - 1;
        DAYS_IN_MONTH[index]
    }
}

pub mod weather {
    /// Average outdoor temperature per month (°C), January first.
    pub const MONTHLY_AVERAGE_TEMP: [f32; 12] = [
        -15.0, -13.0, -9.0, -3.0, 2.0, 5.0, 6.0, 5.0, 1.0, -4.0, -9.0, -13.0,
    ];
    /// Maximum day-to-day drift of the average temperature.
    pub const DAILY_AVERAGE_DRIFT: f32 = 2.5;
    /// Maximum half-spread between a day's min and max.
    pub const DAILY_FLUCTUATION: f32 = 5.0;
    /// Constant pull applied toward the monthly average each day.
    pub const MONTHLY_PULL: f32 = 1.0;

    /// Monthly average for a 1-based month.
    pub fn monthly_average(month: u32) -> f32 {
        let index = month.clamp(1, 12) as usize - 1;
        MONTHLY_AVERAGE_TEMP[index]
    }
}

pub mod lighting {
    /// Ambient light never drops below this at night.
    pub const NIGHT_INTENSITY: f32 = 0.2;
    pub const DAY_INTENSITY: f32 = 1.0;
    /// Warm tint the ambient color blends toward at dawn and dusk (linear RGB).
    pub const WARM_TINT: [f32; 3] = [1.0, 0.62, 0.38];
}

pub mod hitbox {
    pub const HEAD_CHANCE: f32 = 0.15;
    pub const TORSO_CHANCE: f32 = 0.45;
    pub const LEGS_CHANCE: f32 = 0.40;
    /// Chance that a crossed arm is also hit alongside a torso hit.
    pub const ARM_CHANCE: f64 = 0.5;
}

pub mod body {
    pub const HEAD_HEALTH: f32 = 40.0;
    pub const TORSO_HEALTH: f32 = 100.0;
    pub const ARM_HEALTH: f32 = 60.0;
    pub const LEG_HEALTH: f32 = 70.0;
}

pub mod survival {
    /// Simulated hours for each need to go from satisfied to desperate.
    pub const HUNGER_HOURS: f32 = 48.0;
    pub const THIRST_HOURS: f32 = 24.0;
    pub const TIREDNESS_HOURS: f32 = 18.0;
    /// Hours of rest that clear full tiredness.
    pub const REST_HOURS_FOR_FULL: f32 = 8.0;

    /// Stamina fraction per real second.
    pub const STAMINA_DRAIN: f32 = 0.1;
    pub const STAMINA_REGEN: f32 = 0.05;

    /// Core body temperature (°C).
    pub const NORMAL_BODY_TEMP: f32 = 37.0;
    /// Below this the character is hypothermic.
    pub const HYPOTHERMIA_BELOW: f32 = 35.0;
    /// Air temperature a sheltered character is exposed to.
    pub const INDOOR_TEMP: f32 = 18.0;
    /// Body temperature lost per degree of air below `INDOOR_TEMP`.
    pub const COLD_EXPOSURE: f32 = 0.15;
    /// Maximum body temperature change per simulated hour.
    pub const BODY_TEMP_DRIFT_PER_HOUR: f32 = 1.5;
}
