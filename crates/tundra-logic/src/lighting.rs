//! Ambient light curves over the day.
//!
//! Both curves are pure functions of the seconds elapsed in the current
//! day. Intensity holds full brightness from 10:00 to 17:00, fades to the
//! night floor by 22:00, holds it until 05:00 and fades back up by 10:00.
//! Color is white except around dawn and dusk, where it swings to a warm
//! tint and back.

use serde::{Deserialize, Serialize};

use crate::constants::calendar::SECONDS_PER_HOUR;
use crate::constants::lighting::{DAY_INTENSITY, NIGHT_INTENSITY, WARM_TINT};
use crate::geometry::{inverse_lerp, lerp};

const DAWN_START: f32 = 5.0 * SECONDS_PER_HOUR;
const DAWN_PEAK: f32 = 5.5 * SECONDS_PER_HOUR;
const DAY_START: f32 = 10.0 * SECONDS_PER_HOUR;
const DUSK_START: f32 = 17.0 * SECONDS_PER_HOUR;
const DUSK_PEAK: f32 = 21.5 * SECONDS_PER_HOUR;
const NIGHT_START: f32 = 22.0 * SECONDS_PER_HOUR;

/// Linear RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LightColor {
    pub const WHITE: LightColor = LightColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const WARM: LightColor = LightColor {
        r: WARM_TINT[0],
        g: WARM_TINT[1],
        b: WARM_TINT[2],
    };

    pub fn lerp(self, other: LightColor, t: f32) -> LightColor {
        LightColor {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
        }
    }
}

/// Ambient light intensity, between the night floor and 1.0.
pub fn light_intensity(seconds_in_day: f32) -> f32 {
    let s = seconds_in_day;
    if s >= NIGHT_START || s < DAWN_START {
        NIGHT_INTENSITY
    } else if s < DAY_START {
        lerp(
            NIGHT_INTENSITY,
            DAY_INTENSITY,
            inverse_lerp(DAWN_START, DAY_START, s),
        )
    } else if s <= DUSK_START {
        DAY_INTENSITY
    } else {
        lerp(
            DAY_INTENSITY,
            NIGHT_INTENSITY,
            inverse_lerp(DUSK_START, NIGHT_START, s),
        )
    }
}

/// Ambient light color.
pub fn light_color(seconds_in_day: f32) -> LightColor {
    let s = seconds_in_day;
    let warmth = if (DAWN_START..DAWN_PEAK).contains(&s) {
        inverse_lerp(DAWN_START, DAWN_PEAK, s)
    } else if (DAWN_PEAK..DAY_START).contains(&s) {
        1.0 - inverse_lerp(DAWN_PEAK, DAY_START, s)
    } else if (DUSK_START..DUSK_PEAK).contains(&s) {
        inverse_lerp(DUSK_START, DUSK_PEAK, s)
    } else if (DUSK_PEAK..NIGHT_START).contains(&s) {
        1.0 - inverse_lerp(DUSK_PEAK, NIGHT_START, s)
    } else {
        0.0
    };
    LightColor::WHITE.lerp(LightColor::WARM, warmth)
}
