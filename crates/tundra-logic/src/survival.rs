//! Survival needs - hunger, thirst, tiredness, stamina and body heat.
//!
//! Hunger, thirst and tiredness run from 0.0 (satisfied) to 1.0
//! (desperate) and rise linearly with simulated hours. Stamina runs the
//! other way (1.0 full) and moves with real seconds, since sprinting is
//! moment-to-moment. Body temperature drifts toward a target set by the
//! air the character is exposed to.

use serde::{Deserialize, Serialize};

use crate::config::SurvivalConfig;
use crate::constants::survival::{
    BODY_TEMP_DRIFT_PER_HOUR, COLD_EXPOSURE, HYPOTHERMIA_BELOW, NORMAL_BODY_TEMP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedType {
    Hunger,
    Thirst,
    Tiredness,
}

/// Conditions that follow from neglected needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Hypothermia,
    Exhaustion,
    Starving,
    Dehydrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub hunger: f32,
    pub thirst: f32,
    pub tiredness: f32,
    pub stamina: f32,
    /// Core temperature in °C.
    pub body_temp: f32,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            hunger: 0.0,
            thirst: 0.0,
            tiredness: 0.0,
            stamina: 1.0,
            body_temp: NORMAL_BODY_TEMP,
        }
    }
}

impl Needs {
    /// Raise hunger, thirst and tiredness over `hours` of simulated time.
    pub fn decay(&mut self, hours: f32, config: &SurvivalConfig) {
        self.hunger = (self.hunger + hours / config.hunger_hours).clamp(0.0, 1.0);
        self.thirst = (self.thirst + hours / config.thirst_hours).clamp(0.0, 1.0);
        self.tiredness = (self.tiredness + hours / config.tiredness_hours).clamp(0.0, 1.0);
    }

    /// Drain stamina while sprinting, regenerate it otherwise.
    pub fn update_stamina(&mut self, real_seconds: f32, sprinting: bool, config: &SurvivalConfig) {
        let change = if sprinting {
            -config.stamina_drain
        } else {
            config.stamina_regen
        };
        self.stamina = (self.stamina + change * real_seconds).clamp(0.0, 1.0);
    }

    /// Whether there is stamina left to sprint with.
    pub fn can_sprint(&self) -> bool {
        self.stamina > 0.0
    }

    /// Move body temperature toward what the surrounding air allows.
    ///
    /// Sheltered characters are exposed to the indoor temperature instead
    /// of `outside_temp`.
    pub fn drift_body_temp(
        &mut self,
        hours: f32,
        outside_temp: f32,
        sheltered: bool,
        config: &SurvivalConfig,
    ) {
        let air = if sheltered {
            config.indoor_temp
        } else {
            outside_temp
        };
        let target = body_temp_target(air, config.indoor_temp);
        let max_step = BODY_TEMP_DRIFT_PER_HOUR * hours;
        let diff = target - self.body_temp;
        self.body_temp += diff.clamp(-max_step, max_step);
    }

    /// Reduce tiredness by `hours` of rest.
    pub fn rest(&mut self, hours: f32, config: &SurvivalConfig) {
        self.tiredness = (self.tiredness - hours / config.rest_hours_for_full).clamp(0.0, 1.0);
    }

    /// Satisfy a need by `amount`.
    pub fn satisfy(&mut self, need: NeedType, amount: f32) {
        let value = match need {
            NeedType::Hunger => &mut self.hunger,
            NeedType::Thirst => &mut self.thirst,
            NeedType::Tiredness => &mut self.tiredness,
        };
        *value = (*value - amount).clamp(0.0, 1.0);
    }

    /// The most pressing need above `threshold`.
    pub fn most_urgent(&self, threshold: f32) -> Option<NeedType> {
        [
            (NeedType::Hunger, self.hunger),
            (NeedType::Thirst, self.thirst),
            (NeedType::Tiredness, self.tiredness),
        ]
        .into_iter()
        .filter(|(_, v)| *v > threshold)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(need, _)| need)
    }

    pub fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if self.body_temp < HYPOTHERMIA_BELOW {
            conditions.push(Condition::Hypothermia);
        }
        if self.tiredness >= 1.0 {
            conditions.push(Condition::Exhaustion);
        }
        if self.hunger >= 1.0 {
            conditions.push(Condition::Starving);
        }
        if self.thirst >= 1.0 {
            conditions.push(Condition::Dehydrated);
        }
        conditions
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions().contains(&condition)
    }
}

/// Body temperature a character settles at in air of `air_temp`.
pub fn body_temp_target(air_temp: f32, comfortable_air: f32) -> f32 {
    let cold = (comfortable_air - air_temp).max(0.0);
    NORMAL_BODY_TEMP - cold * COLD_EXPOSURE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SurvivalConfig {
        SurvivalConfig::default()
    }

    #[test]
    fn test_needs_saturate_at_their_durations() {
        let mut needs = Needs::default();
        needs.decay(24.0, &config());
        assert!((needs.thirst - 1.0).abs() < 1e-6);
        assert!((needs.hunger - 0.5).abs() < 1e-6);
        assert!(needs.tiredness >= 1.0);
        needs.decay(24.0, &config());
        assert!((needs.hunger - 1.0).abs() < 1e-6);
        assert!(needs.thirst <= 1.0);
    }

    #[test]
    fn test_stamina_drains_and_regenerates() {
        let mut needs = Needs::default();
        needs.update_stamina(20.0, true, &config());
        assert_eq!(needs.stamina, 0.0);
        assert!(!needs.can_sprint());
        needs.update_stamina(10.0, false, &config());
        assert!((needs.stamina - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cold_outdoors_leads_to_hypothermia() {
        let mut needs = Needs::default();
        for _ in 0..10 {
            needs.drift_body_temp(1.0, -15.0, false, &config());
        }
        assert!(needs.body_temp < HYPOTHERMIA_BELOW);
        assert!(needs.has_condition(Condition::Hypothermia));
        // Never drops past the target
        assert!(needs.body_temp >= body_temp_target(-15.0, 18.0) - 1e-4);
    }

    #[test]
    fn test_shelter_warms_back_up() {
        let mut needs = Needs {
            body_temp: 33.0,
            ..Needs::default()
        };
        needs.drift_body_temp(1.0, -30.0, true, &config());
        assert!((needs.body_temp - 34.5).abs() < 1e-5);
        needs.drift_body_temp(10.0, -30.0, true, &config());
        assert_eq!(needs.body_temp, NORMAL_BODY_TEMP);
    }

    #[test]
    fn test_rest_clears_tiredness() {
        let mut needs = Needs {
            tiredness: 1.0,
            ..Needs::default()
        };
        assert!(needs.has_condition(Condition::Exhaustion));
        needs.rest(4.0, &config());
        assert!((needs.tiredness - 0.5).abs() < 1e-6);
        needs.rest(8.0, &config());
        assert_eq!(needs.tiredness, 0.0);
        assert!(needs.conditions().is_empty());
    }

    #[test]
    fn test_most_urgent() {
        let needs = Needs {
            hunger: 0.4,
            thirst: 0.9,
            ..Needs::default()
        };
        assert_eq!(needs.most_urgent(0.3), Some(NeedType::Thirst));
        assert_eq!(needs.most_urgent(0.95), None);
    }
}
