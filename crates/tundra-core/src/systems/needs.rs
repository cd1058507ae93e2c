//! Needs system - decays needs over time, drifts body temperature

use hecs::{Entity, World};
use tundra_logic::config::SurvivalConfig;
use tundra_logic::survival::{NeedType, Needs};

use crate::components::{Dead, Resting, Sheltered, Sprinting};

/// Advance every living character's needs.
///
/// `delta_hours` is simulated time (it follows the clock's multiplier);
/// `delta_seconds` is real time, which drives stamina.
pub fn needs_system(
    world: &mut World,
    delta_hours: f32,
    delta_seconds: f32,
    outside_temp: f32,
    config: &SurvivalConfig,
) {
    for (_, (needs, resting, sheltered, sprinting)) in world
        .query_mut::<(
            &mut Needs,
            Option<&Resting>,
            Option<&Sheltered>,
            Option<&Sprinting>,
        )>()
        .without::<&Dead>()
    {
        needs.decay(delta_hours, config);
        if resting.is_some() {
            needs.rest(delta_hours, config);
        }
        needs.update_stamina(delta_seconds, sprinting.is_some(), config);
        needs.drift_body_temp(delta_hours, outside_temp, sheltered.is_some(), config);
    }
}

/// Find characters with urgent needs (above threshold)
pub fn find_urgent_needs(world: &World, threshold: f32) -> Vec<(Entity, NeedType)> {
    let mut urgent = Vec::new();

    for (entity, needs) in world.query::<&Needs>().without::<&Dead>().iter() {
        if let Some(need_type) = needs.most_urgent(threshold) {
            urgent.push((entity, need_type));
        }
    }

    urgent
}
