//! Combat system - applies resolved shots to characters and handles deaths

use hecs::{Entity, World};
use log::warn;
use rand::Rng;
use tundra_logic::body::BodyStatus;
use tundra_logic::hitbox::{apply_shot, CrossedColliders, HitOutcome};
use tundra_logic::pathfinding::Pathfinder;

use crate::components::{Dead, Enemy, NavAgent};

/// Result of one shot against a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotReport {
    pub outcome: HitOutcome,
    /// The shot took the target from alive to dead.
    pub killed: bool,
}

/// Resolve a shot against `target` and damage its body status.
///
/// Returns `None` when the target has no body status or is already dead.
pub fn shoot(
    world: &mut World,
    target: Entity,
    crossed: &CrossedColliders,
    damage: f32,
    rng: &mut impl Rng,
) -> Option<ShotReport> {
    if world.get::<&Dead>(target).is_ok() {
        return None;
    }
    let mut status = world.get::<&mut BodyStatus>(target).ok()?;
    let was_dead = status.is_dead();
    let outcome = apply_shot(crossed, damage, &mut *status, rng);
    let killed = !was_dead && status.is_dead();
    Some(ShotReport { outcome, killed })
}

/// Take a killed character out of the simulation.
///
/// Its tile reservations are released. Enemies are despawned so their
/// spawner can replace them; anyone else stays in the world marked dead.
pub fn handle_death(world: &mut World, pathfinder: &mut Pathfinder, target: Entity) {
    if let Ok(mut agent) = world.get::<&mut NavAgent>(target) {
        for tile in [agent.reserved.take(), agent.vacating.take()].into_iter().flatten() {
            pathfinder.release(tile);
        }
        agent.stop();
    }

    let removed = if world.get::<&Enemy>(target).is_ok() {
        world.despawn(target).is_ok()
    } else {
        world.insert_one(target, Dead).is_ok()
    };
    if !removed {
        warn!("Death of {:?} not recorded: entity no longer exists", target);
    }
}
