//! Respawn system - reacts to respawn broadcasts from the world clock
//!
//! Every broadcast tops up each spawner's live enemies to its cap. Loot
//! containers restock only on the initial load and at day rollover.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::Rng;
use tundra_logic::body::BodyStatus;
use tundra_logic::clock::RespawnCause;
use tundra_logic::geometry::Vec2;
use tundra_logic::survival::Needs;

use crate::components::{
    Dead, Enemy, EnemySpawner, LootContainer, NavAgent, Name, Npc, Position,
};

/// What one respawn broadcast did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RespawnReport {
    pub enemies_spawned: u32,
    pub containers_restocked: u32,
    pub items_restocked: u32,
}

/// Deliver one respawn broadcast to every spawner and container.
pub fn respawn_system(world: &mut World, cause: RespawnCause, rng: &mut impl Rng) -> RespawnReport {
    let mut report = RespawnReport::default();

    let alive = live_enemies_per_spawner(world);

    // Collect spawns first (can't spawn while iterating)
    let mut spawns: Vec<(Entity, Vec2, f32)> = Vec::new();
    for (entity, (spawner, pos)) in world.query_mut::<(&mut EnemySpawner, &Position)>() {
        spawner.last_cause = Some(cause);
        let count = spawner.deficit(alive.get(&entity).copied().unwrap_or(0));
        for _ in 0..count {
            let offset = random_offset(spawner.radius, rng);
            spawns.push((entity, pos.world + offset, spawner.enemy_speed));
        }
        spawner.total_spawned += count;
    }

    for (spawner, at, speed) in spawns {
        spawn_enemy(world, spawner, at, speed);
        report.enemies_spawned += 1;
    }

    if LootContainer::restocks_on(cause) {
        for (_, container) in world.query_mut::<&mut LootContainer>() {
            report.items_restocked += container.restock();
            report.containers_restocked += 1;
        }
    }

    report
}

/// Count living enemies grouped by the spawner that produced them.
pub fn live_enemies_per_spawner(world: &World) -> HashMap<Entity, u32> {
    let mut alive = HashMap::new();
    for (_, enemy) in world.query::<&Enemy>().without::<&Dead>().iter() {
        *alive.entry(enemy.spawner).or_insert(0) += 1;
    }
    alive
}

fn random_offset(radius: f32, rng: &mut impl Rng) -> Vec2 {
    let distance = rng.gen_range(0.0..=radius);
    let angle = rng.gen_range(0.0..360.0);
    Vec2::new(distance, 0.0).rotated(angle)
}

fn spawn_enemy(world: &mut World, spawner: Entity, at: Vec2, speed: f32) -> Entity {
    world.spawn((
        Npc,
        Enemy { spawner },
        Name("enemy".to_string()),
        Position { world: at },
        NavAgent::new(speed),
        BodyStatus::new(),
        Needs::default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawner_world() -> (World, Entity) {
        let mut world = World::new();
        let spawner = world.spawn((Position::new(100.0, 100.0), EnemySpawner::new(3, 30.0)));
        world.spawn((Position::new(0.0, 0.0), LootContainer::new(5)));
        (world, spawner)
    }

    #[test]
    fn test_initial_load_fills_everything() {
        let (mut world, spawner) = spawner_world();
        let mut rng = StdRng::seed_from_u64(1);
        let report = respawn_system(&mut world, RespawnCause::InitialLoad, &mut rng);
        assert_eq!(report.enemies_spawned, 3);
        assert_eq!(report.containers_restocked, 1);
        assert_eq!(report.items_restocked, 5);
        assert_eq!(live_enemies_per_spawner(&world).get(&spawner), Some(&3));

        for (_, (pos, _)) in world.query::<(&Position, &Enemy)>().iter() {
            assert!(pos.world.distance(&Vec2::new(100.0, 100.0)) <= 30.0 + 1e-3);
        }
    }

    #[test]
    fn test_spawner_only_tops_up_to_cap() {
        let (mut world, _) = spawner_world();
        let mut rng = StdRng::seed_from_u64(2);
        respawn_system(&mut world, RespawnCause::InitialLoad, &mut rng);
        let report = respawn_system(&mut world, RespawnCause::Timer, &mut rng);
        assert_eq!(report.enemies_spawned, 0);

        // Kill one enemy and the next broadcast replaces it
        let victim = world
            .query::<&Enemy>()
            .iter()
            .map(|(e, _)| e)
            .next()
            .unwrap();
        world.insert_one(victim, Dead).unwrap();
        let report = respawn_system(&mut world, RespawnCause::Timer, &mut rng);
        assert_eq!(report.enemies_spawned, 1);
    }

    #[test]
    fn test_timer_leaves_containers_alone() {
        let (mut world, spawner) = spawner_world();
        let mut rng = StdRng::seed_from_u64(3);
        let report = respawn_system(&mut world, RespawnCause::Timer, &mut rng);
        assert_eq!(report.containers_restocked, 0);
        let last = world.get::<&EnemySpawner>(spawner).unwrap().last_cause;
        assert_eq!(last, Some(RespawnCause::Timer));

        let report = respawn_system(&mut world, RespawnCause::DayRollover, &mut rng);
        assert_eq!(report.containers_restocked, 1);
    }
}
