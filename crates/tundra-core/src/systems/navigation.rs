//! Navigation system - path requests, waypoint following, tile release
//!
//! Requests are served one agent at a time within a tick, so every search
//! sees the tiles reserved by the searches before it. An agent gives up a
//! reserved tile only once it has walked off it.

use hecs::{Entity, World};
use log::debug;
use rand::Rng;
use tundra_logic::pathfinding::{LineOfSight, Pathfinder};

use crate::components::{Dead, NavAgent, NavState, Position};

/// What one navigation pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationReport {
    pub paths_found: u32,
    pub paths_failed: u32,
    pub arrivals: u32,
    pub tiles_released: u32,
}

/// Serve pending path requests, then move every agent along its path.
pub fn navigation_system(
    world: &mut World,
    pathfinder: &mut Pathfinder,
    sight: &impl LineOfSight,
    rng: &mut impl Rng,
    delta_seconds: f32,
) -> NavigationReport {
    let mut report = NavigationReport::default();

    let pending: Vec<Entity> = world
        .query::<&NavAgent>()
        .without::<&Dead>()
        .iter()
        .filter(|(_, agent)| agent.state == NavState::Pending)
        .map(|(entity, _)| entity)
        .collect();

    for entity in pending {
        request_path(world, pathfinder, sight, rng, entity, &mut report);
    }

    for (_, (pos, agent)) in world
        .query_mut::<(&mut Position, &mut NavAgent)>()
        .without::<&Dead>()
    {
        if step_agent(pos, agent, delta_seconds) {
            report.arrivals += 1;
        }

        if let Some(old) = agent.vacating {
            let grid = pathfinder.grid();
            if grid.world_to_grid(pos.world) != grid.world_to_grid(old) {
                pathfinder.release(old);
                agent.vacating = None;
                report.tiles_released += 1;
            }
        }
    }

    report
}

fn request_path(
    world: &mut World,
    pathfinder: &mut Pathfinder,
    sight: &impl LineOfSight,
    rng: &mut impl Rng,
    entity: Entity,
    report: &mut NavigationReport,
) {
    let Ok((pos, agent)) = world.query_one_mut::<(&Position, &mut NavAgent)>(entity) else {
        return;
    };
    let Some(destination) = agent.destination else {
        agent.state = NavState::Idle;
        return;
    };

    let Some(path) = pathfinder.find_ideal_path(pos.world, destination, sight, rng) else {
        debug!(
            "No path for {:?} from ({:.1}, {:.1}) to ({:.1}, {:.1})",
            entity, pos.world.x, pos.world.y, destination.x, destination.y
        );
        agent.waypoints.clear();
        agent.state = NavState::Blocked;
        report.paths_failed += 1;

        // Give up the reserved tile unless the agent is standing on it
        if let Some(old) = agent.reserved {
            let grid = pathfinder.grid();
            if grid.world_to_grid(old) != grid.world_to_grid(pos.world) {
                pathfinder.release(old);
                agent.reserved = None;
                report.tiles_released += 1;
            }
        }
        return;
    };

    // The final waypoint is jittered but always inside the reserved tile
    let reserved = path.last().copied().unwrap_or(pos.world);
    let new_tile = pathfinder.grid().world_to_grid(reserved);
    if let Some(old) = agent.reserved {
        if pathfinder.grid().world_to_grid(old) != new_tile {
            if let Some(stale) = agent.vacating.replace(old) {
                pathfinder.release(stale);
                report.tiles_released += 1;
            }
        }
    }
    agent.reserved = Some(reserved);
    agent.follow(path);
    report.paths_found += 1;
}

/// Walk along the waypoints. Returns `true` on the step that arrives.
fn step_agent(pos: &mut Position, agent: &mut NavAgent, delta_seconds: f32) -> bool {
    if !agent.is_moving() {
        return false;
    }

    let mut budget = agent.speed * delta_seconds;
    while budget > 0.0 {
        let Some(target) = agent.current_waypoint() else {
            break;
        };
        let distance = pos.world.distance(&target);
        pos.world = pos.world.move_towards(target, budget);
        if distance > budget {
            break;
        }
        budget -= distance;
        agent.waypoint_index += 1;
    }

    if agent.current_waypoint().is_none() {
        agent.state = NavState::Arrived;
        return true;
    }
    false
}
