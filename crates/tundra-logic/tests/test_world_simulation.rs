//! Integration tests across the logic modules.
//!
//! Exercises: obstacles → grid → pathfinder with several agents sharing
//! occupancy; clock + weather over a full year; shots into body status.
//!
//! All tests are pure logic - no ECS, no rendering.

use rand::rngs::StdRng;
use rand::SeedableRng;

use tundra_logic::body::{BodyPart, BodyStatus};
use tundra_logic::clock::{CalendarDate, WorldClock};
use tundra_logic::config::{ClockConfig, SimulationConfig, WeatherConfig};
use tundra_logic::geometry::Vec2;
use tundra_logic::grid::{Grid, GridPos};
use tundra_logic::hitbox::{apply_shot, CrossedColliders};
use tundra_logic::pathfinding::{octile_distance, path_cost, Pathfinder};
use tundra_logic::rasterize::{rasterize_obstacles, Obstacle, PathBlockingLayer};

// ── Helpers ────────────────────────────────────────────────────────────

/// A walled yard in the middle of the default 200×200 world with a single
/// door gap on its east side.
fn yard_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::solid(Vec2::new(0.0, 100.0), 0.0, Vec2::new(200.0, 4.0)),
        Obstacle::solid(Vec2::new(0.0, -100.0), 0.0, Vec2::new(200.0, 4.0)),
        Obstacle::solid(Vec2::new(-100.0, 0.0), 0.0, Vec2::new(4.0, 200.0)),
        Obstacle::solid(Vec2::new(100.0, 60.0), 0.0, Vec2::new(4.0, 80.0)),
        Obstacle::solid(Vec2::new(100.0, -60.0), 0.0, Vec2::new(4.0, 80.0)),
        Obstacle::door(Vec2::new(100.0, 0.0), 0.0, Vec2::new(4.0, 40.0)),
    ]
}

fn yard_pathfinder() -> (Pathfinder, PathBlockingLayer) {
    let config = SimulationConfig::default();
    let mut grid = Grid::from_config(&config.grid).unwrap();
    let obstacles = yard_obstacles();
    let report = rasterize_obstacles(&mut grid, &obstacles);
    assert_eq!(report.obstacles_marked, 5);
    assert_eq!(report.doors_skipped, 1);
    (
        Pathfinder::with_config(grid, &config.pathfinding),
        PathBlockingLayer::from_obstacles(&obstacles),
    )
}

// ── Navigation ─────────────────────────────────────────────────────────

#[test]
fn agents_leave_the_yard_through_the_door() {
    let (mut pf, layer) = yard_pathfinder();
    let inside = Vec2::new(0.0, 0.0);
    let outside = Vec2::new(200.0, 0.0);

    let path = pf.find_path(inside, outside).unwrap();
    // Every waypoint crosses the east wall line within the door gap
    for pair in path.windows(2) {
        if pair[0].x < 100.0 && pair[1].x >= 100.0 {
            assert!(pair[1].y.abs() < 20.0, "crossed the wall at {:?}", pair[1]);
        }
    }
    for p in &path {
        assert!(pf.grid().cell_at_world(*p).unwrap().is_walkable);
    }

    pf.release(outside);
    let mut rng = StdRng::seed_from_u64(9);
    let ideal = pf.find_ideal_path(inside, outside, &layer, &mut rng).unwrap();
    assert!(ideal.len() < path.len());
    let end = *ideal.last().unwrap();
    let target = pf.grid().grid_to_world(pf.grid().world_to_grid(outside));
    assert!((end.x - target.x).abs() <= 1.0 && (end.y - target.y).abs() <= 1.0);
}

#[test]
fn agents_sharing_a_goal_spread_across_neighbors() {
    let (mut pf, _) = yard_pathfinder();
    let goal = Vec2::new(0.0, 0.0);
    let goal_cell = pf.grid().world_to_grid(goal);

    let mut ends = Vec::new();
    for i in 0..9 {
        let start = Vec2::new(-60.0 + i as f32 * 10.0, -60.0);
        let path = pf.find_tile_path(pf.grid().world_to_grid(start), goal_cell).unwrap();
        ends.push(*path.last().unwrap());
    }

    // First agent gets the goal, the next eight each get a distinct neighbor
    assert_eq!(ends[0], goal_cell);
    let mut unique = ends.clone();
    unique.sort_by_key(|p| (p.x, p.y));
    unique.dedup();
    assert_eq!(unique.len(), 9);
    for end in &ends[1..] {
        assert_eq!(octile_distance(*end, goal_cell) / 10, 1);
    }

    // Every neighbor is taken now
    let tenth = pf.find_tile_path(GridPos::new(100, 80), goal_cell);
    assert!(tenth.is_none());
    assert_eq!(pf.grid().occupied_count(), 9);
}

#[test]
fn released_goal_can_be_reclaimed() {
    let (mut pf, _) = yard_pathfinder();
    let start = GridPos::new(95, 95);
    let goal = GridPos::new(105, 105);
    let first = pf.find_tile_path(start, goal).unwrap();
    assert_eq!(*first.last().unwrap(), goal);
    assert!(pf.release(pf.grid().grid_to_world(goal)));
    let second = pf.find_tile_path(start, goal).unwrap();
    assert_eq!(second, first);
    assert_eq!(path_cost(&second), octile_distance(start, goal));
}

// ── Clock and weather ──────────────────────────────────────────────────

#[test]
fn a_year_of_days_advances_the_calendar_and_weather() {
    let clock_config = ClockConfig {
        start_seconds_in_day: 0.0,
        time_multiplier: 600.0,
        ..ClockConfig::default()
    };
    let mut clock = WorldClock::new(&clock_config, WeatherConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    let mut rollovers = 0;
    let mut respawns = 0;
    let mut coldest = f32::INFINITY;
    let mut warmest = f32::NEG_INFINITY;
    while rollovers < 365 {
        // Ten simulated minutes per tick
        let tick = clock.tick(1.0, &mut rng);
        if tick.day_rolled() {
            rollovers += 1;
        }
        respawns += tick.respawn_causes().count();
        coldest = coldest.min(clock.outside_temp());
        warmest = warmest.max(clock.outside_temp());
        assert!(clock.seconds_in_day() < 86_400.0);
        assert!((0.2..=1.0).contains(&clock.light_intensity()));
    }

    assert_eq!(clock.date(), CalendarDate { year: 2, month: 1, day: 1 });
    // One per rollover plus four or five per day from the timer
    assert!(respawns >= 365 * 5);
    assert!(coldest < warmest);
}

// ── Combat ─────────────────────────────────────────────────────────────

#[test]
fn shots_wear_a_character_down() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut status = BodyStatus::new();
    let crossed = CrossedColliders::all();

    let mut shots = 0;
    while !status.is_dead() {
        let outcome = apply_shot(&crossed, 15.0, &mut status, &mut rng);
        assert!(!outcome.is_miss());
        shots += 1;
        assert!(shots < 200);
    }
    assert_eq!(status.damage_taken, status.hits_taken as f32 * 15.0);
    assert!(status.health(BodyPart::Head) == 0.0 || status.health(BodyPart::Torso) == 0.0);
}
