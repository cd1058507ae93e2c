//! Tundra Headless Simulation Harness
//!
//! Validates the pure simulation logic and the authored world file in
//! process. No renderer, no physics engine, no input.
//!
//! Usage:
//!   cargo run -p tundra-simtest
//!   cargo run -p tundra-simtest -- --verbose
//!   cargo run -p tundra-simtest -- path/to/world.json

use std::collections::HashSet;
use std::error::Error;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tundra_core::prelude::*;
use tundra_logic::body::BodyPart;
use tundra_logic::clock::WorldClock;
use tundra_logic::config::{ClockConfig, ConfigError, SimulationConfig, WeatherConfig};
use tundra_logic::constants::calendar::{days_in_month, SECONDS_PER_HOUR};
use tundra_logic::geometry::Vec2;
use tundra_logic::grid::{Grid, GridPos};
use tundra_logic::hitbox::{resolve_hit, CrossedColliders, MainPart};
use tundra_logic::lighting::light_intensity;
use tundra_logic::pathfinding::{octile_distance, path_cost, Pathfinder};
use tundra_logic::rasterize::{rasterize_obstacles, Obstacle, ObstacleKind};

// ── World file (the scene the engine loads) ────────────────────────────
const WORLD_JSON: &str = include_str!("../../../data/world.json");

#[derive(Debug, Deserialize)]
struct WorldFile {
    #[serde(default)]
    config: SimulationConfig,
    #[serde(default)]
    obstacles: Vec<Obstacle>,
    #[serde(default)]
    spawners: Vec<SpawnerSpec>,
    #[serde(default)]
    containers: Vec<ContainerSpec>,
    #[serde(default)]
    npcs: Vec<NpcSpec>,
    player: Option<Vec2>,
}

#[derive(Debug, Deserialize)]
struct SpawnerSpec {
    position: Vec2,
    max_alive: u32,
    radius: f32,
}

#[derive(Debug, Deserialize)]
struct ContainerSpec {
    position: Vec2,
    capacity: u32,
}

#[derive(Debug, Deserialize)]
struct NpcSpec {
    name: String,
    position: Vec2,
    speed: f32,
    destination: Option<Vec2>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let world: WorldFile = match std::env::args().skip(1).find(|a| !a.starts_with("--")) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
        None => serde_json::from_str(WORLD_JSON)?,
    };

    println!("=== Tundra Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. World file validation
    results.extend(validate_world_file(&world)?);

    // 2. Grid pathfinding on synthetic grids
    results.extend(validate_pathfinding(verbose)?);

    // 3. Hitbox resolution frequencies
    results.extend(validate_hitbox(verbose));

    // 4. Calendar, weather and lighting over a year
    results.extend(validate_clock(verbose)?);

    // 5. Full engine run over the world file
    results.extend(validate_engine_run(&world, verbose)?);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── 1. World File ───────────────────────────────────────────────────────

fn validate_world_file(world: &WorldFile) -> Result<Vec<TestResult>, ConfigError> {
    println!("--- World File ---");
    let mut results = Vec::new();

    let config_ok = world.config.validate();
    results.push(check(
        "world_config_valid",
        config_ok.is_ok(),
        match &config_ok {
            Ok(()) => "configuration accepted".into(),
            Err(e) => e.to_string(),
        },
    ));
    if config_ok.is_err() {
        return Ok(results);
    }

    let bad_scale = world
        .obstacles
        .iter()
        .filter(|o| !(o.scale.x > 0.0 && o.scale.y > 0.0))
        .count();
    results.push(check(
        "world_obstacle_scales",
        bad_scale == 0,
        format!(
            "{} obstacles, {} with non-positive scale",
            world.obstacles.len(),
            bad_scale
        ),
    ));

    let mut grid = Grid::from_config(&world.config.grid)?;
    let report = rasterize_obstacles(&mut grid, &world.obstacles);
    let doors = world
        .obstacles
        .iter()
        .filter(|o| o.kind == ObstacleKind::Door)
        .count();

    results.push(check(
        "world_doors_skipped",
        report.doors_skipped == doors,
        format!("{} doors, {} skipped", doors, report.doors_skipped),
    ));
    results.push(check(
        "world_obstacles_on_grid",
        report.obstacles_outside == 0,
        format!(
            "{} marked, {} outside, {} cells blocked",
            report.obstacles_marked, report.obstacles_outside, report.cells_blocked
        ),
    ));

    // Door centers stay open even when walls touch them
    let closed_doors = world
        .obstacles
        .iter()
        .filter(|o| o.kind == ObstacleKind::Door)
        .filter(|o| !grid.cell_at_world(o.position).is_some_and(|c| c.is_walkable))
        .count();
    results.push(check(
        "world_doors_walkable",
        closed_doors == 0,
        format!("{} door centers blocked", closed_doors),
    ));

    // Every placed thing must start on a walkable cell
    let mut placements: Vec<(String, Vec2)> = Vec::new();
    placements.extend(world.player.map(|p| ("player".to_string(), p)));
    for npc in &world.npcs {
        placements.push((npc.name.clone(), npc.position));
        placements.extend(npc.destination.map(|d| (format!("{} destination", npc.name), d)));
    }
    for (i, spawner) in world.spawners.iter().enumerate() {
        placements.push((format!("spawner {}", i), spawner.position));
    }
    for (i, container) in world.containers.iter().enumerate() {
        placements.push((format!("container {}", i), container.position));
    }
    let misplaced: Vec<&str> = placements
        .iter()
        .filter(|(_, at)| !grid.cell_at_world(*at).is_some_and(|c| c.is_walkable))
        .map(|(name, _)| name.as_str())
        .collect();
    results.push(check(
        "world_placements_walkable",
        misplaced.is_empty(),
        if misplaced.is_empty() {
            format!("{} placements on open ground", placements.len())
        } else {
            format!("blocked: {}", misplaced.join(", "))
        },
    ));

    let bad_spawners = world
        .spawners
        .iter()
        .filter(|s| s.max_alive == 0 || s.radius < 0.0)
        .count();
    results.push(check(
        "world_spawners_valid",
        bad_spawners == 0,
        format!("{} spawners, {} invalid", world.spawners.len(), bad_spawners),
    ));

    Ok(results)
}

// ── 2. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(verbose: bool) -> Result<Vec<TestResult>, ConfigError> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    // Diagonal across an empty 10×10 grid
    let mut pf = Pathfinder::new(Grid::new(10, 10, 10.0, 0.0)?);
    let path = pf.find_tile_path(GridPos::new(0, 0), GridPos::new(9, 9));
    let cost = path.as_deref().map(path_cost);
    results.push(check(
        "path_diagonal_cost",
        cost == Some(126) && path.as_ref().map(Vec::len) == Some(10),
        format!("cost {:?}, {} cells", cost, path.map_or(0, |p| p.len())),
    ));

    // A reserved cell cuts a one-wide corridor
    let mut pf = Pathfinder::new(Grid::new(10, 3, 10.0, 0.0)?);
    for x in 0..10 {
        pf.grid_mut().set_walkable(GridPos::new(x, 0), false);
        pf.grid_mut().set_walkable(GridPos::new(x, 2), false);
    }
    pf.grid_mut().set_occupied(GridPos::new(5, 1), true);
    let blocked = pf.find_tile_path(GridPos::new(0, 1), GridPos::new(9, 1));
    results.push(check(
        "path_occupied_corridor",
        blocked.is_none(),
        "occupied corridor cell blocks the only route".into(),
    ));

    // Out-of-bounds requests fail without touching the grid
    let mut pf = Pathfinder::new(Grid::new(10, 10, 10.0, 0.0)?);
    let outside = pf.find_tile_path(GridPos::new(0, 0), GridPos::new(10, 4));
    let before = pf.find_tile_path(GridPos::new(-1, 0), GridPos::new(4, 4));
    results.push(check(
        "path_out_of_bounds",
        outside.is_none() && before.is_none() && pf.grid().occupied_count() == 0,
        format!("{} cells occupied after", pf.grid().occupied_count()),
    ));

    // Nine agents share one goal; a tenth finds nothing
    let mut pf = Pathfinder::new(Grid::new(30, 30, 10.0, 0.0)?);
    let goal = GridPos::new(15, 15);
    let mut ends = HashSet::new();
    for i in 0..9 {
        if let Some(end) = pf
            .find_tile_path(GridPos::new(i * 3, 0), goal)
            .and_then(|p| p.last().copied())
        {
            ends.insert(end);
        }
    }
    let tenth = pf.find_tile_path(GridPos::new(29, 29), goal);
    results.push(check(
        "path_goal_spread",
        ends.len() == 9 && tenth.is_none() && pf.grid().occupied_count() == 9,
        format!(
            "{} distinct ends, tenth {}",
            ends.len(),
            if tenth.is_none() { "refused" } else { "served" }
        ),
    ));

    // Open-grid sweep: optimal when under the cost cap, refused above it
    let mut pf = Pathfinder::new(Grid::new(200, 200, 10.0, 1000.0)?);
    let mut rng = StdRng::seed_from_u64(42);
    let mut served = 0;
    let mut capped = 0;
    let mut wrong = Vec::new();
    for _ in 0..200 {
        let start = GridPos::new(rng.gen_range(0..200), rng.gen_range(0..200));
        let end = GridPos::new(rng.gen_range(0..200), rng.gen_range(0..200));
        let expected = octile_distance(start, end);
        pf.grid_mut().clear_occupancy();
        match pf.find_tile_path(start, end) {
            Some(path) if expected <= 1000 && path_cost(&path) == expected => served += 1,
            None if expected > 1000 => capped += 1,
            other => wrong.push(format!(
                "{:?}->{:?} expected {} got {:?}",
                start,
                end,
                expected,
                other.map(|p| path_cost(&p))
            )),
        }
    }
    if verbose {
        println!("  sweep: {} served, {} over the cost cap", served, capped);
    }
    results.push(check(
        "path_open_grid_sweep",
        wrong.is_empty(),
        if wrong.is_empty() {
            format!("{} optimal, {} capped", served, capped)
        } else {
            wrong.join("; ")
        },
    ));

    Ok(results)
}

// ── 3. Hitbox ───────────────────────────────────────────────────────────

fn validate_hitbox(verbose: bool) -> Vec<TestResult> {
    println!("--- Hitbox ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(7);

    const SHOTS: usize = 10_000;
    let mut head = 0;
    let mut torso = 0;
    let mut legs = 0;
    let mut stray_arms = 0;
    let mut bad_main = 0;
    for _ in 0..SHOTS {
        let outcome = resolve_hit(&CrossedColliders::all(), &mut rng);
        let mains = [BodyPart::Head, BodyPart::Torso, BodyPart::LeftLeg, BodyPart::RightLeg]
            .into_iter()
            .filter(|p| outcome.is_hit(*p))
            .count();
        if mains != 1 {
            bad_main += 1;
        }
        match outcome.main_part() {
            Some(MainPart::Head) => head += 1,
            Some(MainPart::Torso) => torso += 1,
            Some(MainPart::Legs) => legs += 1,
            None => {}
        }
        let arm = outcome.is_hit(BodyPart::LeftArm) || outcome.is_hit(BodyPart::RightArm);
        if arm && outcome.main_part() != Some(MainPart::Torso) {
            stray_arms += 1;
        }
    }

    results.push(check(
        "hitbox_one_main_part",
        bad_main == 0,
        format!("{} of {} shots without exactly one main part", bad_main, SHOTS),
    ));
    results.push(check(
        "hitbox_arms_only_with_torso",
        stray_arms == 0,
        format!("{} arm hits without a torso hit", stray_arms),
    ));

    let share = |n: usize| n as f32 / SHOTS as f32;
    let frequencies = [("head", head, 0.15), ("torso", torso, 0.45), ("legs", legs, 0.40)];
    for (part, count, expected) in frequencies {
        if verbose {
            println!("  {}: {:.3} (expected {:.2})", part, share(count), expected);
        }
        results.push(check(
            &format!("hitbox_{}_frequency", part),
            (share(count) - expected).abs() < 0.02,
            format!("{:.3} vs {:.2}", share(count), expected),
        ));
    }

    // A lone arm collider is always hit
    let lone = CrossedColliders {
        right_arm: true,
        ..CrossedColliders::default()
    };
    let misses = (0..1000)
        .map(|_| resolve_hit(&lone, &mut rng))
        .filter(|o| !(o.is_hit(BodyPart::RightArm) && o.count() == 1))
        .count();
    results.push(check(
        "hitbox_lone_arm",
        misses == 0,
        format!("{} of 1000 lone-arm shots missed", misses),
    ));

    let nothing = resolve_hit(&CrossedColliders::default(), &mut rng);
    results.push(check(
        "hitbox_nothing_crossed",
        nothing.is_miss(),
        "no colliders crossed, no parts hit".into(),
    ));

    results
}

// ── 4. Clock, Weather & Lighting ────────────────────────────────────────

fn validate_clock(verbose: bool) -> Result<Vec<TestResult>, ConfigError> {
    println!("--- Clock & Weather ---");
    let mut results = Vec::new();

    // One game hour per tick for a full year
    let config = ClockConfig {
        time_multiplier: SECONDS_PER_HOUR,
        ..ClockConfig::default()
    };
    let mut clock = WorldClock::new(&config, WeatherConfig::default())?;
    let mut rng = StdRng::seed_from_u64(99);
    let start = clock.date();

    let mut rollovers = 0;
    let mut timer_fires = 0;
    let mut days_seen = [0u32; 12];
    let mut inverted_days = 0;
    let mut coldest = f32::MAX;
    let mut warmest = f32::MIN;
    for _ in 0..(365 * 24) {
        let tick = clock.tick(1.0, &mut rng);
        if let Some((date, _)) = tick.rollover {
            rollovers += 1;
            days_seen[(date.month - 1) as usize] += 1;
            let weather = clock.weather();
            if [weather.yesterday, weather.today, weather.tomorrow]
                .iter()
                .any(|d| d.min > d.max)
            {
                inverted_days += 1;
            }
        }
        if tick.respawn_timer_fired {
            timer_fires += 1;
        }
        coldest = coldest.min(clock.outside_temp());
        warmest = warmest.max(clock.outside_temp());
    }

    let end = clock.date();
    results.push(check(
        "clock_year_rollover",
        rollovers == 365 && end.year == start.year + 1 && end.month == start.month && end.day == start.day,
        format!("{} rollovers, {} → {}", rollovers, start, end),
    ));

    let wrong_months: Vec<u32> = (1..=12)
        .filter(|m| days_seen[(*m - 1) as usize] != days_in_month(*m))
        .collect();
    results.push(check(
        "clock_month_lengths",
        wrong_months.is_empty(),
        format!("months with wrong day counts: {:?}", wrong_months),
    ));

    results.push(check(
        "clock_respawn_timer",
        timer_fires == 365 * 24 / 5,
        format!("{} timer respawns in a year", timer_fires),
    ));

    if verbose {
        println!("  outdoor range {:.1}°C .. {:.1}°C", coldest, warmest);
    }
    results.push(check(
        "weather_days_ordered",
        inverted_days == 0,
        format!("{} rollovers with min above max", inverted_days),
    ));
    results.push(check(
        "weather_range_plausible",
        coldest > -80.0 && warmest < 60.0,
        format!("{:.1}°C .. {:.1}°C", coldest, warmest),
    ));

    let anchors = [
        ("midnight", 0.0, 0.2),
        ("noon", 12.0 * SECONDS_PER_HOUR, 1.0),
        ("day end", 61_200.0, 1.0),
        ("night start", 79_200.0, 0.2),
    ];
    for (label, seconds, expected) in anchors {
        let value = light_intensity(seconds);
        results.push(check(
            &format!("light_{}", label.replace(' ', "_")),
            value == expected,
            format!("{} at {}s", value, seconds),
        ));
    }

    let dawn: Vec<f32> = (0..=10)
        .map(|i| light_intensity((5.0 + 0.5 * i as f32) * SECONDS_PER_HOUR))
        .collect();
    results.push(check(
        "light_dawn_rises",
        dawn.windows(2).all(|w| w[0] <= w[1]),
        format!("{:.2} → {:.2}", dawn[0], dawn[dawn.len() - 1]),
    ));

    Ok(results)
}

// ── 5. Engine Run ───────────────────────────────────────────────────────

fn validate_engine_run(world: &WorldFile, verbose: bool) -> Result<Vec<TestResult>, ConfigError> {
    println!("--- Engine Run ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::new(world.config.clone())?;
    let spawners: Vec<_> = world
        .spawners
        .iter()
        .map(|s| engine.add_enemy_spawner(s.position, s.max_alive, s.radius))
        .collect();
    for container in &world.containers {
        engine.add_loot_container(container.position, container.capacity);
    }
    engine.load_world(&world.obstacles)?;

    let expected_enemies: u32 = world.spawners.iter().map(|s| s.max_alive).sum();
    let expected_loot: u32 = world.containers.iter().map(|c| c.capacity).sum();
    results.push(check(
        "engine_initial_load",
        engine.enemy_count() == expected_enemies as usize && engine.loot_in_world() == expected_loot,
        format!(
            "{} enemies, {} loot after load",
            engine.enemy_count(),
            engine.loot_in_world()
        ),
    ));

    let player = world.player.map(|at| engine.spawn_player(at));
    let walkers: Vec<_> = world
        .npcs
        .iter()
        .map(|spec| {
            let npc = engine.spawn_npc(&spec.name, spec.position, spec.speed);
            if let Some(to) = spec.destination {
                engine.set_destination(npc, to);
            }
            (spec.name.as_str(), npc, spec.destination.is_some())
        })
        .collect();

    // Two in-game days at half-second frames
    let dt = 0.5;
    let multiplier = engine.clock().time_multiplier();
    let frames = (2.0 * 86_400.0 / multiplier / dt).ceil() as usize;
    let mut rollovers = 0;
    let mut paths_failed = 0;
    for _ in 0..frames {
        let frame = engine.update(dt);
        if frame.tick.day_rolled() {
            rollovers += 1;
        }
        paths_failed += frame.navigation.paths_failed;
    }
    if verbose {
        println!(
            "  {} frames, now {} {:02}:{:02}, {:.1}°C",
            frames,
            engine.clock().date(),
            engine.clock().hour(),
            engine.clock().minute(),
            engine.clock().outside_temp()
        );
    }
    results.push(check(
        "engine_two_days",
        rollovers == 2,
        format!("{} rollovers, date {}", rollovers, engine.clock().date()),
    ));

    let stuck: Vec<&str> = walkers
        .iter()
        .filter(|(_, _, routed)| *routed)
        .filter(|(_, npc, _)| {
            engine
                .world
                .get::<&NavAgent>(*npc)
                .map_or(true, |a| a.state != NavState::Arrived)
        })
        .map(|(name, _, _)| *name)
        .collect();
    results.push(check(
        "engine_npcs_arrive",
        stuck.is_empty() && paths_failed == 0,
        if stuck.is_empty() {
            format!("{} walkers arrived", walkers.len())
        } else {
            format!("not arrived: {} ({} failed requests)", stuck.join(", "), paths_failed)
        },
    ));

    let reserved = engine.pathfinder().grid().occupied_count();
    results.push(check(
        "engine_reservations_bounded",
        reserved <= walkers.len(),
        format!("{} cells reserved by {} walkers", reserved, walkers.len()),
    ));

    // Kill one spawner's enemies; the respawn timer replaces them
    if let Some(&spawner) = spawners.first() {
        let victims: Vec<_> = engine
            .world
            .query::<&Enemy>()
            .iter()
            .filter(|(_, e)| e.spawner == spawner)
            .map(|(entity, _)| entity)
            .collect();
        let head = CrossedColliders {
            head: true,
            ..CrossedColliders::default()
        };
        let killed = victims
            .iter()
            .filter_map(|v| engine.fire_shot(*v, head, 100.0))
            .filter(|r| r.killed)
            .count();
        let after_kill = engine.enemy_count();

        let interval = engine.config().clock.respawn_interval_seconds;
        let frames = (interval / multiplier / dt).ceil() as usize + 1;
        for _ in 0..frames {
            engine.update(dt);
        }
        results.push(check(
            "engine_enemies_respawn",
            killed == victims.len() && engine.enemy_count() == expected_enemies as usize,
            format!(
                "{} killed, {} left, {} after one respawn interval",
                killed,
                after_kill,
                engine.enemy_count()
            ),
        ));
    }

    // Rest fast-forwards the clock and restores the multiplier
    if let Some(player) = player {
        let hour_before = engine.clock().hour();
        let tiredness_before = engine
            .world
            .get::<&Needs>(player)
            .map_or(0.0, |n| n.tiredness);
        let started = engine.begin_rest(4.0);
        let rest_frames = (engine.config().clock.rest_real_seconds / dt).ceil() as usize + 1;
        for _ in 0..rest_frames {
            engine.update(dt);
        }
        let tiredness_after = engine
            .world
            .get::<&Needs>(player)
            .map_or(0.0, |n| n.tiredness);
        let still_resting = engine.world.get::<&Resting>(player).is_ok();
        results.push(check(
            "engine_rest",
            started
                && !still_resting
                && engine.clock().time_multiplier() == multiplier
                && tiredness_after <= tiredness_before,
            format!(
                "{:02}h → {:02}h, tiredness {:.2} → {:.2}",
                hour_before,
                engine.clock().hour(),
                tiredness_before,
                tiredness_after
            ),
        ));
    }

    Ok(results)
}
