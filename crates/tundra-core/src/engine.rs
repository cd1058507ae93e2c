//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tundra_logic::clock::{ClockTick, RespawnCause, WorldClock};
use tundra_logic::config::{ConfigError, SimulationConfig};
use tundra_logic::geometry::Vec2;
use tundra_logic::grid::Grid;
use tundra_logic::hitbox::CrossedColliders;
use tundra_logic::pathfinding::Pathfinder;
use tundra_logic::rasterize::{rasterize_obstacles, Obstacle, PathBlockingLayer, RasterReport};
use tundra_logic::tasks::TaskScheduler;

use crate::components::*;
use crate::systems::*;

/// Delayed engine actions
#[derive(Debug, Clone, Copy, PartialEq)]
enum EngineTask {
    /// Finish a rest: restore the previous time multiplier.
    EndRest { previous_multiplier: f32 },
    /// Complete a reload or rack on `entity`'s weapon.
    FinishWeaponAction { entity: Entity, action: WeaponAction },
}

/// Everything one `update` call did
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub tick: ClockTick,
    pub respawns: Vec<(RespawnCause, RespawnReport)>,
    pub navigation: NavigationReport,
    pub tasks_completed: usize,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    config: SimulationConfig,
    pathfinder: Pathfinder,
    /// Obstacles that block sight when straightening paths
    sight: PathBlockingLayer,
    clock: WorldClock,
    tasks: TaskScheduler<EngineTask>,
    rng: StdRng,
    player: Option<Entity>,
}

impl SimulationEngine {
    /// Create an empty world (no obstacles) from configuration
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::from_config(&config.grid)?;
        let clock = WorldClock::new(&config.clock, config.weather.clone())?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            world: World::new(),
            pathfinder: Pathfinder::with_config(grid, &config.pathfinding),
            sight: PathBlockingLayer::default(),
            clock,
            tasks: TaskScheduler::new(),
            rng,
            player: None,
            config,
        })
    }

    /// Rasterize the world's static obstacles and announce the initial load.
    ///
    /// The grid is rebuilt from scratch, so all reservations are dropped.
    /// Spawners and containers added before this call receive the
    /// initial-load respawn broadcast.
    pub fn load_world(&mut self, obstacles: &[Obstacle]) -> Result<RasterReport, ConfigError> {
        let mut grid = Grid::from_config(&self.config.grid)?;
        let report = rasterize_obstacles(&mut grid, obstacles);
        self.pathfinder = Pathfinder::with_config(grid, &self.config.pathfinding);
        self.sight = PathBlockingLayer::from_obstacles(obstacles);

        for (_, agent) in self.world.query_mut::<&mut NavAgent>() {
            agent.reserved = None;
            agent.vacating = None;
        }

        info!(
            "World loaded: {} obstacles marked, {} doors, {} outside the grid, {} cells blocked, {} walkable",
            report.obstacles_marked,
            report.doors_skipped,
            report.obstacles_outside,
            report.cells_blocked,
            self.pathfinder.grid().walkable_count()
        );

        self.broadcast_respawn(RespawnCause::InitialLoad);
        Ok(report)
    }

    /// Spawn the player character. Only one player exists at a time.
    pub fn spawn_player(&mut self, position: Vec2) -> Entity {
        if let Some(existing) = self.player {
            if self.world.contains(existing) {
                warn!("Player already spawned as {:?}", existing);
                return existing;
            }
        }
        let player = self.world.spawn((
            Player,
            Name("player".to_string()),
            Position { world: position },
            Needs::default(),
            BodyStatus::new(),
        ));
        self.player = Some(player);
        player
    }

    /// Spawn a neutral NPC that navigates the grid
    pub fn spawn_npc(&mut self, name: &str, position: Vec2, speed: f32) -> Entity {
        self.world.spawn((
            Npc,
            Name(name.to_string()),
            Position { world: position },
            NavAgent::new(speed),
            Needs::default(),
            BodyStatus::new(),
        ))
    }

    pub fn add_enemy_spawner(&mut self, position: Vec2, max_alive: u32, radius: f32) -> Entity {
        self.world
            .spawn((Position { world: position }, EnemySpawner::new(max_alive, radius)))
    }

    pub fn add_loot_container(&mut self, position: Vec2, capacity: u32) -> Entity {
        self.world
            .spawn((Position { world: position }, LootContainer::new(capacity)))
    }

    /// Send an NPC toward a world position. The path is found on the next update.
    pub fn set_destination(&mut self, entity: Entity, destination: Vec2) -> bool {
        match self.world.get::<&mut NavAgent>(entity) {
            Ok(mut agent) => {
                agent.set_destination(destination);
                true
            }
            Err(_) => {
                warn!("Cannot route {:?}: no navigation agent", entity);
                false
            }
        }
    }

    /// Update the simulation by `delta_seconds` of real time
    pub fn update(&mut self, delta_seconds: f32) -> FrameReport {
        let mut frame = FrameReport::default();
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            warn!("Ignoring update with invalid delta {}", delta_seconds);
            return frame;
        }

        // Clock first, so a rest sees every frame of its fast-forward
        frame.tick = self.clock.tick(delta_seconds, &mut self.rng);
        if let Some((date, roll)) = frame.tick.rollover {
            info!(
                "Day rollover to {}: tomorrow averages {:.1}°C (nudge {:+.0})",
                date, roll.average, roll.nudge
            );
        }
        for cause in frame.tick.respawn_causes() {
            let report = self.broadcast_respawn(cause);
            frame.respawns.push((cause, report));
        }

        // Timed tasks pause with the clock
        if self.clock.is_running() {
            for task in self.tasks.advance(delta_seconds) {
                self.run_task(task);
                frame.tasks_completed += 1;
            }
        }

        let delta_hours = frame.tick.delta / 3600.0;
        needs_system(
            &mut self.world,
            delta_hours,
            delta_seconds,
            self.clock.outside_temp(),
            &self.config.survival,
        );

        frame.navigation = navigation_system(
            &mut self.world,
            &mut self.pathfinder,
            &self.sight,
            &mut self.rng,
            delta_seconds,
        );
        if frame.navigation.paths_failed > 0 {
            debug!("{} path requests failed", frame.navigation.paths_failed);
        }

        frame
    }

    fn broadcast_respawn(&mut self, cause: RespawnCause) -> RespawnReport {
        let report = respawn_system(&mut self.world, cause, &mut self.rng);
        info!(
            "Respawn ({:?}): {} enemies spawned, {} containers restocked",
            cause, report.enemies_spawned, report.containers_restocked
        );
        report
    }

    fn run_task(&mut self, task: EngineTask) {
        match task {
            EngineTask::EndRest {
                previous_multiplier,
            } => {
                self.clock.set_time_multiplier(previous_multiplier);
                if let Some(player) = self.player {
                    if self.world.remove_one::<Resting>(player).is_err() {
                        debug!("Rest ended without a resting player");
                    }
                }
                debug!(
                    "Rest finished at {:02}:{:02}, multiplier back to {}",
                    self.clock.hour(),
                    self.clock.minute(),
                    previous_multiplier
                );
            }
            EngineTask::FinishWeaponAction { entity, action } => {
                match self.world.get::<&mut Weapon>(entity) {
                    Ok(mut weapon) => {
                        if weapon.finish(action) {
                            debug!("{:?} finished {:?}", entity, action);
                        }
                    }
                    Err(_) => debug!("{:?} lost its weapon before {:?} finished", entity, action),
                }
            }
        }
    }

    /// Fire a resolved shot at `target`
    ///
    /// Returns `None` (and logs a warning) when the target cannot be hit.
    pub fn fire_shot(
        &mut self,
        target: Entity,
        crossed: CrossedColliders,
        damage: f32,
    ) -> Option<ShotReport> {
        let Some(report) = shoot(&mut self.world, target, &crossed, damage, &mut self.rng) else {
            warn!("Shot at {:?} ignored: no living body status", target);
            return None;
        };

        if report.killed {
            info!("{:?} killed", target);
            handle_death(&mut self.world, &mut self.pathfinder, target);
        }
        Some(report)
    }

    /// Give `entity` a loaded weapon, replacing any it carried.
    pub fn give_weapon(&mut self, entity: Entity, magazine_size: u32) -> bool {
        if self.world.insert_one(entity, Weapon::new(magazine_size)).is_err() {
            warn!("Cannot arm {:?}: no such entity", entity);
            return false;
        }
        true
    }

    /// Fire `shooter`'s weapon at `target`.
    ///
    /// Spends the chambered round; the weapon must be racked before the next
    /// shot. Returns `None` when the weapon cannot fire or the target cannot
    /// be hit.
    pub fn fire_weapon(
        &mut self,
        shooter: Entity,
        target: Entity,
        crossed: CrossedColliders,
        damage: f32,
    ) -> Option<ShotReport> {
        let fired = self
            .world
            .get::<&mut Weapon>(shooter)
            .map_or(false, |mut weapon| weapon.discharge());
        if !fired {
            debug!("{:?} cannot fire", shooter);
            return None;
        }
        self.fire_shot(target, crossed, damage)
    }

    /// Start refilling `entity`'s magazine; it completes after `seconds`.
    pub fn begin_reload(&mut self, entity: Entity, seconds: f32) -> bool {
        self.begin_weapon_action(entity, WeaponAction::Reloading, seconds)
    }

    /// Start chambering a round; it completes after `seconds`.
    pub fn begin_rack(&mut self, entity: Entity, seconds: f32) -> bool {
        self.begin_weapon_action(entity, WeaponAction::Racking, seconds)
    }

    fn begin_weapon_action(&mut self, entity: Entity, action: WeaponAction, seconds: f32) -> bool {
        if !seconds.is_finite() || seconds < 0.0 {
            warn!("Cannot start {:?} lasting {} seconds", action, seconds);
            return false;
        }
        let Ok(mut weapon) = self.world.get::<&mut Weapon>(entity) else {
            warn!("{:?} has no weapon", entity);
            return false;
        };
        if !weapon.can_start(action) {
            debug!("{:?} cannot start {:?}", entity, action);
            return false;
        }
        weapon.action = Some(action);
        drop(weapon);

        self.tasks
            .schedule(seconds, EngineTask::FinishWeaponAction { entity, action });
        true
    }

    /// Fast-forward `hours` of game time over a few real seconds while the
    /// player rests. Returns `false` when no rest could be started.
    pub fn begin_rest(&mut self, hours: f32) -> bool {
        let Some(player) = self.player.filter(|p| self.world.contains(*p)) else {
            warn!("Cannot rest: no player");
            return false;
        };
        if !hours.is_finite() || hours <= 0.0 {
            warn!("Cannot rest for {} hours", hours);
            return false;
        }
        if self.world.get::<&Resting>(player).is_ok() {
            warn!("Player is already resting");
            return false;
        }

        let real_seconds = self.config.clock.rest_real_seconds;
        let previous_multiplier = self.clock.time_multiplier();
        if !self.clock.set_time_multiplier(hours * 3600.0 / real_seconds) {
            return false;
        }
        if self.world.insert_one(player, Resting).is_err() {
            warn!("Cannot rest: player {:?} vanished", player);
            self.clock.set_time_multiplier(previous_multiplier);
            return false;
        }
        self.tasks.schedule(
            real_seconds,
            EngineTask::EndRest {
                previous_multiplier,
            },
        );
        info!("Resting {} hours over {} real seconds", hours, real_seconds);
        true
    }

    pub fn stop_time(&mut self) {
        self.clock.stop_time();
    }

    pub fn start_time(&mut self) {
        self.clock.start_time();
    }

    pub fn clock(&self) -> &WorldClock {
        &self.clock
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Count living enemies
    pub fn enemy_count(&self) -> usize {
        self.world.query::<&Enemy>().without::<&Dead>().iter().count()
    }

    /// Count NPCs, enemies included
    pub fn npc_count(&self) -> usize {
        self.world.query::<&Npc>().iter().count()
    }

    /// Items currently sitting in loot containers
    pub fn loot_in_world(&self) -> u32 {
        self.world
            .query::<&LootContainer>()
            .iter()
            .map(|(_, c)| c.items)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tundra_logic::body::BodyPart;
    use tundra_logic::config::ClockConfig;

    fn config() -> SimulationConfig {
        SimulationConfig {
            clock: ClockConfig {
                time_multiplier: 60.0,
                ..ClockConfig::default()
            },
            seed: Some(7),
            ..SimulationConfig::default()
        }
    }

    fn engine() -> SimulationEngine {
        SimulationEngine::new(config()).unwrap()
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.npc_count(), 0);
        assert_eq!(engine.clock().hour(), 8);
        assert_eq!(engine.pathfinder().grid().walkable_count(), 200 * 200);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.grid.width = 0;
        assert!(SimulationEngine::new(bad).is_err());
    }

    #[test]
    fn test_initial_load_broadcasts_respawn() {
        let mut engine = engine();
        engine.add_enemy_spawner(Vec2::new(200.0, 200.0), 4, 20.0);
        engine.add_loot_container(Vec2::new(-50.0, 0.0), 6);
        let report = engine
            .load_world(&[Obstacle::solid(Vec2::new(0.0, 0.0), 0.0, Vec2::new(40.0, 40.0))])
            .unwrap();
        assert_eq!(report.obstacles_marked, 1);
        assert_eq!(engine.enemy_count(), 4);
        assert_eq!(engine.loot_in_world(), 6);
    }

    #[test]
    fn test_time_multiplier() {
        let mut engine = engine();
        let frame = engine.update(1.0); // 1 real second = 60 sim seconds
        assert_eq!(frame.tick.delta, 60.0);
        assert_eq!(engine.clock().minute(), 1);
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut engine = engine();
        let frame = engine.update(f32::NAN);
        assert_eq!(frame.tick, ClockTick::default());
        let frame = engine.update(-1.0);
        assert_eq!(frame.tick.delta, 0.0);
    }

    #[test]
    fn test_day_rollover_restocks_containers() {
        let mut engine = engine();
        let container = engine.add_loot_container(Vec2::ZERO, 3);
        engine.load_world(&[]).unwrap();
        engine
            .world
            .get::<&mut LootContainer>(container)
            .unwrap()
            .take(3);
        assert_eq!(engine.loot_in_world(), 0);

        // 08:00 → past midnight at 60× in one-minute frames
        let mut rolled = false;
        for _ in 0..(17 * 60) {
            let frame = engine.update(1.0);
            if frame.tick.day_rolled() {
                rolled = true;
                assert!(frame
                    .respawns
                    .iter()
                    .any(|(cause, _)| *cause == RespawnCause::DayRollover));
            }
        }
        assert!(rolled);
        assert_eq!(engine.clock().day(), 2);
        assert_eq!(engine.loot_in_world(), 3);
    }

    #[test]
    fn test_respawn_timer_replaces_killed_enemy() {
        let mut engine = engine();
        engine.add_enemy_spawner(Vec2::new(300.0, 300.0), 1, 0.0);
        engine.load_world(&[]).unwrap();
        let enemy = engine
            .world
            .query::<&Enemy>()
            .iter()
            .map(|(e, _)| e)
            .next()
            .unwrap();

        let head = CrossedColliders {
            head: true,
            ..CrossedColliders::default()
        };
        let report = engine.fire_shot(enemy, head, 100.0).unwrap();
        assert!(report.killed);
        assert!(!engine.world.contains(enemy));
        assert_eq!(engine.enemy_count(), 0);

        // Five in-game hours at 60× is 300 real seconds
        for _ in 0..300 {
            engine.update(1.0);
        }
        assert_eq!(engine.enemy_count(), 1);
    }

    #[test]
    fn test_fire_shot_at_player() {
        let mut engine = engine();
        let player = engine.spawn_player(Vec2::ZERO);
        let crossed = CrossedColliders {
            legs: true,
            ..CrossedColliders::default()
        };
        let report = engine.fire_shot(player, crossed, 10.0).unwrap();
        assert!(!report.killed);
        let status = engine.world.get::<&BodyStatus>(player).unwrap();
        let legs = status.health(BodyPart::LeftLeg) + status.health(BodyPart::RightLeg);
        assert_eq!(legs, 130.0);
    }

    #[test]
    fn test_shot_at_scenery_is_rejected() {
        let mut engine = engine();
        let container = engine.add_loot_container(Vec2::ZERO, 1);
        assert!(engine
            .fire_shot(container, CrossedColliders::all(), 10.0)
            .is_none());
    }

    #[test]
    fn test_rest_fast_forwards_and_restores() {
        let mut engine = engine();
        let player = engine.spawn_player(Vec2::ZERO);
        engine.world.get::<&mut Needs>(player).unwrap().tiredness = 0.9;

        assert!(engine.begin_rest(6.0));
        assert!(!engine.begin_rest(2.0));
        assert_eq!(engine.clock().time_multiplier(), 7200.0);

        let mut completed = 0;
        for _ in 0..3 {
            completed += engine.update(1.0).tasks_completed;
        }
        assert_eq!(completed, 1);
        assert_eq!(engine.clock().hour(), 14);
        assert_eq!(engine.clock().time_multiplier(), 60.0);
        assert!(engine.world.get::<&Resting>(player).is_err());
        assert!(engine.world.get::<&Needs>(player).unwrap().tiredness < 0.9);
    }

    #[test]
    fn test_stopped_time_pauses_rest() {
        let mut engine = engine();
        let player = engine.spawn_player(Vec2::ZERO);
        assert!(engine.begin_rest(6.0));

        engine.stop_time();
        for _ in 0..3 {
            assert_eq!(engine.update(1.0).tasks_completed, 0);
        }
        assert_eq!(engine.clock().hour(), 8);
        assert_eq!(engine.clock().time_multiplier(), 7200.0);
        assert!(engine.world.get::<&Resting>(player).is_ok());

        engine.start_time();
        let mut completed = 0;
        for _ in 0..3 {
            completed += engine.update(1.0).tasks_completed;
        }
        assert_eq!(completed, 1);
        assert_eq!(engine.clock().hour(), 14);
        assert_eq!(engine.clock().time_multiplier(), 60.0);
    }

    #[test]
    fn test_weapon_fire_rack_reload_cycle() {
        let mut engine = engine();
        let player = engine.spawn_player(Vec2::ZERO);
        let target = engine.spawn_npc("target", Vec2::new(50.0, 0.0), 10.0);
        assert!(engine.give_weapon(player, 1));
        let torso = CrossedColliders {
            torso: true,
            ..CrossedColliders::default()
        };

        assert!(engine.fire_weapon(player, target, torso, 10.0).is_some());
        // Nothing chambered until racked
        assert!(engine.fire_weapon(player, target, torso, 10.0).is_none());
        assert!(!engine.begin_reload(player, -1.0));

        assert!(engine.begin_rack(player, 0.5));
        assert!(!engine.begin_reload(player, 1.0));
        assert_eq!(engine.update(0.25).tasks_completed, 0);
        assert!(engine.fire_weapon(player, target, torso, 10.0).is_none());
        assert_eq!(engine.update(0.25).tasks_completed, 1);
        assert_eq!(engine.world.get::<&Weapon>(player).unwrap().rounds, 0);
        assert!(engine.fire_weapon(player, target, torso, 10.0).is_some());

        // Magazine empty: racking is refused until a reload finishes
        assert!(!engine.begin_rack(player, 0.5));
        assert!(engine.begin_reload(player, 2.0));
        for _ in 0..4 {
            engine.update(0.5);
        }
        let weapon = engine.world.get::<&Weapon>(player).unwrap();
        assert_eq!(weapon.rounds, 1);
        assert_eq!(weapon.action, None);
        assert!(!weapon.chambered);
    }

    #[test]
    fn test_weapon_action_needs_weapon() {
        let mut engine = engine();
        let player = engine.spawn_player(Vec2::ZERO);
        assert!(!engine.begin_reload(player, 1.0));
        assert!(engine
            .fire_weapon(player, player, CrossedColliders::all(), 1.0)
            .is_none());
    }

    #[test]
    fn test_rest_requires_player() {
        let mut engine = engine();
        assert!(!engine.begin_rest(8.0));
        engine.spawn_player(Vec2::ZERO);
        assert!(!engine.begin_rest(0.0));
    }

    #[test]
    fn test_stopped_time_freezes_clock() {
        let mut engine = engine();
        engine.stop_time();
        engine.update(10.0);
        assert_eq!(engine.clock().hour(), 8);
        assert_eq!(engine.clock().minute(), 0);
        engine.start_time();
        engine.update(10.0);
        assert_eq!(engine.clock().minute(), 10);
    }

    #[test]
    fn test_npc_navigation_releases_tiles() {
        let mut engine = engine();
        engine.load_world(&[]).unwrap();
        let walker = engine.spawn_npc("walker", Vec2::new(5.0, 5.0), 50.0);
        assert!(engine.set_destination(walker, Vec2::new(105.0, 5.0)));

        let frame = engine.update(0.1);
        assert_eq!(frame.navigation.paths_found, 1);
        assert_eq!(engine.pathfinder().grid().occupied_count(), 1);
        for _ in 0..40 {
            engine.update(0.1);
        }
        assert_eq!(
            engine.world.get::<&NavAgent>(walker).unwrap().state,
            NavState::Arrived
        );

        // Route back; the first tile is released once the walker leaves it
        assert!(engine.set_destination(walker, Vec2::new(5.0, 5.0)));
        let mut released = 0;
        for _ in 0..40 {
            released += engine.update(0.1).navigation.tiles_released;
        }
        assert_eq!(released, 1);
        assert_eq!(engine.pathfinder().grid().occupied_count(), 1);
    }

    #[test]
    fn test_set_destination_needs_agent() {
        let mut engine = engine();
        let player = engine.spawn_player(Vec2::ZERO);
        assert!(!engine.set_destination(player, Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_second_player_not_spawned() {
        let mut engine = engine();
        let first = engine.spawn_player(Vec2::ZERO);
        let second = engine.spawn_player(Vec2::new(10.0, 10.0));
        assert_eq!(first, second);
    }
}
