//! Tundra Core - Survival World Simulation Engine
//!
//! An ECS-based simulation of a persistent survival world: NPCs walking a
//! tile grid, a day/night clock driving temperature and light, enemy
//! spawners and loot containers reacting to respawn broadcasts, and
//! characters whose needs and body parts wear down over time.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Player, NPCs, enemies, spawners, loot containers
//! - **Components**: Pure data attached to entities (Position, NavAgent, Needs, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! The engine owns the single pathfinder and world clock and hands them to
//! systems explicitly; nothing is looked up globally.
//!
//! # Example
//!
//! ```rust,no_run
//! use tundra_core::prelude::*;
//! use tundra_logic::config::SimulationConfig;
//! use tundra_logic::geometry::Vec2;
//!
//! let mut engine = SimulationEngine::new(SimulationConfig::default()).unwrap();
//! engine.add_enemy_spawner(Vec2::new(300.0, 300.0), 3, 40.0);
//! engine.load_world(&[]).unwrap();
//! engine.spawn_player(Vec2::ZERO);
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod engine;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{FrameReport, SimulationEngine};
}
