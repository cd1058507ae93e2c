//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems. Needs and body status
//! come straight from `tundra_logic` and are attached as-is.

mod characters;
mod common;
mod equipment;
mod navigation;
mod world;

pub use characters::*;
pub use common::*;
pub use equipment::*;
pub use navigation::*;
pub use world::*;

pub use tundra_logic::body::BodyStatus;
pub use tundra_logic::survival::Needs;
