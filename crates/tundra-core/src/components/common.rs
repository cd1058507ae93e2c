//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};
use tundra_logic::geometry::Vec2;

/// World-space position in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub world: Vec2,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            world: Vec2::new(x, y),
        }
    }
}

impl From<Vec2> for Position {
    fn from(world: Vec2) -> Self {
        Self { world }
    }
}

/// Display name for logs and UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);
