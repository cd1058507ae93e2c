//! World-fixture components: enemy spawners and loot containers.
//!
//! Both react to respawn broadcasts from the engine. Spawners top up
//! their live enemies on every broadcast; containers restock on the
//! initial load and at day rollover only.

use serde::{Deserialize, Serialize};
use tundra_logic::clock::RespawnCause;

/// Spawns enemies around its position, up to a live cap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawner {
    /// Maximum enemies from this spawner alive at once
    pub max_alive: u32,
    /// Enemies are placed within this distance of the spawner
    pub radius: f32,
    /// Movement speed given to spawned enemies (world units per second)
    pub enemy_speed: f32,
    /// Total enemies spawned over the spawner's lifetime
    pub total_spawned: u32,
    pub last_cause: Option<RespawnCause>,
}

impl EnemySpawner {
    pub fn new(max_alive: u32, radius: f32) -> Self {
        Self {
            max_alive,
            radius: radius.max(0.0),
            enemy_speed: 20.0,
            total_spawned: 0,
            last_cause: None,
        }
    }

    /// How many enemies a broadcast should add given the current live count.
    pub fn deficit(&self, alive: u32) -> u32 {
        self.max_alive.saturating_sub(alive)
    }
}

/// A lootable container that restocks over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootContainer {
    pub capacity: u32,
    pub items: u32,
    pub restocks: u32,
}

impl LootContainer {
    /// A container starts empty and fills on the initial-load broadcast.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            items: 0,
            restocks: 0,
        }
    }

    /// Whether a broadcast with this cause restocks containers.
    pub fn restocks_on(cause: RespawnCause) -> bool {
        matches!(cause, RespawnCause::InitialLoad | RespawnCause::DayRollover)
    }

    /// Refill to capacity. Returns the number of items added.
    pub fn restock(&mut self) -> u32 {
        let added = self.capacity.saturating_sub(self.items);
        self.items = self.capacity;
        self.restocks += 1;
        added
    }

    /// Take up to `count` items. Returns how many were taken.
    pub fn take(&mut self, count: u32) -> u32 {
        let taken = count.min(self.items);
        self.items -= taken;
        taken
    }
}
