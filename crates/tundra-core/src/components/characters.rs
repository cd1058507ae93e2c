//! Character markers: who is the player, who is hostile, who is down.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Marker for the player character
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// Marker for non-player characters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Npc;

/// A hostile NPC and the spawner that produced it
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub spawner: Entity,
}

/// Marker for characters that died but stay in the world
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Dead;

/// Character is resting; tiredness falls instead of rising
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Resting;

/// Character is indoors and protected from the outside temperature
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Sheltered;

/// Character is sprinting and burning stamina
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Sprinting;
