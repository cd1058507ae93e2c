//! Body parts and per-part character health.
//!
//! `BodyPart` indexes fixed-size arrays instead of string-keyed maps.
//! `BodyStatus` is the character status component that receives damage
//! from resolved hits.

use serde::{Deserialize, Serialize};

use crate::constants::body::{ARM_HEALTH, HEAD_HEALTH, LEG_HEALTH, TORSO_HEALTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl BodyPart {
    pub const COUNT: usize = 6;

    pub const ALL: [BodyPart; Self::COUNT] = [
        BodyPart::Head,
        BodyPart::Torso,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Torso => "torso",
            BodyPart::LeftArm => "left arm",
            BodyPart::RightArm => "right arm",
            BodyPart::LeftLeg => "left leg",
            BodyPart::RightLeg => "right leg",
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            BodyPart::Head => HEAD_HEALTH,
            BodyPart::Torso => TORSO_HEALTH,
            BodyPart::LeftArm | BodyPart::RightArm => ARM_HEALTH,
            BodyPart::LeftLeg | BodyPart::RightLeg => LEG_HEALTH,
        }
    }

    /// Losing this part kills the character.
    pub fn is_vital(self) -> bool {
        matches!(self, BodyPart::Head | BodyPart::Torso)
    }

    pub fn is_limb(self) -> bool {
        !self.is_vital()
    }
}

/// Receives damage for individual body parts.
pub trait StatusSink {
    fn apply_damage(&mut self, damage: f32, part: BodyPart);
}

impl StatusSink for Vec<(f32, BodyPart)> {
    fn apply_damage(&mut self, damage: f32, part: BodyPart) {
        self.push((damage, part));
    }
}

/// Health of each body part of one character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyStatus {
    health: [f32; BodyPart::COUNT],
    pub hits_taken: u32,
    pub damage_taken: f32,
}

impl Default for BodyStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyStatus {
    pub fn new() -> Self {
        Self {
            health: BodyPart::ALL.map(BodyPart::max_health),
            hits_taken: 0,
            damage_taken: 0.0,
        }
    }

    pub fn health(&self, part: BodyPart) -> f32 {
        self.health[part.index()]
    }

    /// Remaining health as a fraction of the part's maximum.
    pub fn health_fraction(&self, part: BodyPart) -> f32 {
        self.health(part) / part.max_health()
    }

    pub fn is_dead(&self) -> bool {
        BodyPart::ALL
            .iter()
            .any(|p| p.is_vital() && self.health(*p) <= 0.0)
    }

    /// Limbs at zero health.
    pub fn broken_limbs(&self) -> Vec<BodyPart> {
        BodyPart::ALL
            .iter()
            .copied()
            .filter(|p| p.is_limb() && self.health(*p) <= 0.0)
            .collect()
    }

    /// Restore health to one part, capped at its maximum.
    pub fn heal(&mut self, part: BodyPart, amount: f32) {
        let slot = &mut self.health[part.index()];
        *slot = (*slot + amount).min(part.max_health());
    }

    /// Overall condition: summed health over summed maximums.
    pub fn overall(&self) -> f32 {
        let max: f32 = BodyPart::ALL.iter().map(|p| p.max_health()).sum();
        self.health.iter().sum::<f32>() / max
    }
}

impl StatusSink for BodyStatus {
    fn apply_damage(&mut self, damage: f32, part: BodyPart) {
        let slot = &mut self.health[part.index()];
        *slot = (*slot - damage).max(0.0);
        self.hits_taken += 1;
        self.damage_taken += damage;
    }
}
