//! Hit resolution - which body parts a shot actually struck.
//!
//! The weapon's raycast has already established that a character's
//! silhouette was crossed and reports which coarse colliders it passed
//! through. Resolution happens in two steps:
//!
//! 1. At most one *main* part (head, torso or legs) is chosen by weighted
//!    draw among the crossed ones. Legs split into left/right on a coin flip.
//! 2. Arms depend on the main result. A head or leg hit leaves both arms
//!    untouched. A torso hit may also clip each crossed arm with even odds.
//!    With no main part, a lone crossed arm is always hit, while two
//!    crossed arms each get their own coin flip.
//!
//! The lone-arm guarantee and the two-arm coin flip are intentionally
//! different rules and must not be merged.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::body::{BodyPart, StatusSink};
use crate::constants::hitbox::{ARM_CHANCE, HEAD_CHANCE, LEGS_CHANCE, TORSO_CHANCE};

/// Which coarse colliders the raycast passed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossedColliders {
    pub head: bool,
    pub torso: bool,
    /// Either leg's collider.
    pub legs: bool,
    pub left_arm: bool,
    pub right_arm: bool,
}

impl CrossedColliders {
    pub fn all() -> Self {
        Self {
            head: true,
            torso: true,
            legs: true,
            left_arm: true,
            right_arm: true,
        }
    }

    pub fn any(&self) -> bool {
        self.head || self.torso || self.legs || self.left_arm || self.right_arm
    }
}

/// Mutually exclusive main hit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainPart {
    Head,
    Torso,
    Legs,
}

/// Per-part result of one resolved shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitOutcome {
    hits: [bool; BodyPart::COUNT],
}

impl HitOutcome {
    pub fn is_hit(&self, part: BodyPart) -> bool {
        self.hits[part.index()]
    }

    fn set(&mut self, part: BodyPart) {
        self.hits[part.index()] = true;
    }

    /// Parts hit, in `BodyPart::ALL` order.
    pub fn parts(&self) -> impl Iterator<Item = BodyPart> + '_ {
        BodyPart::ALL.into_iter().filter(move |p| self.is_hit(*p))
    }

    pub fn count(&self) -> usize {
        self.hits.iter().filter(|h| **h).count()
    }

    pub fn is_miss(&self) -> bool {
        self.count() == 0
    }

    /// The main category that was hit, if any.
    pub fn main_part(&self) -> Option<MainPart> {
        if self.is_hit(BodyPart::Head) {
            Some(MainPart::Head)
        } else if self.is_hit(BodyPart::Torso) {
            Some(MainPart::Torso)
        } else if self.is_hit(BodyPart::LeftLeg) || self.is_hit(BodyPart::RightLeg) {
            Some(MainPart::Legs)
        } else {
            None
        }
    }
}

/// Weighted draw among the crossed main parts.
pub fn select_main_part(crossed: &CrossedColliders, rng: &mut impl Rng) -> Option<MainPart> {
    let weights = [
        (MainPart::Head, if crossed.head { HEAD_CHANCE } else { 0.0 }),
        (MainPart::Torso, if crossed.torso { TORSO_CHANCE } else { 0.0 }),
        (MainPart::Legs, if crossed.legs { LEGS_CHANCE } else { 0.0 }),
    ];
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }

    let roll: f32 = rng.gen();
    let mut cumulative = 0.0;
    let mut last_candidate = None;
    for (part, weight) in weights {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight / total;
        last_candidate = Some(part);
        if cumulative >= roll {
            return Some(part);
        }
    }
    // Rounding can leave the cumulative sum a hair under the roll.
    last_candidate
}

/// Resolve one shot into the set of body parts it hit.
pub fn resolve_hit(crossed: &CrossedColliders, rng: &mut impl Rng) -> HitOutcome {
    let mut outcome = HitOutcome::default();

    let main = select_main_part(crossed, rng);
    match main {
        Some(MainPart::Head) => outcome.set(BodyPart::Head),
        Some(MainPart::Torso) => outcome.set(BodyPart::Torso),
        Some(MainPart::Legs) => {
            if rng.gen_bool(0.5) {
                outcome.set(BodyPart::LeftLeg)
            } else {
                outcome.set(BodyPart::RightLeg)
            }
        }
        None => {}
    }

    let (left_arm, right_arm) = match main {
        Some(MainPart::Torso) => (
            crossed.left_arm && rng.gen_bool(ARM_CHANCE),
            crossed.right_arm && rng.gen_bool(ARM_CHANCE),
        ),
        Some(_) => (false, false),
        None => match (crossed.left_arm, crossed.right_arm) {
            (true, true) => (rng.gen_bool(ARM_CHANCE), rng.gen_bool(ARM_CHANCE)),
            only => only,
        },
    };
    if left_arm {
        outcome.set(BodyPart::LeftArm);
    }
    if right_arm {
        outcome.set(BodyPart::RightArm);
    }

    outcome
}

/// Resolve a shot and apply its full damage once to every part hit.
pub fn apply_shot(
    crossed: &CrossedColliders,
    damage: f32,
    sink: &mut impl StatusSink,
    rng: &mut impl Rng,
) -> HitOutcome {
    let outcome = resolve_hit(crossed, rng);
    for part in outcome.parts() {
        sink.apply_damage(damage, part);
    }
    outcome
}
