//! Carried equipment. A weapon fires only with a round chambered and no
//! reload or rack in progress; both actions finish through the engine's
//! timed tasks.

use serde::{Deserialize, Serialize};

/// A timed weapon action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponAction {
    /// Refill the magazine
    Reloading,
    /// Move a round from the magazine into the chamber
    Racking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub magazine_size: u32,
    /// Rounds in the magazine, not counting the chamber
    pub rounds: u32,
    pub chambered: bool,
    pub action: Option<WeaponAction>,
}

impl Weapon {
    /// Full magazine and a round in the chamber
    pub fn new(magazine_size: u32) -> Self {
        Self {
            magazine_size,
            rounds: magazine_size,
            chambered: true,
            action: None,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.chambered && self.action.is_none()
    }

    /// Spend the chambered round. Returns `false` when the weapon cannot fire.
    pub fn discharge(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.chambered = false;
        true
    }

    pub fn can_start(&self, action: WeaponAction) -> bool {
        if self.action.is_some() {
            return false;
        }
        match action {
            WeaponAction::Reloading => self.rounds < self.magazine_size,
            WeaponAction::Racking => !self.chambered && self.rounds > 0,
        }
    }

    /// Complete `action` if it is the one in progress.
    pub fn finish(&mut self, action: WeaponAction) -> bool {
        if self.action != Some(action) {
            return false;
        }
        self.action = None;
        match action {
            WeaponAction::Reloading => self.rounds = self.magazine_size,
            WeaponAction::Racking => {
                if self.rounds > 0 {
                    self.rounds -= 1;
                    self.chambered = true;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_then_rack() {
        let mut weapon = Weapon::new(2);
        assert!(weapon.discharge());
        assert!(!weapon.discharge());
        assert!(weapon.can_start(WeaponAction::Racking));

        weapon.action = Some(WeaponAction::Racking);
        assert!(!weapon.can_fire());
        assert!(weapon.finish(WeaponAction::Racking));
        assert!(weapon.can_fire());
        assert_eq!(weapon.rounds, 1);
    }

    #[test]
    fn test_full_magazine_cannot_reload() {
        let mut weapon = Weapon::new(5);
        assert!(!weapon.can_start(WeaponAction::Reloading));
        weapon.rounds = 0;
        weapon.chambered = false;
        assert!(!weapon.can_start(WeaponAction::Racking));
        assert!(weapon.can_start(WeaponAction::Reloading));
    }

    #[test]
    fn test_finish_ignores_other_action() {
        let mut weapon = Weapon::new(3);
        weapon.rounds = 0;
        weapon.action = Some(WeaponAction::Reloading);
        assert!(!weapon.finish(WeaponAction::Racking));
        assert!(weapon.finish(WeaponAction::Reloading));
        assert_eq!(weapon.rounds, 3);
        assert_eq!(weapon.action, None);
    }
}
