//! Weapon kinds, their immutable stat table, and the mutable magazine state.
//!
//! ## Stat table
//!
//! | Kind    | Damage | Interval (s) | Magazine | Reload (s) | Spread | Recoil |
//! |---------|--------|--------------|----------|------------|--------|--------|
//! | Rifle   | 25     | 0.15         | 30       | 2.0        | 0.02   | 0.05   |
//! | Shotgun | 15     | 0.80         | 8        | 3.0        | 0.15   | 0.15   |
//! | Pistol  | 20     | 0.30         | 15       | 1.5        | 0.05   | 0.08   |
//!
//! ## Firing rules
//!
//! [`WeaponState::try_fire`] refuses (returns `None`, changes nothing) when the
//! magazine is empty, a reload is running, or less than the weapon's fire
//! interval has passed since the last shot.  Otherwise it spends one round and
//! returns how many projectiles to spawn: [`SHOTGUN_PELLETS`] for the shotgun,
//! one for everything else.
//!
//! Switching weapon swaps the stat table immediately.  The round count is
//! *not* touched by a switch; only the next finished reload brings it to the
//! new weapon's magazine size.

use crate::constants::SHOTGUN_PELLETS;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeaponKind {
    #[default]
    Rifle,
    Shotgun,
    Pistol,
}

/// Immutable per-kind weapon parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    /// Damage dealt by each projectile that hits.
    pub damage: f32,
    /// Minimum seconds between two shots.
    pub fire_interval_secs: f32,
    /// Rounds in a full magazine.
    pub magazine: u32,
    /// Seconds a reload takes.
    pub reload_secs: f32,
    /// Per-axis random deviation applied to the aim vector.
    pub spread: f32,
    /// Recoil impulse added to the camera per shot.
    pub recoil: f32,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Rifle, WeaponKind::Shotgun, WeaponKind::Pistol];

    pub const fn stats(self) -> WeaponStats {
        match self {
            WeaponKind::Rifle => WeaponStats {
                damage: 25.0,
                fire_interval_secs: 0.15,
                magazine: 30,
                reload_secs: 2.0,
                spread: 0.02,
                recoil: 0.05,
            },
            WeaponKind::Shotgun => WeaponStats {
                damage: 15.0,
                fire_interval_secs: 0.8,
                magazine: 8,
                reload_secs: 3.0,
                spread: 0.15,
                recoil: 0.15,
            },
            WeaponKind::Pistol => WeaponStats {
                damage: 20.0,
                fire_interval_secs: 0.3,
                magazine: 15,
                reload_secs: 1.5,
                spread: 0.05,
                recoil: 0.08,
            },
        }
    }

    /// Projectiles spawned per shot.
    pub const fn pellets(self) -> u32 {
        match self {
            WeaponKind::Shotgun => SHOTGUN_PELLETS,
            _ => 1,
        }
    }

    /// Weapon bound to number key `slot` (1-based).
    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(WeaponKind::Rifle),
            2 => Some(WeaponKind::Shotgun),
            3 => Some(WeaponKind::Pistol),
            _ => None,
        }
    }
}

/// The player's current weapon and magazine.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WeaponState {
    pub current: WeaponKind,
    pub ammo: u32,
    pub reloading: bool,
    /// Session-clock time of the last successful shot.
    pub last_shot_secs: Option<f64>,
}

impl Default for WeaponState {
    fn default() -> Self {
        let current = WeaponKind::default();
        Self {
            current,
            ammo: current.stats().magazine,
            reloading: false,
            last_shot_secs: None,
        }
    }
}

impl WeaponState {
    #[inline]
    pub fn stats(&self) -> WeaponStats {
        self.current.stats()
    }

    /// Whether a shot at `now_secs` would be accepted.
    pub fn can_fire(&self, now_secs: f64) -> bool {
        if self.ammo == 0 || self.reloading {
            return false;
        }
        match self.last_shot_secs {
            Some(last) => now_secs - last >= f64::from(self.stats().fire_interval_secs),
            None => true,
        }
    }

    /// Spend a round if the weapon can fire; returns the projectile count.
    pub fn try_fire(&mut self, now_secs: f64) -> Option<u32> {
        if !self.can_fire(now_secs) {
            return None;
        }
        self.ammo -= 1;
        self.last_shot_secs = Some(now_secs);
        Some(self.current.pellets())
    }

    /// Start reloading.  Returns the reload duration, or `None` if a reload is
    /// already running.
    pub fn begin_reload(&mut self) -> Option<f32> {
        if self.reloading {
            return None;
        }
        self.reloading = true;
        Some(self.stats().reload_secs)
    }

    /// Refill to the *current* weapon's magazine and clear the flag.
    pub fn finish_reload(&mut self) {
        self.ammo = self.stats().magazine;
        self.reloading = false;
    }

    /// Whether the magazine is below capacity (reload key is meaningful).
    pub fn needs_reload(&self) -> bool {
        self.ammo < self.stats().magazine
    }

    /// Instantly swap to `kind`.  Ammo and reload progress are kept.
    pub fn switch_to(&mut self, kind: WeaponKind) {
        self.current = kind;
    }
}

/// Short-lived firing feedback the presentation layer may show.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FireFeedback {
    pub muzzle_lit: bool,
}

/// Perturb `aim` independently on each axis by `uniform(-0.5, 0.5) * spread`,
/// then renormalise.
pub fn spread_direction(aim: Vec3, spread: f32, rng: &mut impl Rng) -> Vec3 {
    let jitter = Vec3::new(
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
    ) * spread;
    let dir = (aim + jitter).normalize_or_zero();
    if dir == Vec3::ZERO {
        aim.normalize_or_zero()
    } else {
        dir
    }
}
