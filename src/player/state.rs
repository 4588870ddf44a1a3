//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live here.
//! Systems that mutate this state are in the sibling modules:
//! - [`super::control`] — look, recoil settling, movement
//! - [`super::combat`] — firing, reloading, weapon switch, bullet flight

use crate::weapon::WeaponKind;
use bevy::prelude::*;
use rand::Rng;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player entity.  Its `Transform` is the camera pose.
#[derive(Component)]
pub struct Player;

/// Current health and the time of the most recent hit.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerHealth {
    pub hp: f32,
    pub max_hp: f32,
    /// Session-clock time of the last damage instance; `None` if never hit.
    pub last_damage_secs: Option<f64>,
}

impl PlayerHealth {
    pub fn new(max_hp: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            last_damage_secs: None,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Kinematic state owned by the movement controller.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerMotion {
    /// Camera-local planar velocity (`x` = right, `y` = forward) used by the
    /// damped movement model.  Unused by the direct model.
    pub planar_velocity: Vec2,
    /// Vertical speed (u/s), positive up.
    pub vertical_velocity: f32,
    /// Whether the player is standing on the terrain.
    pub grounded: bool,
}

/// Look orientation in radians.  `yaw = 0, pitch = 0` faces −Z.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAngles {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// A fired projectile.
#[derive(Component, Debug, Clone, Copy)]
pub struct Bullet {
    /// World-space velocity (u/s).
    pub velocity: Vec3,
    /// Seconds left before the bullet expires.
    pub lifetime: f32,
}

// ── Resources ──────────────────────────────────────────────────────────────────

/// Points accumulated this session.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerScore {
    pub points: u32,
}

/// Whether the pointer is captured.  Player input is ignored while `false`.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerCaptured(pub bool);

/// Accumulated camera recoil: `x` drives yaw, `y` drives pitch.
///
/// Shots and enemy hits add to it; [`Recoil::settle`] bleeds it off every frame.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct Recoil(pub Vec2);

impl Recoil {
    /// Add the kick of one shot of a weapon with recoil magnitude `magnitude`.
    pub fn kick(&mut self, magnitude: f32, rng: &mut impl Rng) {
        self.0 += Vec2::new((rng.gen::<f32>() - 0.5) * magnitude, -magnitude * 0.5);
    }

    /// Add a random shake of half-width `amount` on both axes.
    pub fn shake(&mut self, amount: f32, rng: &mut impl Rng) {
        self.0 += Vec2::new(
            (rng.gen::<f32>() - 0.5) * 2.0 * amount,
            (rng.gen::<f32>() - 0.5) * 2.0 * amount,
        );
    }

    /// Return the camera rotation (yaw, pitch) to apply this frame and decay.
    ///
    /// Below `epsilon` the recoil counts as settled and yields `None`.
    pub fn settle(&mut self, dt: f32, gain: f32, decay: f32, epsilon: f32) -> Option<Vec2> {
        if self.0.length() <= epsilon {
            return None;
        }
        let delta = self.0 * dt * gain;
        self.0 *= decay;
        Some(delta)
    }
}

// ── Input Abstraction ──────────────────────────────────────────────────────────

/// Aggregated player intent for the current frame.
///
/// The keyboard/mouse layer in [`crate::input`] overwrites this every frame.
/// Tests populate it directly to drive the player without an input device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Diagonal: forward + left at once.
    pub strafe_forward_left: bool,
    /// Diagonal: forward + right at once.
    pub strafe_forward_right: bool,
    pub jump: bool,
    /// Mouse motion this frame (pixels).
    pub look_delta: Vec2,
    /// Primary action pressed this frame (edge-triggered).
    pub fire: bool,
    /// Reload key pressed this frame.
    pub reload: bool,
    /// Weapon-select key pressed this frame.
    pub select_weapon: Option<WeaponKind>,
}
