//! Player look and movement systems.
//!
//! ## Pipeline (runs in order inside `FrameSet::Player`)
//!
//! 1. [`player_look_system`] — mouse look, recoil settling, writes the camera rotation.
//! 2. [`player_movement_system`] — planar movement and vertical physics.
//!
//! Both systems only read [`PlayerIntent`]; while the pointer is not captured
//! the intent is treated as empty, but friction, gravity and recoil decay keep
//! running.
//!
//! ## Movement models
//!
//! | Model    | Behaviour                                                        |
//! |----------|------------------------------------------------------------------|
//! | `Direct` | Position moves at `move_speed` along the input direction; no inertia |
//! | `Damped` | Velocity decays by `friction·dt` and gains `acceleration·dt` along the input |
//!
//! Both are supported on purpose: they feel different and neither replaces the other.

use super::state::{LookAngles, Player, PlayerIntent, PlayerMotion, PointerCaptured, Recoil};
use crate::config::GameConfig;
use crate::constants::PITCH_LIMIT;
use crate::session::SessionClock;
use crate::terrain::Terrain;
use bevy::prelude::*;
use serde::Deserialize;

/// How directional input turns into horizontal motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementModel {
    #[default]
    Direct,
    Damped,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Camera-relative planar basis: `(forward, right)`, both horizontal and unit length.
pub fn movement_basis(look_forward: Vec3) -> (Vec3, Vec3) {
    let forward = Vec3::new(look_forward.x, 0.0, look_forward.z).normalize_or_zero();
    let right = forward.cross(Vec3::Y).normalize_or_zero();
    (forward, right)
}

/// Combine the six directional inputs into a unit (or zero) vector,
/// `x` = right, `y` = forward.
pub fn input_axes(intent: &PlayerIntent) -> Vec2 {
    let mut axes = Vec2::ZERO;
    if intent.forward {
        axes.y += 1.0;
    }
    if intent.back {
        axes.y -= 1.0;
    }
    if intent.right {
        axes.x += 1.0;
    }
    if intent.left {
        axes.x -= 1.0;
    }
    if intent.strafe_forward_left {
        axes += Vec2::new(-1.0, 1.0);
    }
    if intent.strafe_forward_right {
        axes += Vec2::new(1.0, 1.0);
    }
    axes.normalize_or_zero()
}

/// Camera-local displacement for one frame under `model`.
///
/// The damped model integrates `motion.planar_velocity` in place.
pub fn planar_step(
    model: MovementModel,
    axes: Vec2,
    motion: &mut PlayerMotion,
    config: &GameConfig,
    dt: f32,
) -> Vec2 {
    match model {
        MovementModel::Direct => axes * config.move_speed * dt,
        MovementModel::Damped => {
            let v = motion.planar_velocity;
            motion.planar_velocity = v - v * (config.damped_friction * dt).min(1.0)
                + axes * config.damped_acceleration * dt;
            motion.planar_velocity * dt
        }
    }
}

/// Vertical physics: jump, gravity, landing, terrain-following.
///
/// Without a height function the camera is pinned at eye height and jumping
/// does nothing.
pub fn vertical_step(
    translation: &mut Vec3,
    motion: &mut PlayerMotion,
    terrain: &Terrain,
    jump: bool,
    config: &GameConfig,
    dt: f32,
) {
    let Some(ground) = terrain.height_at(translation.x, translation.z) else {
        translation.y = config.eye_height;
        motion.vertical_velocity = 0.0;
        motion.grounded = true;
        return;
    };
    let floor = ground + config.eye_height;

    if jump && motion.grounded {
        motion.vertical_velocity = config.jump_velocity;
        motion.grounded = false;
    }

    if motion.grounded {
        translation.y = floor;
        return;
    }

    motion.vertical_velocity -= config.gravity * dt;
    translation.y += motion.vertical_velocity * dt;
    if translation.y <= floor {
        translation.y = floor;
        motion.vertical_velocity = 0.0;
        motion.grounded = true;
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Apply mouse look and recoil to [`LookAngles`] and write the camera rotation.
pub fn player_look_system(
    mut q: Query<(&mut Transform, &mut LookAngles), With<Player>>,
    intent: Res<PlayerIntent>,
    pointer: Res<PointerCaptured>,
    mut recoil: ResMut<Recoil>,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
) {
    let Ok((mut transform, mut look)) = q.single_mut() else {
        return;
    };

    if pointer.0 {
        look.yaw -= intent.look_delta.x * config.mouse_sensitivity;
        look.pitch -= intent.look_delta.y * config.mouse_sensitivity;
    }

    if let Some(delta) = recoil.settle(
        clock.delta_secs,
        config.recoil_camera_gain,
        config.recoil_decay,
        config.recoil_epsilon,
    ) {
        look.yaw += delta.x;
        look.pitch += delta.y;
    }

    look.pitch = look.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    transform.rotation = look.rotation();
}

/// Move the player for one frame.
pub fn player_movement_system(
    mut q: Query<(&mut Transform, &mut PlayerMotion), With<Player>>,
    intent: Res<PlayerIntent>,
    pointer: Res<PointerCaptured>,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
    terrain: Res<Terrain>,
) {
    let Ok((mut transform, mut motion)) = q.single_mut() else {
        return;
    };
    let dt = clock.delta_secs;
    let live = if pointer.0 {
        *intent
    } else {
        PlayerIntent::default()
    };

    let (forward, right) = movement_basis(*transform.forward());
    let local = planar_step(
        config.movement_model,
        input_axes(&live),
        &mut motion,
        &config,
        dt,
    );
    transform.translation += forward * local.y + right * local.x;

    vertical_step(
        &mut transform.translation,
        &mut motion,
        &terrain,
        live.jump,
        &config,
        dt,
    );
}

// ── Unit tests ────────────────────────────────────────────────────────────────
