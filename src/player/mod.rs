//! Player module: the first-person player entity, movement, and the weapon.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | ECS components (`Player`, `PlayerHealth`, `PlayerMotion`, `LookAngles`, `Bullet`) and resources (`PlayerScore`, `PointerCaptured`, `Recoil`, `PlayerIntent`) |
//! | [`control`] | Mouse look, recoil settling, direct/damped movement, jump, gravity, terrain-following |
//! | [`combat`] | Weapon switch, reload, firing, bullet flight |
//!
//! All public items are re-exported at this level so the rest of the crate
//! can use flat `crate::player::*` imports.

pub mod combat;
pub mod control;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use combat::{
    bullet_flight_system, reload_request_system, weapon_deferred_system, weapon_fire_system,
    weapon_select_system,
};
pub use control::{player_look_system, player_movement_system, MovementModel};
pub use state::{
    Bullet, LookAngles, Player, PlayerHealth, PlayerIntent, PlayerMotion, PlayerScore,
    PointerCaptured, Recoil,
};

// ── Spawn ─────────────────────────────────────────────────────────────────────

use crate::config::GameConfig;
use crate::simulation::FrameSet;
use crate::terrain::{setup_terrain, Terrain};
use crate::weapon::{FireFeedback, WeaponState};
use bevy::prelude::*;

/// Where the player stands at the start of every session: the origin, with
/// the camera at eye height above the ground, looking down −Z.
pub fn spawn_pose(config: &GameConfig, terrain: &Terrain) -> Transform {
    Transform::from_xyz(0.0, terrain.ground_at(0.0, 0.0) + config.eye_height, 0.0)
}

/// Spawn the player entity.  Runs once at startup; restarts reset it in place.
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>, terrain: Res<Terrain>) {
    commands.spawn((
        Player,
        PlayerHealth::new(config.player_max_health),
        PlayerMotion::default(),
        LookAngles::default(),
        spawn_pose(&config, &terrain),
        Visibility::default(),
    ));
    info!("Player spawned");
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerScore>()
            .init_resource::<PlayerIntent>()
            .init_resource::<PointerCaptured>()
            .init_resource::<Recoil>()
            .init_resource::<WeaponState>()
            .init_resource::<FireFeedback>()
            .add_systems(Startup, spawn_player.after(setup_terrain))
            .add_systems(
                Update,
                (player_look_system, player_movement_system)
                    .chain()
                    .in_set(FrameSet::Player),
            )
            .add_systems(
                Update,
                (
                    weapon_select_system,
                    reload_request_system,
                    weapon_deferred_system,
                    weapon_fire_system,
                )
                    .chain()
                    .in_set(FrameSet::Weapons),
            )
            .add_systems(Update, bullet_flight_system.in_set(FrameSet::Bullets));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_pose_sits_at_eye_height_above_ground() {
        let config = GameConfig::default();
        assert_eq!(
            spawn_pose(&config, &Terrain::Flat).translation,
            Vec3::new(0.0, 1.6, 0.0)
        );

        let rolling = Terrain::Rolling {
            amplitude: 2.0,
            frequency: 0.05,
        };
        // 0.5 * 2 * (sin 0 + cos 0) = 1
        let y = spawn_pose(&config, &rolling).translation.y;
        assert!((y - 2.6).abs() < 1e-6);
    }
}
