//! Firing, reloading, weapon switching and bullet flight.
//!
//! ## Systems
//!
//! | System                      | Set                  | Purpose                                        |
//! |-----------------------------|----------------------|------------------------------------------------|
//! | `weapon_select_system`      | `FrameSet::Weapons`  | Number keys swap the current weapon            |
//! | `reload_request_system`     | `FrameSet::Weapons`  | Start a reload and schedule its completion     |
//! | `weapon_deferred_system`    | `FrameSet::Weapons`  | Finish reloads, switch the muzzle flash off    |
//! | `weapon_fire_system`        | `FrameSet::Weapons`  | Gate the shot, spawn pellets, kick recoil      |
//! | `bullet_flight_system`      | `FrameSet::Bullets`  | Advance bullets and expire spent ones          |
//!
//! Hit resolution against enemies lives in [`crate::collision`] and runs right
//! after `bullet_flight_system`.

use super::state::{Bullet, Player, PlayerIntent, PointerCaptured, Recoil};
use crate::config::GameConfig;
use crate::constants::BULLET_EXPIRY_EPSILON;
use crate::schedule::{DeferredAction, DeferredFired, ScheduledTasks};
use crate::session::{SessionClock, SessionGeneration, SpawnCounter};
use crate::weapon::{spread_direction, FireFeedback, WeaponState};
use bevy::prelude::*;

// ── Weapon state ──────────────────────────────────────────────────────────────

pub fn weapon_select_system(
    intent: Res<PlayerIntent>,
    pointer: Res<PointerCaptured>,
    mut weapon: ResMut<WeaponState>,
) {
    if !pointer.0 {
        return;
    }
    if let Some(kind) = intent.select_weapon {
        if kind != weapon.current {
            weapon.switch_to(kind);
            info!("Switched to {:?}", kind);
        }
    }
}

/// The reload key only does something when the magazine is not full.
pub fn reload_request_system(
    intent: Res<PlayerIntent>,
    pointer: Res<PointerCaptured>,
    clock: Res<SessionClock>,
    generation: Res<SessionGeneration>,
    mut weapon: ResMut<WeaponState>,
    mut tasks: ResMut<ScheduledTasks>,
) {
    if !pointer.0 || !intent.reload || !weapon.needs_reload() {
        return;
    }
    if let Some(duration) = weapon.begin_reload() {
        tasks.schedule(
            clock.elapsed_secs,
            duration,
            generation.0,
            DeferredAction::FinishReload,
        );
        debug!("Reloading {:?} ({duration:.1}s)", weapon.current);
    }
}

/// Apply the weapon-owned deferred actions that came due this frame.
pub fn weapon_deferred_system(
    mut fired: MessageReader<DeferredFired>,
    mut weapon: ResMut<WeaponState>,
    mut feedback: ResMut<FireFeedback>,
) {
    for DeferredFired(action) in fired.read() {
        match action {
            DeferredAction::FinishReload => {
                weapon.finish_reload();
                debug!("Reload finished: {} rounds", weapon.ammo);
            }
            DeferredAction::ClearMuzzleFlash => feedback.muzzle_lit = false,
            DeferredAction::SpawnEnemy { .. } | DeferredAction::StartWave => {}
        }
    }
}

// ── Firing ────────────────────────────────────────────────────────────────────

/// Fire the current weapon on the primary action.
///
/// A refused shot (empty, reloading, too soon) changes nothing.  An accepted
/// shot spends one round and spawns one bullet, or five for the shotgun, from
/// the camera position along the spread-perturbed aim.
#[allow(clippy::too_many_arguments)]
pub fn weapon_fire_system(
    mut commands: Commands,
    q_player: Query<&Transform, With<Player>>,
    intent: Res<PlayerIntent>,
    pointer: Res<PointerCaptured>,
    clock: Res<SessionClock>,
    generation: Res<SessionGeneration>,
    config: Res<GameConfig>,
    mut weapon: ResMut<WeaponState>,
    mut feedback: ResMut<FireFeedback>,
    mut recoil: ResMut<Recoil>,
    mut tasks: ResMut<ScheduledTasks>,
    mut counter: ResMut<SpawnCounter>,
) {
    if !pointer.0 || !intent.fire {
        return;
    }
    let Ok(transform) = q_player.single() else {
        return;
    };
    let Some(pellets) = weapon.try_fire(clock.elapsed_secs) else {
        return;
    };

    let stats = weapon.stats();
    let mut rng = rand::thread_rng();
    let aim = *transform.forward();

    for _ in 0..pellets {
        let direction = spread_direction(aim, stats.spread, &mut rng);
        commands.spawn((
            Bullet {
                velocity: direction * config.muzzle_velocity,
                lifetime: config.bullet_lifetime,
            },
            counter.next(),
            Transform::from_translation(transform.translation),
        ));
    }

    recoil.kick(stats.recoil, &mut rng);
    feedback.muzzle_lit = true;
    tasks.schedule(
        clock.elapsed_secs,
        config.muzzle_flash_secs,
        generation.0,
        DeferredAction::ClearMuzzleFlash,
    );
}

// ── Bullet flight ─────────────────────────────────────────────────────────────

/// Move every bullet by `velocity·dt` and despawn the ones whose lifetime ran out.
pub fn bullet_flight_system(
    mut commands: Commands,
    mut q_bullets: Query<(Entity, &mut Transform, &mut Bullet)>,
    clock: Res<SessionClock>,
) {
    let dt = clock.delta_secs;
    for (entity, mut transform, mut bullet) in q_bullets.iter_mut() {
        transform.translation += bullet.velocity * dt;
        bullet.lifetime -= dt;
        if bullet.lifetime <= BULLET_EXPIRY_EPSILON {
            commands.entity(entity).despawn();
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::WeaponKind;

    // ── helpers ───────────────────────────────────────────────────────────────

    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<DeferredFired>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(PlayerIntent::default());
        app.insert_resource(PointerCaptured(true));
        app.insert_resource(SessionClock {
            elapsed_secs: 10.0,
            delta_secs: 0.1,
        });
        app.init_resource::<SessionGeneration>();
        app.init_resource::<WeaponState>();
        app.init_resource::<FireFeedback>();
        app.init_resource::<Recoil>();
        app.init_resource::<ScheduledTasks>();
        app.init_resource::<SpawnCounter>();
        app.add_systems(
            Update,
            (
                weapon_select_system,
                reload_request_system,
                weapon_deferred_system,
                weapon_fire_system,
            )
                .chain(),
        );
        app.world_mut()
            .spawn((Player, Transform::from_xyz(0.0, 1.6, 0.0)));
        app
    }

    fn bullet_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&Bullet>()
            .iter(app.world())
            .count()
    }

    // ── tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn rifle_shot_spawns_one_bullet_and_feedback() {
        let mut app = build_test_app();
        app.insert_resource(PlayerIntent {
            fire: true,
            ..Default::default()
        });
        app.update();

        assert_eq!(bullet_count(&mut app), 1);
        assert_eq!(app.world().resource::<WeaponState>().ammo, 29);
        assert!(app.world().resource::<FireFeedback>().muzzle_lit);
        assert!((app.world().resource::<Recoil>().0.y + 0.025).abs() < 1e-6);
        let pending = app
            .world()
            .resource::<ScheduledTasks>()
            .count_pending(0, |a| *a == DeferredAction::ClearMuzzleFlash);
        assert_eq!(pending, 1);
    }

    #[test]
    fn bullet_leaves_along_aim_at_muzzle_velocity() {
        let mut app = build_test_app();
        app.insert_resource(PlayerIntent {
            fire: true,
            ..Default::default()
        });
        app.update();

        let bullet = *app
            .world_mut()
            .query::<&Bullet>()
            .single(app.world())
            .unwrap();
        assert!((bullet.velocity.length() - 100.0).abs() < 1e-3);
        assert!(bullet.velocity.normalize().dot(Vec3::NEG_Z) > 0.99);
        assert_eq!(bullet.lifetime, 3.0);
    }

    #[test]
    fn shotgun_spends_one_round_for_five_pellets() {
        let mut app = build_test_app();
        app.insert_resource(WeaponState {
            current: WeaponKind::Shotgun,
            ammo: 8,
            ..Default::default()
        });
        app.insert_resource(PlayerIntent {
            fire: true,
            ..Default::default()
        });
        app.update();

        assert_eq!(bullet_count(&mut app), 5);
        assert_eq!(app.world().resource::<WeaponState>().ammo, 7);
    }

    #[test]
    fn empty_magazine_fires_nothing() {
        let mut app = build_test_app();
        app.insert_resource(WeaponState {
            ammo: 0,
            ..Default::default()
        });
        app.insert_resource(PlayerIntent {
            fire: true,
            ..Default::default()
        });
        app.update();

        assert_eq!(bullet_count(&mut app), 0);
        assert_eq!(app.world().resource::<WeaponState>().ammo, 0);
        assert!(!app.world().resource::<FireFeedback>().muzzle_lit);
    }

    #[test]
    fn reload_key_ignored_with_full_magazine() {
        let mut app = build_test_app();
        app.insert_resource(PlayerIntent {
            reload: true,
            ..Default::default()
        });
        app.update();

        assert!(!app.world().resource::<WeaponState>().reloading);
        assert!(app.world().resource::<ScheduledTasks>().is_empty());
    }

    #[test]
    fn reload_completes_when_its_task_fires() {
        let mut app = build_test_app();
        app.insert_resource(WeaponState {
            ammo: 3,
            ..Default::default()
        });
        app.insert_resource(PlayerIntent {
            reload: true,
            ..Default::default()
        });
        app.update();
        assert!(app.world().resource::<WeaponState>().reloading);

        // Not due before the rifle's 2 s reload.
        let early = app
            .world_mut()
            .resource_mut::<ScheduledTasks>()
            .take_due(11.9, 0);
        assert!(early.actions.is_empty());
        let due = app
            .world_mut()
            .resource_mut::<ScheduledTasks>()
            .take_due(12.0, 0);
        assert_eq!(due.actions, vec![DeferredAction::FinishReload]);

        app.insert_resource(PlayerIntent::default());
        app.world_mut()
            .write_message(DeferredFired(DeferredAction::FinishReload));
        app.update();

        let weapon = app.world().resource::<WeaponState>();
        assert_eq!(weapon.ammo, 30);
        assert!(!weapon.reloading);
    }

    #[test]
    fn weapon_select_swaps_stats_but_not_ammo() {
        let mut app = build_test_app();
        app.insert_resource(PlayerIntent {
            select_weapon: Some(WeaponKind::Pistol),
            ..Default::default()
        });
        app.update();

        let weapon = app.world().resource::<WeaponState>();
        assert_eq!(weapon.current, WeaponKind::Pistol);
        assert_eq!(weapon.ammo, 30);
    }

    #[test]
    fn nothing_happens_without_pointer_capture() {
        let mut app = build_test_app();
        app.insert_resource(PointerCaptured(false));
        app.insert_resource(PlayerIntent {
            fire: true,
            select_weapon: Some(WeaponKind::Shotgun),
            ..Default::default()
        });
        app.update();

        assert_eq!(bullet_count(&mut app), 0);
        assert_eq!(
            app.world().resource::<WeaponState>().current,
            WeaponKind::Rifle
        );
    }

    #[test]
    fn bullets_expire_within_lifetime_over_dt_frames() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SessionClock {
            elapsed_secs: 0.0,
            delta_secs: 0.1,
        });
        app.add_systems(Update, bullet_flight_system);
        let bullet = app
            .world_mut()
            .spawn((
                Bullet {
                    velocity: Vec3::new(0.0, 0.0, -100.0),
                    lifetime: 0.25,
                },
                Transform::default(),
            ))
            .id();

        app.update();
        let pos = app.world().get::<Transform>(bullet).unwrap().translation;
        assert!((pos.z + 10.0).abs() < 1e-4);

        app.update();
        assert!(app.world().get_entity(bullet).is_ok());
        app.update();
        assert!(app.world().get_entity(bullet).is_err());
    }

    #[test]
    fn default_lifetime_bullet_is_gone_after_exactly_lifetime_over_dt_frames() {
        for (dt, frames) in [(0.1_f32, 30), (1.0 / 60.0, 180), (0.05, 60), (0.02, 150)] {
            let mut app = App::new();
            app.add_plugins(MinimalPlugins);
            app.insert_resource(SessionClock {
                elapsed_secs: 0.0,
                delta_secs: dt,
            });
            app.add_systems(Update, bullet_flight_system);
            let bullet = app
                .world_mut()
                .spawn((
                    Bullet {
                        velocity: Vec3::ZERO,
                        lifetime: crate::constants::BULLET_LIFETIME,
                    },
                    Transform::default(),
                ))
                .id();

            for _ in 0..frames - 1 {
                app.update();
            }
            assert!(app.world().get_entity(bullet).is_ok(), "dt {dt}");
            app.update();
            assert!(app.world().get_entity(bullet).is_err(), "dt {dt}");
        }
    }
}
