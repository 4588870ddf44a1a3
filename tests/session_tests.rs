//! Headless integration tests for the full session pipeline.
//!
//! These tests use [`MinimalPlugins`] plus the complete [`GamePlugin`], with a
//! fixed 100 ms frame via `TimeUpdateStrategy::ManualDuration`, so every run is
//! deterministic apart from spawn positions and enemy kinds.
//!
//! Covered scenarios:
//! 1. The session starts in `Briefing` and simulates nothing until `Start`.
//! 2. `Start` enters `Playing` and delivers the five enemies of wave 1.
//! 3. `Restart` after game over restores a fresh session.
//! 4. Spawn tasks from before a restart never leak into the new session.
//! 5. A lethal hit freezes the world (no firing, no movement) and publishes
//!    the summary.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use onslaught::enemy::{Enemy, EnemyAttack, EnemyHealth, EnemyKind};
use onslaught::hud::{AmmoReadout, HudSnapshot};
use onslaught::player::{
    Bullet, Player, PlayerHealth, PlayerIntent, PlayerScore, PointerCaptured,
};
use onslaught::session::{GameState, SessionClock, SessionCommand, SpawnOrder};
use onslaught::simulation::GamePlugin;
use onslaught::wave::{WavePhase, WaveState};
use onslaught::weapon::WeaponState;
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn game_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        100,
    )));
    app.add_plugins(GamePlugin);
    app.update(); // Startup: terrain + player
    app
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn send(app: &mut App, command: SessionCommand) {
    app.world_mut().write_message(command);
}

fn state(app: &App) -> GameState {
    app.world().resource::<State<GameState>>().get().clone()
}

fn count<T: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<T>>()
        .iter(app.world())
        .count()
}

fn set_player_hp(app: &mut App, hp: f32) {
    let mut q = app
        .world_mut()
        .query_filtered::<&mut PlayerHealth, With<Player>>();
    for mut health in q.iter_mut(app.world_mut()) {
        health.hp = hp;
    }
}

fn player_translation(app: &mut App) -> Vec3 {
    let mut q = app
        .world_mut()
        .query_filtered::<&Transform, With<Player>>();
    q.single(app.world()).unwrap().translation
}

fn spawn_enemy_next_to_player(app: &mut App) {
    app.world_mut().spawn((
        Enemy,
        EnemyKind::Basic,
        EnemyHealth::full(EnemyKind::Basic),
        EnemyAttack::default(),
        SpawnOrder(10_000),
        Transform::from_xyz(0.0, 1.0, -1.0),
    ));
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn briefing_simulates_nothing() {
    let mut app = game_app();
    run_frames(&mut app, 10);

    assert_eq!(state(&app), GameState::Briefing);
    assert_eq!(app.world().resource::<SessionClock>().elapsed_secs, 0.0);
    assert_eq!(count::<Enemy>(&mut app), 0);
    assert_eq!(count::<Player>(&mut app), 1);
}

#[test]
fn start_delivers_first_wave() {
    let mut app = game_app();
    send(&mut app, SessionCommand::Start);
    app.update();
    assert_eq!(
        app.world().resource::<WaveState>().phase,
        WavePhase::Spawning
    );

    run_frames(&mut app, 30);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(count::<Enemy>(&mut app), 5);

    let wave = app.world().resource::<WaveState>();
    assert_eq!(wave.wave, 1);
    assert_eq!(wave.phase, WavePhase::Active);
}

#[test]
fn restart_after_game_over_yields_fresh_session() {
    let mut app = game_app();
    send(&mut app, SessionCommand::Start);
    run_frames(&mut app, 30);

    app.insert_resource(WeaponState {
        ammo: 3,
        ..Default::default()
    });
    app.insert_resource(PlayerScore { points: 50 });
    app.world_mut().spawn((
        Bullet {
            velocity: Vec3::new(0.0, 100.0, 0.0),
            lifetime: 3.0,
        },
        SpawnOrder(20_000),
        Transform::default(),
    ));
    set_player_hp(&mut app, 5.0);
    spawn_enemy_next_to_player(&mut app);
    run_frames(&mut app, 2);
    assert_eq!(state(&app), GameState::GameOver);

    send(&mut app, SessionCommand::Restart);
    app.update();

    assert_eq!(app.world().resource::<WeaponState>().ammo, 30);
    assert_eq!(app.world().resource::<PlayerScore>().points, 0);
    assert_eq!(count::<Enemy>(&mut app), 0);
    assert_eq!(count::<Bullet>(&mut app), 0);
    let wave = app.world().resource::<WaveState>().clone();
    assert_eq!(wave.wave, 1);
    assert_eq!(wave.kills, 0);
    assert_eq!(wave.pending_spawns, 5);

    let mut q = app
        .world_mut()
        .query_filtered::<(&PlayerHealth, &Transform), With<Player>>();
    let (health, transform) = q.single(app.world()).unwrap();
    assert_eq!(health.hp, 100.0);
    assert_eq!(transform.translation, Vec3::new(0.0, 1.6, 0.0));

    run_frames(&mut app, 30);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(count::<Enemy>(&mut app), 5);
}

#[test]
fn spawns_scheduled_before_restart_are_discarded() {
    let mut app = game_app();
    send(&mut app, SessionCommand::Start);
    // Only the first couple of the five staggered spawns have come due.
    run_frames(&mut app, 3);

    send(&mut app, SessionCommand::Restart);
    run_frames(&mut app, 40);

    assert_eq!(count::<Enemy>(&mut app), 5);
}

#[test]
fn lethal_hit_freezes_world_and_reports_summary() {
    let mut app = game_app();
    send(&mut app, SessionCommand::Start);
    run_frames(&mut app, 5);

    set_player_hp(&mut app, 5.0);
    spawn_enemy_next_to_player(&mut app);
    run_frames(&mut app, 2);
    assert_eq!(state(&app), GameState::GameOver);

    let frozen_at = app.world().resource::<SessionClock>().elapsed_secs;
    let ammo_before = app.world().resource::<WeaponState>().ammo;
    let pose_before = player_translation(&mut app);

    // Even with live input the dead session neither fires nor moves.
    app.insert_resource(PointerCaptured(true));
    app.insert_resource(PlayerIntent {
        fire: true,
        forward: true,
        ..Default::default()
    });
    run_frames(&mut app, 5);

    assert_eq!(
        app.world().resource::<SessionClock>().elapsed_secs,
        frozen_at
    );
    assert_eq!(count::<Bullet>(&mut app), 0);
    assert_eq!(app.world().resource::<WeaponState>().ammo, ammo_before);
    assert_eq!(player_translation(&mut app), pose_before);

    let hud = app.world().resource::<HudSnapshot>();
    assert_eq!(hud.state, GameState::GameOver);
    assert_eq!(hud.health, 0.0);
    assert_eq!(
        hud.ammo,
        AmmoReadout::Rounds {
            current: 30,
            capacity: 30
        }
    );
    let summary = hud.game_over.expect("summary published");
    assert_eq!(summary.wave, 1);
    assert_eq!(summary.score, 0);
    assert_eq!(summary.kills, 0);
}
