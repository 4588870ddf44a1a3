//! Wave director: wave sizing, enemy-kind selection, staggered spawns and the
//! periodic "wave cleared" check.
//!
//! ## Phases
//!
//! ```text
//! Idle ──begin_wave──▶ Spawning ──last spawn delivered──▶ Active
//!  ▲                                                        │
//!  └──── StartWave (after transition delay) ◀── cleared ────┘
//! ```
//!
//! A wave of size `min(base + per_wave·wave, cap)` is delivered as one
//! deferred `SpawnEnemy` task per enemy, `spawn_stagger_secs` apart.  Every
//! `wave_check_interval_secs` the director checks for a cleared wave; only an
//! `Active` wave can be cleared, so the counter advances exactly once per wave
//! even though the check keeps running during the transition delay.
//!
//! ## Kind selection
//!
//! | Tier  | Requires   | Chance | Checked |
//! |-------|------------|--------|---------|
//! | Boss  | wave ≥ 10  | 10 %   | first   |
//! | Heavy | wave ≥ 5   | 30 %   | second  |
//! | Fast  | wave ≥ 3   | 40 %   | third   |
//! | Basic | —          | rest   | last    |
//!
//! Each tier rolls independently, so lower tiers stay reachable at any wave.

use crate::config::GameConfig;
use crate::enemy::{spawn_enemy, Enemy, EnemyHealth, EnemyKind};
use crate::player::Player;
use crate::schedule::{DeferredAction, DeferredFired, ScheduledTasks};
use crate::session::{SessionClock, SessionGeneration, SpawnCounter};
use crate::simulation::FrameSet;
use crate::terrain::Terrain;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavePhase {
    /// Between waves (or before the first one).
    #[default]
    Idle,
    /// Spawn tasks for the current wave are still outstanding.
    Spawning,
    /// Every enemy of the wave has been spawned.
    Active,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WaveState {
    /// 1-based wave number.
    pub wave: u32,
    /// Enemies killed this session.
    pub kills: u32,
    pub phase: WavePhase,
    /// Spawn tasks scheduled for the current wave that have not fired yet.
    pub pending_spawns: u32,
    /// Seconds since the last cleared-wave check.
    pub check_timer: f32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            wave: 1,
            kills: 0,
            phase: WavePhase::Idle,
            pending_spawns: 0,
            check_timer: 0.0,
        }
    }
}

pub struct WavePlugin;

impl Plugin for WavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveState>().add_systems(
            Update,
            (wave_task_system, wave_completion_system)
                .chain()
                .in_set(FrameSet::Waves),
        );
    }
}

// ── Pure helpers ──────────────────────────────────────────────────────────────

/// Number of enemies in wave `wave`.
pub fn wave_enemy_count(wave: u32, config: &GameConfig) -> u32 {
    config
        .wave_size_base
        .saturating_add(config.wave_size_per_wave.saturating_mul(wave))
        .min(config.wave_size_cap)
}

/// Pick an enemy kind for wave `wave`.  `roll` yields uniform values in
/// `[0, 1)` and is only called for tiers the wave has unlocked.
pub fn select_enemy_kind(wave: u32, mut roll: impl FnMut() -> f32) -> EnemyKind {
    if wave >= 10 && roll() < 0.1 {
        EnemyKind::Boss
    } else if wave >= 5 && roll() < 0.3 {
        EnemyKind::Heavy
    } else if wave >= 3 && roll() < 0.4 {
        EnemyKind::Fast
    } else {
        EnemyKind::Basic
    }
}

/// Random ground position at a random angle around `center`, inside the
/// configured spawn band.
pub fn spawn_offset(center: Vec2, config: &GameConfig, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen::<f32>() * TAU;
    let radius =
        config.spawn_radius_min + rng.gen::<f32>() * (config.spawn_radius_max - config.spawn_radius_min);
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Schedule the staggered spawns of the current wave and enter `Spawning`.
pub fn begin_wave(
    wave: &mut WaveState,
    tasks: &mut ScheduledTasks,
    now_secs: f64,
    generation: u64,
    config: &GameConfig,
) {
    let count = wave_enemy_count(wave.wave, config);
    for i in 0..count {
        tasks.schedule(
            now_secs,
            i as f32 * config.spawn_stagger_secs,
            generation,
            DeferredAction::SpawnEnemy { wave: wave.wave },
        );
    }
    wave.pending_spawns = count;
    wave.phase = if count == 0 {
        WavePhase::Active
    } else {
        WavePhase::Spawning
    };
    wave.check_timer = 0.0;
    info!("Wave {} incoming: {} enemies", wave.wave, count);
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Deliver the wave-owned deferred actions: staggered spawns and wave starts.
#[allow(clippy::too_many_arguments)]
pub fn wave_task_system(
    mut commands: Commands,
    mut fired: MessageReader<DeferredFired>,
    q_player: Query<&Transform, With<Player>>,
    clock: Res<SessionClock>,
    generation: Res<SessionGeneration>,
    config: Res<GameConfig>,
    terrain: Res<Terrain>,
    mut wave: ResMut<WaveState>,
    mut tasks: ResMut<ScheduledTasks>,
    mut counter: ResMut<SpawnCounter>,
) {
    let center = q_player
        .single()
        .map(|t| Vec2::new(t.translation.x, t.translation.z))
        .unwrap_or(Vec2::ZERO);
    let mut rng = rand::thread_rng();

    for DeferredFired(action) in fired.read() {
        match *action {
            DeferredAction::SpawnEnemy { wave: spawn_wave } => {
                if spawn_wave != wave.wave || wave.phase != WavePhase::Spawning {
                    continue;
                }
                let kind = select_enemy_kind(wave.wave, || rng.gen::<f32>());
                let xz = spawn_offset(center, &config, &mut rng);
                spawn_enemy(&mut commands, kind, xz, &terrain, counter.next());

                wave.pending_spawns = wave.pending_spawns.saturating_sub(1);
                if wave.pending_spawns == 0 {
                    wave.phase = WavePhase::Active;
                }
            }
            DeferredAction::StartWave => {
                if wave.phase == WavePhase::Idle {
                    begin_wave(
                        &mut wave,
                        &mut tasks,
                        clock.elapsed_secs,
                        generation.0,
                        &config,
                    );
                }
            }
            DeferredAction::FinishReload | DeferredAction::ClearMuzzleFlash => {}
        }
    }
}

/// Every check interval: if the active wave has no living enemy left, advance
/// the wave counter and schedule the next wave after the transition delay.
pub fn wave_completion_system(
    q_enemies: Query<&EnemyHealth, With<Enemy>>,
    clock: Res<SessionClock>,
    generation: Res<SessionGeneration>,
    config: Res<GameConfig>,
    mut wave: ResMut<WaveState>,
    mut tasks: ResMut<ScheduledTasks>,
) {
    wave.check_timer += clock.delta_secs;
    if wave.check_timer < config.wave_check_interval_secs {
        return;
    }
    wave.check_timer = 0.0;

    if wave.phase != WavePhase::Active || q_enemies.iter().any(|h| h.hp > 0.0) {
        return;
    }

    info!("Wave {} cleared", wave.wave);
    wave.wave += 1;
    wave.phase = WavePhase::Idle;
    tasks.schedule(
        clock.elapsed_secs,
        config.wave_transition_delay_secs,
        generation.0,
        DeferredAction::StartWave,
    );
}
