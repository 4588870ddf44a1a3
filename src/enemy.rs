//! Enemy kinds, components, spawning and pursuit movement.
//!
//! ## Stat table
//!
//! | Kind  | Health | Speed | Contact damage | Score | Size (w, h, d) |
//! |-------|--------|-------|----------------|-------|----------------|
//! | Basic | 50     | 2.0   | 10             | 10    | 1.0, 2.0, 1.0  |
//! | Fast  | 25     | 4.0   | 5              | 15    | 0.8, 1.5, 0.8  |
//! | Heavy | 100    | 1.0   | 20             | 25    | 1.5, 2.5, 1.5  |
//! | Boss  | 200    | 1.5   | 30             | 100   | 2.0, 3.0, 2.0  |
//!
//! Enemies are spawned by [`crate::wave`]; their health is only ever reduced by
//! [`crate::collision`].  Melee contact damage against the player is also
//! resolved there, right after [`enemy_pursuit_system`] has moved everyone.

use crate::config::GameConfig;
use crate::player::Player;
use crate::session::{SessionClock, SpawnOrder};
use crate::simulation::FrameSet;
use crate::terrain::Terrain;
use bevy::prelude::*;
use rand::Rng;

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Fast,
    Heavy,
    Boss,
}

/// Immutable per-kind enemy parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    /// Ground speed (u/s).
    pub speed: f32,
    /// Damage dealt to the player per melee attack.
    pub contact_damage: f32,
    /// Points awarded for the kill.
    pub score: u32,
    /// Hit-box extents (width, height, depth).
    pub size: Vec3,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Heavy,
        EnemyKind::Boss,
    ];

    pub const fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                health: 50.0,
                speed: 2.0,
                contact_damage: 10.0,
                score: 10,
                size: Vec3::new(1.0, 2.0, 1.0),
            },
            EnemyKind::Fast => EnemyStats {
                health: 25.0,
                speed: 4.0,
                contact_damage: 5.0,
                score: 15,
                size: Vec3::new(0.8, 1.5, 0.8),
            },
            EnemyKind::Heavy => EnemyStats {
                health: 100.0,
                speed: 1.0,
                contact_damage: 20.0,
                score: 25,
                size: Vec3::new(1.5, 2.5, 1.5),
            },
            EnemyKind::Boss => EnemyStats {
                health: 200.0,
                speed: 1.5,
                contact_damage: 30.0,
                score: 100,
                size: Vec3::new(2.0, 3.0, 2.0),
            },
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyHealth {
    pub hp: f32,
    pub max_hp: f32,
}

impl EnemyHealth {
    pub fn full(kind: EnemyKind) -> Self {
        let hp = kind.stats().health;
        Self { hp, max_hp: hp }
    }

    #[inline]
    pub fn fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        }
    }
}

/// Melee attack bookkeeping.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct EnemyAttack {
    /// Session-clock time of the last attack; `None` means the first attack is
    /// not gated.
    pub last_attack_secs: Option<f64>,
    /// Attack pulse phase: set to 1 on an attack, decays to 0.
    pub anim: f32,
}

impl EnemyAttack {
    pub fn ready(&self, now_secs: f64, interval_secs: f32) -> bool {
        match self.last_attack_secs {
            Some(last) => now_secs - last >= f64::from(interval_secs),
            None => true,
        }
    }
}

/// Height of an enemy's centre when standing at `(x, z)`.
pub fn standing_height(kind: EnemyKind, terrain: &Terrain, x: f32, z: f32) -> f32 {
    terrain.ground_at(x, z) + kind.stats().size.y * 0.5
}

/// Spawn a full-health enemy of `kind` standing on the ground at `xz`.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: EnemyKind,
    xz: Vec2,
    terrain: &Terrain,
    order: SpawnOrder,
) -> Entity {
    let y = standing_height(kind, terrain, xz.x, xz.y);
    commands
        .spawn((
            Enemy,
            kind,
            EnemyHealth::full(kind),
            EnemyAttack::default(),
            order,
            Transform::from_xyz(xz.x, y, xz.y),
            Visibility::default(),
        ))
        .id()
}

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, enemy_pursuit_system.in_set(FrameSet::Enemies));
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Walk every living enemy toward the player.
///
/// The heading is the normalised direction to the player plus a small random
/// jitter on x/z.  Only x/z move; the enemy stays on the ground and turns
/// horizontally to face the player.  The attack pulse decays and drives the
/// scale.
pub fn enemy_pursuit_system(
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_enemy: Query<(&mut Transform, &mut EnemyAttack, &EnemyHealth, &EnemyKind), With<Enemy>>,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
    terrain: Res<Terrain>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    let player_pos = player_transform.translation;
    let dt = clock.delta_secs;
    let mut rng = rand::thread_rng();

    for (mut transform, mut attack, health, kind) in q_enemy.iter_mut() {
        if health.hp <= 0.0 {
            continue;
        }
        let stats = kind.stats();

        let mut direction = (player_pos - transform.translation).normalize_or_zero();
        direction.x += (rng.gen::<f32>() - 0.5) * 2.0 * config.enemy_jitter;
        direction.z += (rng.gen::<f32>() - 0.5) * 2.0 * config.enemy_jitter;

        transform.translation.x += direction.x * stats.speed * dt;
        transform.translation.z += direction.z * stats.speed * dt;
        transform.translation.y =
            standing_height(*kind, &terrain, transform.translation.x, transform.translation.z);

        let target = Vec3::new(player_pos.x, transform.translation.y, player_pos.z);
        if (target - transform.translation).length_squared() > 1e-6 {
            transform.look_at(target, Vec3::Y);
        }

        attack.anim = (attack.anim - dt * config.enemy_attack_anim_decay).max(0.0);
        transform.scale = Vec3::splat(1.0 + attack.anim * config.enemy_attack_anim_scale);
    }
}
