//! Damage resolution: bullets against enemies, enemies against the player,
//! and player health regeneration.
//!
//! ## Systems
//!
//! | System                         | Set                 | Purpose                                     |
//! |--------------------------------|---------------------|---------------------------------------------|
//! | `bullet_enemy_hit_system`      | `FrameSet::Bullets` | First-match bullet hits, kills, score       |
//! | `enemy_contact_damage_system`  | `FrameSet::Contact` | Melee attacks, camera shake, game over      |
//! | `health_regen_system`          | `FrameSet::Contact` | Slow regeneration after a quiet period      |
//!
//! ## Hit order
//!
//! Bullets are resolved newest first, and each bullet tests enemies newest
//! first (by [`SpawnOrder`]).  The first enemy within `bullet_hit_radius` takes
//! the current weapon's damage and the bullet is consumed; it is not the
//! closest enemy that wins.  A bullet damages at most one enemy per frame, and
//! an enemy killed by an earlier bullet in the same frame is no longer a
//! target, so its score and kill are credited exactly once.

use crate::config::GameConfig;
use crate::enemy::{Enemy, EnemyAttack, EnemyHealth, EnemyKind};
use crate::player::{bullet_flight_system, Bullet, Player, PlayerHealth, PlayerScore, Recoil};
use crate::session::{GameOverSummary, GameState, SessionClock, SessionOutcome, SpawnOrder};
use crate::simulation::FrameSet;
use crate::wave::WaveState;
use crate::weapon::WeaponState;
use bevy::prelude::*;

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            bullet_enemy_hit_system
                .after(bullet_flight_system)
                .in_set(FrameSet::Bullets),
        )
        .add_systems(
            Update,
            (enemy_contact_damage_system, health_regen_system)
                .chain()
                .in_set(FrameSet::Contact),
        );
    }
}

// ── Bullet → enemy ────────────────────────────────────────────────────────────

struct Target {
    entity: Entity,
    position: Vec3,
    hp: f32,
    kind: EnemyKind,
    order: SpawnOrder,
}

#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn bullet_enemy_hit_system(
    mut commands: Commands,
    q_bullets: Query<(Entity, &Transform, &Bullet, &SpawnOrder), Without<Enemy>>,
    mut q_enemies: Query<
        (Entity, &Transform, &mut EnemyHealth, &EnemyKind, &SpawnOrder),
        With<Enemy>,
    >,
    weapon: Res<WeaponState>,
    config: Res<GameConfig>,
    mut score: ResMut<PlayerScore>,
    mut wave: ResMut<WaveState>,
) {
    let mut bullets: Vec<(Entity, Vec3, SpawnOrder)> = q_bullets
        .iter()
        .filter(|(_, _, bullet, _)| bullet.lifetime > 0.0)
        .map(|(e, t, _, order)| (e, t.translation, *order))
        .collect();
    if bullets.is_empty() {
        return;
    }
    bullets.sort_by(|a, b| b.2.cmp(&a.2));

    let mut targets: Vec<Target> = q_enemies
        .iter()
        .map(|(entity, t, health, kind, order)| Target {
            entity,
            position: t.translation,
            hp: health.hp,
            kind: *kind,
            order: *order,
        })
        .collect();
    targets.sort_by(|a, b| b.order.cmp(&a.order));

    let damage = weapon.stats().damage;
    let radius = config.bullet_hit_radius;

    for (bullet, position, _) in bullets {
        let Some(target) = targets
            .iter_mut()
            .find(|t| t.hp > 0.0 && t.position.distance(position) < radius)
        else {
            continue;
        };

        target.hp -= damage;
        commands.entity(bullet).despawn();
        if let Ok((_, _, mut health, _, _)) = q_enemies.get_mut(target.entity) {
            health.hp = target.hp;
        }

        if target.hp <= 0.0 {
            commands.entity(target.entity).despawn();
            score.points += target.kind.stats().score;
            wave.kills += 1;
            debug!("{:?} killed (+{})", target.kind, target.kind.stats().score);
        }
    }
}

// ── Enemy → player ────────────────────────────────────────────────────────────

/// Enemies within melee radius attack once per attack interval.
///
/// An attack deals the enemy's contact damage, stamps the player's last-damage
/// time, restarts the enemy's attack pulse and shakes the camera.  When health
/// reaches zero the session outcome is recorded and `GameOver` is entered.
#[allow(clippy::too_many_arguments)]
pub fn enemy_contact_damage_system(
    mut q_player: Query<(&Transform, &mut PlayerHealth), With<Player>>,
    mut q_enemies: Query<(&Transform, &EnemyHealth, &EnemyKind, &mut EnemyAttack), With<Enemy>>,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
    score: Res<PlayerScore>,
    wave: Res<WaveState>,
    mut recoil: ResMut<Recoil>,
    mut outcome: ResMut<SessionOutcome>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Ok((player_transform, mut health)) = q_player.single_mut() else {
        return;
    };
    if health.is_dead() {
        return;
    }
    let now = clock.elapsed_secs;
    let mut rng = rand::thread_rng();

    for (transform, enemy_health, kind, mut attack) in q_enemies.iter_mut() {
        if enemy_health.hp <= 0.0 {
            continue;
        }
        if transform.translation.distance(player_transform.translation) >= config.enemy_melee_radius
            || !attack.ready(now, config.enemy_attack_interval)
        {
            continue;
        }

        health.hp -= kind.stats().contact_damage;
        health.last_damage_secs = Some(now);
        attack.last_attack_secs = Some(now);
        attack.anim = 1.0;
        recoil.shake(config.attack_shake, &mut rng);

        if health.is_dead() {
            outcome.0 = Some(GameOverSummary {
                wave: wave.wave,
                score: score.points,
                kills: wave.kills,
            });
            next_state.set(GameState::GameOver);
            break;
        }
    }
}

// ── Regeneration ──────────────────────────────────────────────────────────────

/// Once more than `regen_delay_secs` have passed since the last hit, health
/// climbs at `regen_per_sec` up to the maximum.
pub fn health_regen_system(
    mut q_player: Query<&mut PlayerHealth, With<Player>>,
    clock: Res<SessionClock>,
    config: Res<GameConfig>,
) {
    let Ok(mut health) = q_player.single_mut() else {
        return;
    };
    if health.is_dead() || health.hp >= health.max_hp {
        return;
    }
    let quiet = match health.last_damage_secs {
        Some(last) => clock.elapsed_secs - last > f64::from(config.regen_delay_secs),
        None => true,
    };
    if quiet {
        health.hp = (health.hp + config.regen_per_sec * clock.delta_secs).min(health.max_hp);
    }
}
