//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig`] mirrors most of them and can override them
//! at runtime from `assets/game.toml`.
//!
//! Weapon and enemy stat tables are *not* here: they are immutable per kind and
//! live next to their kinds in [`crate::weapon`] and [`crate::enemy`].

// ── Player: Body ──────────────────────────────────────────────────────────────

/// Maximum (and starting) player health.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Camera height above the floor / terrain surface (world units).
///
/// On the flat floor the player's `y` is pinned to this value every frame.
pub const EYE_HEIGHT: f32 = 1.6;

// ── Player: Movement ──────────────────────────────────────────────────────────

/// Horizontal speed (u/s) used by the direct movement model.
pub const MOVE_SPEED: f32 = 10.0;

/// Per-second velocity decay factor used by the damped movement model.
///
/// `velocity -= velocity * DAMPED_FRICTION * dt` each frame.
pub const DAMPED_FRICTION: f32 = 10.0;

/// Acceleration (u/s²) added along the input direction by the damped model.
///
/// Terminal speed is `DAMPED_ACCELERATION / DAMPED_FRICTION` (40 u/s at defaults).
pub const DAMPED_ACCELERATION: f32 = 400.0;

/// Upward velocity (u/s) applied on jump when grounded.
pub const JUMP_VELOCITY: f32 = 8.0;

/// Downward acceleration (u/s²) while airborne.
pub const GRAVITY: f32 = 20.0;

/// Radians of yaw / pitch per pixel of mouse motion.
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Pitch is clamped to ±`PITCH_LIMIT` so the basis never degenerates.
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

// ── Terrain ───────────────────────────────────────────────────────────────────

/// Peak height of the rolling terrain relative to `y = 0`.
pub const TERRAIN_AMPLITUDE: f32 = 2.0;

/// Angular frequency (rad/u) of the rolling terrain undulation.
pub const TERRAIN_FREQUENCY: f32 = 0.05;

// ── Weapons / Bullets ─────────────────────────────────────────────────────────

/// Speed (u/s) of every fired bullet, independent of weapon.
pub const MUZZLE_VELOCITY: f32 = 100.0;

/// Seconds a bullet lives before it is removed.
pub const BULLET_LIFETIME: f32 = 3.0;

/// Remaining lifetime at or below which a bullet counts as expired.
///
/// Absorbs the rounding left over after subtracting `dt` from the lifetime
/// frame after frame, so a 3 s bullet at 0.1 s frames is gone on frame 30.
pub const BULLET_EXPIRY_EPSILON: f32 = 1e-4;

/// Bullet-to-enemy centre distance below which a hit is registered.
///
/// Later builds use 1.5; the earliest used 1.0.
pub const BULLET_HIT_RADIUS: f32 = 1.5;

/// Number of pellets per shotgun shot.  Every other weapon fires one bullet.
pub const SHOTGUN_PELLETS: u32 = 5;

/// Seconds the muzzle-flash feedback stays lit after a shot.
pub const MUZZLE_FLASH_SECS: f32 = 0.05;

// ── Recoil ────────────────────────────────────────────────────────────────────

/// Multiplicative recoil decay applied once per frame.
pub const RECOIL_DECAY: f32 = 0.9;

/// Recoil magnitudes below this are treated as settled.
pub const RECOIL_EPSILON: f32 = 0.001;

/// Gain converting accumulated recoil into camera rotation per second.
pub const RECOIL_CAMERA_GAIN: f32 = 10.0;

/// Half-width of the random camera shake added when an enemy lands a hit.
pub const ATTACK_SHAKE: f32 = 0.05;

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Distance at which an enemy can hit the player.
pub const ENEMY_MELEE_RADIUS: f32 = 3.0;

/// Minimum seconds between two attacks of the same enemy.
pub const ENEMY_ATTACK_INTERVAL: f32 = 1.0;

/// Rate (1/s) at which the attack-animation pulse decays from 1 to 0.
pub const ENEMY_ATTACK_ANIM_DECAY: f32 = 5.0;

/// Extra scale at the peak of the attack pulse (`scale = 1 + anim * this`).
pub const ENEMY_ATTACK_ANIM_SCALE: f32 = 0.2;

/// Half-width of the per-frame random jitter added to the pursuit direction.
pub const ENEMY_JITTER: f32 = 0.05;

// ── Waves ─────────────────────────────────────────────────────────────────────

/// Enemies spawn at least this far from the player.
pub const SPAWN_RADIUS_MIN: f32 = 30.0;

/// Enemies spawn at most this far from the player.
pub const SPAWN_RADIUS_MAX: f32 = 80.0;

/// Seconds between consecutive spawns inside one wave.
pub const SPAWN_STAGGER_SECS: f32 = 0.5;

/// Seconds between two wave-completion checks.
pub const WAVE_CHECK_INTERVAL_SECS: f32 = 1.0;

/// Seconds between detecting a cleared wave and spawning the next one.
pub const WAVE_TRANSITION_DELAY_SECS: f32 = 2.0;

/// Base enemy count of a wave (`base + per_wave * wave`).
pub const WAVE_SIZE_BASE: u32 = 3;

/// Additional enemies per wave number.
pub const WAVE_SIZE_PER_WAVE: u32 = 2;

/// Hard cap on the number of enemies in a single wave.
pub const WAVE_SIZE_CAP: u32 = 15;

// ── Health Regeneration ───────────────────────────────────────────────────────

/// Seconds without damage before health starts regenerating.
pub const REGEN_DELAY_SECS: f32 = 5.0;

/// Health regenerated per second once regeneration is active.
pub const REGEN_PER_SEC: f32 = 6.0;
