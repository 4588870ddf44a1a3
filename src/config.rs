//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the constants in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! movement_model = "damped"
//! terrain = "rolling"
//! bullet_hit_radius = 1.0
//! ```
//!
//! A file that fails to parse or validate is reported through the log and the
//! compiled defaults stay in place.

use crate::constants::*;
use crate::error::{validate_config, GameError, GameResult};
use crate::player::MovementModel;
use crate::terrain::TerrainKind;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable gameplay configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Player: Body ──────────────────────────────────────────────────────────
    pub player_max_health: f32,
    pub eye_height: f32,

    // ── Player: Movement ──────────────────────────────────────────────────────
    pub movement_model: MovementModel,
    pub move_speed: f32,
    pub damped_friction: f32,
    pub damped_acceleration: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub mouse_sensitivity: f32,

    // ── Terrain ───────────────────────────────────────────────────────────────
    pub terrain: TerrainKind,
    pub terrain_amplitude: f32,
    pub terrain_frequency: f32,

    // ── Weapons / Bullets ─────────────────────────────────────────────────────
    pub muzzle_velocity: f32,
    pub bullet_lifetime: f32,
    pub bullet_hit_radius: f32,
    pub muzzle_flash_secs: f32,

    // ── Recoil ────────────────────────────────────────────────────────────────
    pub recoil_decay: f32,
    pub recoil_epsilon: f32,
    pub recoil_camera_gain: f32,
    pub attack_shake: f32,

    // ── Enemies ───────────────────────────────────────────────────────────────
    pub enemy_melee_radius: f32,
    pub enemy_attack_interval: f32,
    pub enemy_attack_anim_decay: f32,
    pub enemy_attack_anim_scale: f32,
    pub enemy_jitter: f32,

    // ── Waves ─────────────────────────────────────────────────────────────────
    pub spawn_radius_min: f32,
    pub spawn_radius_max: f32,
    pub spawn_stagger_secs: f32,
    pub wave_check_interval_secs: f32,
    pub wave_transition_delay_secs: f32,
    pub wave_size_base: u32,
    pub wave_size_per_wave: u32,
    pub wave_size_cap: u32,

    // ── Health Regeneration ───────────────────────────────────────────────────
    pub regen_delay_secs: f32,
    pub regen_per_sec: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Player: Body
            player_max_health: PLAYER_MAX_HEALTH,
            eye_height: EYE_HEIGHT,
            // Player: Movement
            movement_model: MovementModel::Direct,
            move_speed: MOVE_SPEED,
            damped_friction: DAMPED_FRICTION,
            damped_acceleration: DAMPED_ACCELERATION,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            // Terrain
            terrain: TerrainKind::Flat,
            terrain_amplitude: TERRAIN_AMPLITUDE,
            terrain_frequency: TERRAIN_FREQUENCY,
            // Weapons / Bullets
            muzzle_velocity: MUZZLE_VELOCITY,
            bullet_lifetime: BULLET_LIFETIME,
            bullet_hit_radius: BULLET_HIT_RADIUS,
            muzzle_flash_secs: MUZZLE_FLASH_SECS,
            // Recoil
            recoil_decay: RECOIL_DECAY,
            recoil_epsilon: RECOIL_EPSILON,
            recoil_camera_gain: RECOIL_CAMERA_GAIN,
            attack_shake: ATTACK_SHAKE,
            // Enemies
            enemy_melee_radius: ENEMY_MELEE_RADIUS,
            enemy_attack_interval: ENEMY_ATTACK_INTERVAL,
            enemy_attack_anim_decay: ENEMY_ATTACK_ANIM_DECAY,
            enemy_attack_anim_scale: ENEMY_ATTACK_ANIM_SCALE,
            enemy_jitter: ENEMY_JITTER,
            // Waves
            spawn_radius_min: SPAWN_RADIUS_MIN,
            spawn_radius_max: SPAWN_RADIUS_MAX,
            spawn_stagger_secs: SPAWN_STAGGER_SECS,
            wave_check_interval_secs: WAVE_CHECK_INTERVAL_SECS,
            wave_transition_delay_secs: WAVE_TRANSITION_DELAY_SECS,
            wave_size_base: WAVE_SIZE_BASE,
            wave_size_per_wave: WAVE_SIZE_PER_WAVE,
            wave_size_cap: WAVE_SIZE_CAP,
            // Health Regeneration
            regen_delay_secs: REGEN_DELAY_SECS,
            regen_per_sec: REGEN_PER_SEC,
        }
    }
}

/// Parse and validate a config document.
pub fn parse_game_config(contents: &str, path: &str) -> GameResult<GameConfig> {
    let config = toml::from_str::<GameConfig>(contents).map_err(|e| GameError::ConfigParse {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Read `path` and parse it.  A missing file is not an error: `Ok(None)`.
pub fn read_game_config(path: &Path) -> GameResult<Option<GameConfig>> {
    let display = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_game_config(&contents, &display).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(GameError::ConfigRead {
            path: display,
            reason: e.to_string(),
        }),
    }
}

/// Startup system: overwrite the `GameConfig` resource with `assets/game.toml`.
///
/// Must run before any startup system that reads the config.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    match read_game_config(Path::new(CONFIG_PATH)) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("Loaded game config from {CONFIG_PATH}");
        }
        Ok(None) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
        Err(err) => {
            warn!("{err}; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config = parse_game_config("bullet_hit_radius = 1.0\n", "inline").unwrap();
        assert_eq!(config.bullet_hit_radius, 1.0);
        assert_eq!(config.muzzle_velocity, MUZZLE_VELOCITY);
        assert_eq!(config.wave_size_cap, WAVE_SIZE_CAP);
    }

    #[test]
    fn enum_fields_use_snake_case_names() {
        let config = parse_game_config(
            "movement_model = \"damped\"\nterrain = \"rolling\"\n",
            "inline",
        )
        .unwrap();
        assert_eq!(config.movement_model, MovementModel::Damped);
        assert_eq!(config.terrain, TerrainKind::Rolling);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = parse_game_config("move_speed = \"fast\"", "inline").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse { .. }));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = parse_game_config("bullet_lifetime = 0.0", "inline").unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidConfig {
                name: "bullet_lifetime",
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let result = read_game_config(Path::new("definitely/not/here/game.toml"));
        assert!(matches!(result, Ok(None)));
    }
}
