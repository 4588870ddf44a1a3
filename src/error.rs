//! Error types for configuration loading and validation.
//!
//! Gameplay itself has no error taxonomy: firing on an empty magazine, reloading
//! twice or spawning after game over are silent no-ops reported through `bool`
//! returns on the state types.  Errors only exist where the outside world is
//! involved, i.e. reading and validating `assets/game.toml`.
//!
//! ## Usage
//!
//! ```rust
//! use onslaught::config::GameConfig;
//! use onslaught::error::validate_config;
//!
//! let config = GameConfig::default();
//! assert!(validate_config(&config).is_ok());
//! ```

use crate::config::GameConfig;
use std::fmt;

/// Top-level error enum for the game.
#[derive(Debug)]
pub enum GameError {
    /// The config file exists but could not be read.
    ConfigRead {
        path: String,
        reason: String,
    },

    /// The config file is not valid TOML for [`GameConfig`].
    ConfigParse {
        path: String,
        reason: String,
    },

    /// A tunable is outside the range the simulation can handle.
    InvalidConfig {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ConfigRead { path, reason } => {
                write!(f, "could not read '{}': {}", path, reason)
            }
            GameError::ConfigParse { path, reason } => {
                write!(f, "could not parse '{}': {}", path, reason)
            }
            GameError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

fn require_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value,
            expected: "(0.0, ∞)",
        })
    }
}

fn require_non_negative(name: &'static str, value: f32) -> GameResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value,
            expected: "[0.0, ∞)",
        })
    }
}

/// Check every tunable the simulation divides by, multiplies into positions or
/// uses as a range bound.
///
/// Returns the first offending field.
pub fn validate_config(config: &GameConfig) -> GameResult<()> {
    require_positive("player_max_health", config.player_max_health)?;
    require_non_negative("eye_height", config.eye_height)?;
    require_non_negative("move_speed", config.move_speed)?;
    require_non_negative("damped_friction", config.damped_friction)?;
    require_non_negative("damped_acceleration", config.damped_acceleration)?;
    require_non_negative("jump_velocity", config.jump_velocity)?;
    require_non_negative("gravity", config.gravity)?;
    require_positive("muzzle_velocity", config.muzzle_velocity)?;
    require_positive("bullet_lifetime", config.bullet_lifetime)?;
    require_positive("bullet_hit_radius", config.bullet_hit_radius)?;
    require_positive("enemy_melee_radius", config.enemy_melee_radius)?;
    require_non_negative("enemy_attack_interval", config.enemy_attack_interval)?;
    require_positive("spawn_radius_min", config.spawn_radius_min)?;
    require_non_negative("spawn_stagger_secs", config.spawn_stagger_secs)?;
    require_positive("wave_check_interval_secs", config.wave_check_interval_secs)?;
    require_non_negative("wave_transition_delay_secs", config.wave_transition_delay_secs)?;
    require_non_negative("regen_delay_secs", config.regen_delay_secs)?;
    require_non_negative("regen_per_sec", config.regen_per_sec)?;

    if !(0.0..1.0).contains(&config.recoil_decay) {
        return Err(GameError::InvalidConfig {
            name: "recoil_decay",
            value: config.recoil_decay,
            expected: "[0.0, 1.0)",
        });
    }
    if config.spawn_radius_max < config.spawn_radius_min {
        return Err(GameError::InvalidConfig {
            name: "spawn_radius_max",
            value: config.spawn_radius_max,
            expected: "≥ spawn_radius_min",
        });
    }
    if config.wave_size_cap == 0 {
        return Err(GameError::InvalidConfig {
            name: "wave_size_cap",
            value: 0.0,
            expected: "≥ 1",
        });
    }
    Ok(())
}
