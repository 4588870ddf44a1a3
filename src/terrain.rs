//! Ground height lookup used for terrain-following.
//!
//! The simulation never builds terrain geometry; it only needs to know the
//! ground height under a horizontal position.  [`Terrain::height_at`] returns
//! `None` on the flat floor, which tells the player controller to pin the
//! camera at eye height instead of running vertical physics.

use crate::config::GameConfig;
use bevy::prelude::*;
use serde::Deserialize;

/// Which ground model a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Infinite plane at `y = 0`; no height function.
    #[default]
    Flat,
    /// Smooth sine/cosine hills.
    Rolling,
}

/// Ground height function shared by the player controller and enemy placement.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub enum Terrain {
    #[default]
    Flat,
    Rolling { amplitude: f32, frequency: f32 },
}

impl Terrain {
    pub fn from_config(config: &GameConfig) -> Self {
        match config.terrain {
            TerrainKind::Flat => Terrain::Flat,
            TerrainKind::Rolling => Terrain::Rolling {
                amplitude: config.terrain_amplitude,
                frequency: config.terrain_frequency,
            },
        }
    }

    /// Ground height at `(x, z)`, or `None` when there is no height function.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        match *self {
            Terrain::Flat => None,
            Terrain::Rolling {
                amplitude,
                frequency,
            } => Some(0.5 * amplitude * ((x * frequency).sin() + (z * frequency).cos())),
        }
    }

    /// Ground height with the flat floor treated as `y = 0`.
    #[inline]
    pub fn ground_at(&self, x: f32, z: f32) -> f32 {
        self.height_at(x, z).unwrap_or(0.0)
    }
}

/// Startup system: derive the [`Terrain`] resource from the loaded config.
pub fn setup_terrain(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(Terrain::from_config(&config));
}
