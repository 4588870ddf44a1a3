//! Wave-shooter simulation core.
//!
//! A first-person arena: the player moves, aims and fires one of three
//! weapons while escalating waves of enemies close in.  Everything here is
//! headless Bevy ECS and runs under `MinimalPlugins`; the `onslaught` binary
//! adds the window, input and rendering.

pub mod collision;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod error;
pub mod hud;
pub mod input;
pub mod player;
pub mod schedule;
pub mod session;
pub mod simulation;
pub mod terrain;
pub mod wave;
pub mod weapon;
