use bevy::prelude::*;
use bevy::window::WindowResolution;
use onslaught::config::{self, GameConfig};
use onslaught::input::PlayerInputPlugin;
use onslaught::simulation::GamePlugin;
use onslaught::terrain::setup_terrain;

mod rendering;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Onslaught".into(),
                resolution: WindowResolution::new(1280, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        // Compiled defaults; load_game_config overwrites them from
        // assets/game.toml (if present) before the terrain and player exist.
        .insert_resource(GameConfig::default())
        .add_plugins((GamePlugin, PlayerInputPlugin, rendering::RenderingPlugin))
        .add_systems(Startup, config::load_game_config.before(setup_terrain))
        .run();
}
