//! Frame ordering and the top-level game plugin.
//!
//! One simulated frame is a chain of system sets in `Update`:
//!
//! | Set        | Owner              | Work                                              |
//! |------------|--------------------|---------------------------------------------------|
//! | `Clock`    | `session`          | Advance the session clock by the frame delta      |
//! | `Deferred` | `schedule`         | Publish deferred actions that came due            |
//! | `Player`   | `player::control`  | Look, recoil, movement, gravity                   |
//! | `Weapons`  | `player::combat`   | Switch, reload, fire                              |
//! | `Bullets`  | `player`/`collision` | Bullet flight, then bullet → enemy hits         |
//! | `Enemies`  | `enemy`            | Pursuit, facing, attack pulse                     |
//! | `Contact`  | `collision`        | Enemy → player melee, regeneration, game over     |
//! | `Waves`    | `wave`             | Staggered spawns, wave-cleared check              |
//!
//! Every set runs only while `GameState::Playing` and while the session has no
//! game-over outcome.  The condition is evaluated per set, so the sets after
//! the one in which the player dies are already skipped in that same frame.
//! Presentation (`hud`) runs in `PostUpdate` regardless of state.

use crate::collision::CollisionPlugin;
use crate::config::GameConfig;
use crate::enemy::EnemyPlugin;
use crate::hud::HudPlugin;
use crate::player::PlayerPlugin;
use crate::schedule::{deferred_task_system, DeferredFired, ScheduledTasks};
use crate::session::{session_live, GameState, SessionPlugin};
use crate::terrain::{setup_terrain, Terrain};
use crate::wave::WavePlugin;
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Clock,
    Deferred,
    Player,
    Weapons,
    Bullets,
    Enemies,
    Contact,
    Waves,
}

impl FrameSet {
    pub const ALL: [FrameSet; 8] = [
        FrameSet::Clock,
        FrameSet::Deferred,
        FrameSet::Player,
        FrameSet::Weapons,
        FrameSet::Bullets,
        FrameSet::Enemies,
        FrameSet::Contact,
        FrameSet::Waves,
    ];
}

/// Headless simulation core.  Works under `MinimalPlugins`; the binary adds
/// windowing, input and rendering on top.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<Terrain>()
            .init_resource::<ScheduledTasks>()
            .add_message::<DeferredFired>()
            .configure_sets(
                Update,
                (
                    FrameSet::Clock,
                    FrameSet::Deferred,
                    FrameSet::Player,
                    FrameSet::Weapons,
                    FrameSet::Bullets,
                    FrameSet::Enemies,
                    FrameSet::Contact,
                    FrameSet::Waves,
                )
                    .chain(),
            );

        for set in FrameSet::ALL {
            app.configure_sets(
                Update,
                set.run_if(in_state(GameState::Playing))
                    .run_if(session_live),
            );
        }

        app.add_systems(Startup, setup_terrain)
            .add_systems(Update, deferred_task_system.in_set(FrameSet::Deferred))
            .add_plugins((
                SessionPlugin,
                PlayerPlugin,
                EnemyPlugin,
                CollisionPlugin,
                WavePlugin,
                HudPlugin,
            ));
    }
}
