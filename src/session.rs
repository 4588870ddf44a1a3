//! Session lifecycle: `GameState`, the session clock, and start / restart.
//!
//! ## States
//!
//! | State      | Description                                              |
//! |------------|----------------------------------------------------------|
//! | `Briefing` | Initial state; nothing simulated until `Start` arrives   |
//! | `Playing`  | All frame sets run                                        |
//! | `GameOver` | Terminal; world frozen, presentation still refreshed      |
//!
//! A session is never destroyed.  [`SessionCommand::Restart`] resets every
//! piece of session state in place, bumps [`SessionGeneration`] so deferred
//! tasks from the old session are ignored, and immediately starts again.
//!
//! ## Systems (registered by `SessionPlugin`)
//!
//! | System                   | Schedule                  | Purpose                          |
//! |--------------------------|---------------------------|----------------------------------|
//! | `session_command_system` | `Update`, before frame    | Handle `Start` / `Restart`       |
//! | `session_clock_system`   | `FrameSet::Clock`         | Advance simulated time           |
//! | `enter_game_over`        | `OnEnter(GameOver)`       | Release the pointer, log summary |

use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::player::{
    spawn_pose, Bullet, LookAngles, Player, PlayerHealth, PlayerMotion, PlayerScore,
    PointerCaptured, Recoil,
};
use crate::schedule::ScheduledTasks;
use crate::simulation::FrameSet;
use crate::terrain::Terrain;
use crate::wave::{begin_wave, WaveState};
use crate::weapon::{FireFeedback, WeaponState};
use bevy::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level session state machine.
///
/// Every gameplay frame set runs under `.run_if(in_state(GameState::Playing))`,
/// so movement, firing and spawning all stop the moment the player dies.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Waiting for the first `Start` command.
    #[default]
    Briefing,
    /// Active gameplay.
    Playing,
    /// Player health reached zero; waiting for `Restart`.
    GameOver,
}

// ── Resources / components ────────────────────────────────────────────────────

/// Simulated time.  Only advances while `Playing`.
///
/// `elapsed_secs` is kept in `f64` so that long sessions keep sub-frame
/// resolution, the same way `Time::elapsed_secs_f64` does.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SessionClock {
    /// Seconds of simulated time since the app started.
    pub elapsed_secs: f64,
    /// Seconds simulated by the current frame.
    pub delta_secs: f32,
}

impl SessionClock {
    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.delta_secs = dt.max(0.0);
        self.elapsed_secs += f64::from(self.delta_secs);
    }
}

/// Incremented on every restart; deferred tasks carry the value they were
/// scheduled with.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionGeneration(pub u64);

/// Monotonic creation index shared by enemies and bullets.
///
/// Collision resolution walks entities by this index (newest first), which
/// gives a stable, documented winner when a bullet reaches two enemies in the
/// same frame.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnOrder(pub u64);

#[derive(Resource, Debug, Default)]
pub struct SpawnCounter(u64);

impl SpawnCounter {
    pub fn next(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.0);
        self.0 += 1;
        order
    }
}

/// What the presentation layer shows once the player has died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub wave: u32,
    pub score: u32,
    pub kills: u32,
}

/// `Some` once the session reached its terminal state.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SessionOutcome(pub Option<GameOverSummary>);

/// External session control surface.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Spawn the initial wave and begin playing.  Ignored unless in `Briefing`.
    Start,
    /// Reset the session in place and start again.
    Restart,
}

/// Run condition: true until the session has a game-over outcome.
///
/// Guards the rest of the frame in which the player dies, before the
/// `GameOver` state transition takes effect.
pub fn session_live(outcome: Res<SessionOutcome>) -> bool {
    outcome.0.is_none()
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_message::<SessionCommand>()
            .init_resource::<SessionClock>()
            .init_resource::<SessionGeneration>()
            .init_resource::<SpawnCounter>()
            .init_resource::<SessionOutcome>()
            .add_systems(Update, session_command_system.before(FrameSet::Clock))
            .add_systems(Update, session_clock_system.in_set(FrameSet::Clock))
            .add_systems(OnEnter(GameState::GameOver), enter_game_over);
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

pub fn session_clock_system(time: Res<Time>, mut clock: ResMut<SessionClock>) {
    clock.advance(time.delta_secs());
}

/// Apply `Start` / `Restart` commands.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn session_command_system(
    mut commands: Commands,
    mut requests: MessageReader<SessionCommand>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    config: Res<GameConfig>,
    terrain: Res<Terrain>,
    clock: Res<SessionClock>,
    mut generation: ResMut<SessionGeneration>,
    mut tasks: ResMut<ScheduledTasks>,
    mut wave: ResMut<WaveState>,
    mut weapon: ResMut<WeaponState>,
    (mut feedback, mut recoil): (ResMut<FireFeedback>, ResMut<Recoil>),
    mut score: ResMut<PlayerScore>,
    mut outcome: ResMut<SessionOutcome>,
    mut q_player: Query<
        (
            &mut Transform,
            &mut PlayerHealth,
            &mut PlayerMotion,
            &mut LookAngles,
        ),
        With<Player>,
    >,
    q_transient: Query<Entity, Or<(With<Enemy>, With<Bullet>)>>,
) {
    let mut start = false;
    let mut restart = false;
    for request in requests.read() {
        match request {
            SessionCommand::Start => start = true,
            SessionCommand::Restart => restart = true,
        }
    }

    if restart {
        generation.0 += 1;
        *weapon = WeaponState::default();
        *feedback = FireFeedback::default();
        *recoil = Recoil::default();
        *wave = WaveState::default();
        *score = PlayerScore::default();
        outcome.0 = None;

        for (mut transform, mut health, mut motion, mut look) in q_player.iter_mut() {
            *transform = spawn_pose(&config, &terrain);
            *health = PlayerHealth::new(config.player_max_health);
            *motion = PlayerMotion::default();
            *look = LookAngles::default();
        }
        for entity in q_transient.iter() {
            commands.entity(entity).despawn();
        }

        info!("Session restarted (generation {})", generation.0);
    } else if !(start && *state.get() == GameState::Briefing) {
        return;
    }

    begin_wave(&mut wave, &mut tasks, clock.elapsed_secs, generation.0, &config);
    next_state.set(GameState::Playing);
    info!("Session started at wave {}", wave.wave);
}

fn enter_game_over(mut pointer: ResMut<PointerCaptured>, outcome: Res<SessionOutcome>) {
    pointer.0 = false;
    if let Some(summary) = outcome.0 {
        info!(
            "Game over: wave {}, score {}, kills {}",
            summary.wave, summary.score, summary.kills
        );
    }
}
