//! Presentation snapshot: everything a HUD needs, refreshed every frame.
//!
//! [`hud_snapshot_system`] runs in `PostUpdate` in every [`GameState`], so the
//! frozen scene after game over still shows the final numbers.  The library
//! never formats text; the binary's renderer turns the snapshot into a HUD.

use crate::player::{Player, PlayerHealth, PlayerScore};
use crate::session::{GameOverSummary, GameState, SessionOutcome};
use crate::wave::WaveState;
use crate::weapon::{FireFeedback, WeaponKind, WeaponState};
use bevy::prelude::*;

/// What the ammo counter shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoReadout {
    Rounds { current: u32, capacity: u32 },
    Reloading,
}

impl Default for AmmoReadout {
    fn default() -> Self {
        let capacity = WeaponKind::default().stats().magazine;
        AmmoReadout::Rounds {
            current: capacity,
            capacity,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct HudSnapshot {
    pub state: GameState,
    pub health: f32,
    pub max_health: f32,
    pub ammo: AmmoReadout,
    pub weapon: WeaponKind,
    pub muzzle_lit: bool,
    pub score: u32,
    pub wave: u32,
    pub kills: u32,
    pub game_over: Option<GameOverSummary>,
}

impl HudSnapshot {
    /// Health as a fraction of max, clamped to `[0, 1]`.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudSnapshot>()
            .add_systems(PostUpdate, hud_snapshot_system);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn hud_snapshot_system(
    q_player: Query<&PlayerHealth, With<Player>>,
    state: Res<State<GameState>>,
    weapon: Res<WeaponState>,
    feedback: Res<FireFeedback>,
    score: Res<PlayerScore>,
    wave: Res<WaveState>,
    outcome: Res<SessionOutcome>,
    mut hud: ResMut<HudSnapshot>,
) {
    let (health, max_health) = q_player
        .single()
        .map(|h| (h.hp.max(0.0), h.max_hp))
        .unwrap_or((0.0, 0.0));

    let ammo = if weapon.reloading {
        AmmoReadout::Reloading
    } else {
        AmmoReadout::Rounds {
            current: weapon.ammo,
            capacity: weapon.stats().magazine,
        }
    };

    let next = HudSnapshot {
        state: state.get().clone(),
        health,
        max_health,
        ammo,
        weapon: weapon.current,
        muzzle_lit: feedback.muzzle_lit,
        score: score.points,
        wave: wave.wave,
        kills: wave.kills,
        game_over: outcome.0,
    };
    // Avoid tripping change detection on quiet frames.
    hud.set_if_neq(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn hud_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.init_resource::<WeaponState>();
        app.init_resource::<FireFeedback>();
        app.init_resource::<PlayerScore>();
        app.init_resource::<WaveState>();
        app.init_resource::<SessionOutcome>();
        app.add_plugins(HudPlugin);
        app.world_mut().spawn((Player, PlayerHealth::new(100.0)));
        app
    }

    #[test]
    fn snapshot_reflects_session_state() {
        let mut app = hud_test_app();
        app.insert_resource(WeaponState {
            current: WeaponKind::Pistol,
            ammo: 12,
            ..Default::default()
        });
        app.insert_resource(PlayerScore { points: 40 });
        app.update();

        let hud = app.world().resource::<HudSnapshot>();
        assert_eq!(hud.state, GameState::Briefing);
        assert_eq!(hud.health, 100.0);
        assert_eq!(hud.health_fraction(), 1.0);
        assert_eq!(
            hud.ammo,
            AmmoReadout::Rounds {
                current: 12,
                capacity: 15
            }
        );
        assert_eq!(hud.weapon, WeaponKind::Pistol);
        assert_eq!(hud.score, 40);
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.game_over, None);
    }

    #[test]
    fn reload_replaces_round_count() {
        let mut app = hud_test_app();
        app.insert_resource(WeaponState {
            reloading: true,
            ammo: 0,
            ..Default::default()
        });
        app.update();

        assert_eq!(
            app.world().resource::<HudSnapshot>().ammo,
            AmmoReadout::Reloading
        );
    }

    #[test]
    fn negative_health_reads_as_zero() {
        let mut app = hud_test_app();
        let mut q = app.world_mut().query::<&mut PlayerHealth>();
        for mut health in q.iter_mut(app.world_mut()) {
            health.hp = -15.0;
        }
        app.update();

        let hud = app.world().resource::<HudSnapshot>();
        assert_eq!(hud.health, 0.0);
        assert_eq!(hud.health_fraction(), 0.0);
    }
}
