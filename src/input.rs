//! Keyboard / mouse → [`PlayerIntent`], pointer capture, and session commands.
//!
//! ## Pipeline (runs in order every `Update` frame, before the session systems)
//!
//! 1. [`player_intent_clear_system`] — resets `PlayerIntent` to empty.
//! 2. [`keyboard_to_intent_system`] — movement keys, jump, reload, weapon slots.
//! 3. [`mouse_to_intent_system`] — look delta, fire, capture/release, start/restart.
//!
//! ## Bindings
//!
//! | Input         | Effect                                  |
//! |---------------|-----------------------------------------|
//! | W / S / A / D | forward / back / left / right           |
//! | Q / E         | diagonal forward-left / forward-right   |
//! | Space         | jump (held)                             |
//! | R             | reload (edge)                           |
//! | 1 / 2 / 3     | rifle / shotgun / pistol (edge)         |
//! | Left click    | fire when captured; otherwise capture, start or restart |
//! | Escape        | release the pointer                     |
//!
//! While the pointer is released the intent stays empty, so the simulation
//! sees no input at all.

use crate::player::{PlayerIntent, PointerCaptured};
use crate::session::{session_command_system, GameState, SessionCommand};
use crate::weapon::WeaponKind;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AccumulatedMouseMotion>().add_systems(
            Update,
            (
                player_intent_clear_system,
                keyboard_to_intent_system,
                mouse_to_intent_system,
            )
                .chain()
                .before(session_command_system),
        );
    }
}

// ── Step 1: Clear ─────────────────────────────────────────────────────────────

pub fn player_intent_clear_system(mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent::default();
}

// ── Step 2: Keyboard → Intent ─────────────────────────────────────────────────

pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    pointer: Res<PointerCaptured>,
    mut intent: ResMut<PlayerIntent>,
) {
    if !pointer.0 {
        return;
    }
    intent.forward = keys.pressed(KeyCode::KeyW);
    intent.back = keys.pressed(KeyCode::KeyS);
    intent.left = keys.pressed(KeyCode::KeyA);
    intent.right = keys.pressed(KeyCode::KeyD);
    intent.strafe_forward_left = keys.pressed(KeyCode::KeyQ);
    intent.strafe_forward_right = keys.pressed(KeyCode::KeyE);
    intent.jump = keys.pressed(KeyCode::Space);
    intent.reload = keys.just_pressed(KeyCode::KeyR);

    for (slot, key) in [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3]
        .into_iter()
        .enumerate()
    {
        if keys.just_pressed(key) {
            intent.select_weapon = WeaponKind::from_slot(slot as u8 + 1);
        }
    }
}

// ── Step 3: Mouse → Intent ────────────────────────────────────────────────────

/// Mouse look and the primary action.
///
/// A click only fires when the pointer was already captured at the start of
/// the frame; the click that captures it (or starts / restarts the session)
/// does not also shoot.
pub fn mouse_to_intent_system(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    motion: Res<AccumulatedMouseMotion>,
    state: Res<State<GameState>>,
    mut pointer: ResMut<PointerCaptured>,
    mut intent: ResMut<PlayerIntent>,
    mut commands: MessageWriter<SessionCommand>,
) {
    if keys.just_pressed(KeyCode::Escape) && pointer.0 {
        pointer.0 = false;
        *intent = PlayerIntent::default();
        return;
    }

    let clicked = buttons.just_pressed(MouseButton::Left);
    match state.get() {
        GameState::Briefing => {
            if clicked {
                pointer.0 = true;
                commands.write(SessionCommand::Start);
            }
        }
        GameState::GameOver => {
            if clicked {
                pointer.0 = true;
                commands.write(SessionCommand::Restart);
            }
        }
        GameState::Playing => {
            if !pointer.0 {
                pointer.0 = clicked;
            } else {
                intent.look_delta = motion.delta;
                intent.fire = clicked;
            }
        }
    }
}
