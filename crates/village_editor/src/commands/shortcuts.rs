//! Keyboard shortcuts

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::session::EditorSession;

const CONTROL_KEYS: [KeyCode; 2] = [KeyCode::ControlLeft, KeyCode::ControlRight];

/// Ctrl latches the fill modifier, releasing it cancels a pending fill and
/// Ctrl+Z undoes the last change.
pub fn handle_keyboard_shortcuts(
    mut contexts: EguiContexts,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<EditorSession>,
) {
    let ctrl_down = keyboard.any_pressed(CONTROL_KEYS);

    if keyboard.any_just_pressed(CONTROL_KEYS) {
        session.press_fill_modifier();
    }
    if keyboard.any_just_released(CONTROL_KEYS) && !ctrl_down {
        session.release_fill_modifier();
    }

    // Text fields keep their own Ctrl+Z
    let typing = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false);
    if typing {
        return;
    }

    if ctrl_down && keyboard.just_pressed(KeyCode::KeyZ) {
        if session.undo() {
            info!("Undo ({} steps left)", session.history_len());
        }
    }
}
