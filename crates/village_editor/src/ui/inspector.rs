//! Inspector for objects on the last clicked tile

use bevy_egui::egui;

use crate::session::EditorSession;
use crate::ui::{NumericPrompt, UiState};

enum ObjectEdit {
    ToggleAbovePlayer(String),
    Remove(String),
}

/// Render the inspector for `tile`
pub fn render_inspector(
    ui: &mut egui::Ui,
    session: &mut EditorSession,
    ui_state: &mut UiState,
    tile: Option<(i32, i32)>,
) {
    ui.heading("Inspector");

    let Some((tx, ty)) = tile else {
        ui.label("Click a tile to inspect it.");
        return;
    };

    ui.label(format!("Tile ({tx}, {ty})"));
    if session.state().collision_at(tx, ty).is_some() {
        ui.label("Blocked");
    }

    let objects: Vec<_> = session
        .state()
        .objects_at(tx, ty)
        .map(|o| {
            let name = session
                .asset(&o.asset_id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| format!("missing asset {}", o.asset_id));
            (o.id.clone(), name, o.display_scale(), o.is_above_player)
        })
        .collect();

    if objects.is_empty() {
        ui.label("No objects here.");
        return;
    }

    let mut edit = None;
    for (id, name, scale, above_player) in objects {
        ui.push_id(&id, |ui| {
            ui.group(|ui| {
                ui.label(egui::RichText::new(name).strong());
                ui.horizontal(|ui| {
                    let mut above = above_player;
                    if ui
                        .checkbox(&mut above, "Above player")
                        .on_hover_text("Draw over the player, like a roof or canopy")
                        .changed()
                    {
                        edit = Some(ObjectEdit::ToggleAbovePlayer(id.clone()));
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button(format!("Scale {scale}")).clicked() {
                        ui_state.prompt = Some(NumericPrompt::object_scale(&id, scale));
                    }
                    if ui.button("Remove").clicked() {
                        edit = Some(ObjectEdit::Remove(id.clone()));
                    }
                });
            });
        });
    }

    match edit {
        Some(ObjectEdit::ToggleAbovePlayer(id)) => {
            session.toggle_above_player(&id);
        }
        Some(ObjectEdit::Remove(id)) => {
            session.remove_object(&id);
        }
        None => {}
    }
}
