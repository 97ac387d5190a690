//! Toolbar UI for tool selection

use crate::session::{EditorSession, Tool};
use crate::ui::{PendingAction, UiState};
use bevy_egui::egui;

fn tool_hint(tool: Tool) -> &'static str {
    match tool {
        Tool::Place => "Stamp the selected asset (Ctrl+drag fills a rectangle)",
        Tool::Collision => "Toggle blocked tiles (Ctrl+drag fills a rectangle)",
        Tool::Eraser => "Remove objects and blocked tiles (Ctrl+drag clears a rectangle)",
        Tool::Portal => "Move the selected portal",
        Tool::Spawn => "Move the player spawn",
        Tool::Border => "Pick an asset to tile across the background",
    }
}

/// Render the toolbar
pub fn render_toolbar(ctx: &egui::Context, session: &mut EditorSession, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label("Tools:");
            for tool in Tool::ALL {
                if ui
                    .selectable_label(session.tool() == tool, tool.label())
                    .on_hover_text(tool_hint(tool))
                    .clicked()
                {
                    session.set_tool(tool);
                }
            }

            ui.separator();

            if ui
                .add_enabled(session.history_len() > 0, egui::Button::new("Undo"))
                .on_hover_text("Undo (Ctrl+Z)")
                .clicked()
            {
                ui_state.pending_action = Some(PendingAction::Undo);
            }

            ui.separator();

            ui.checkbox(&mut ui_state.show_grid, "Grid");
            ui.checkbox(&mut ui_state.show_collisions, "Collisions");

            ui.separator();

            if ui
                .button("Export")
                .on_hover_text("Copy the map JSON to the clipboard")
                .clicked()
            {
                ui_state.pending_action = Some(PendingAction::ExportClipboard);
            }
            if ui.button("Save As…").clicked() {
                ui_state.pending_action = Some(PendingAction::ExportFile);
            }
            if ui
                .button("Import")
                .on_hover_text("Paste map JSON")
                .clicked()
            {
                ui_state.pending_action = Some(PendingAction::OpenImport);
            }
            if ui.button("Open…").clicked() {
                ui_state.pending_action = Some(PendingAction::ImportFile);
            }

            if session.is_fill_modifier_held() {
                ui.separator();
                let text = match session.fill_start() {
                    Some((tx, ty)) => format!("Fill from ({tx}, {ty})"),
                    None => "Fill: click the first corner".to_string(),
                };
                ui.label(egui::RichText::new(text).strong());
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use crate::session::Tool;
    use crate::testing::{
        assert_checkbox_state, assert_tool_active, harness_for_toolbar, select_labeled,
        toggle_labeled, toolbar_state_default, toolbar_state_with_history,
    };
    use crate::ui::PendingAction;

    /// Clicking the "Collision" selectable label switches tools without touching the map.
    #[test]
    fn test_toolbar_select_collision_tool() {
        let mut harness = harness_for_toolbar(toolbar_state_default());
        assert_eq!(harness.state().session.tool(), Tool::Place);

        harness.run();
        select_labeled(&harness, "Collision");
        harness.run();

        assert_tool_active(&harness, Tool::Collision);
        assert_eq!(harness.state().session.revision(), 0);
    }

    /// Every tool label is present and selectable.
    #[test]
    fn test_toolbar_cycle_all_tools() {
        let mut harness = harness_for_toolbar(toolbar_state_default());
        harness.run();
        for tool in Tool::ALL {
            select_labeled(&harness, tool.label());
            harness.run();
            assert_tool_active(&harness, tool);
        }
    }

    #[test]
    fn test_toolbar_grid_checkbox_toggle() {
        let mut harness = harness_for_toolbar(toolbar_state_default());
        harness.run();
        assert_checkbox_state(&harness, "Grid", true);

        toggle_labeled(&harness, "Grid");
        harness.run();

        assert!(!harness.state().ui_state.show_grid);
        assert_checkbox_state(&harness, "Grid", false);
    }

    #[test]
    fn test_toolbar_export_requests_clipboard_copy() {
        let mut harness = harness_for_toolbar(toolbar_state_default());
        harness.run();
        select_labeled(&harness, "Export");
        harness.run();

        assert_eq!(
            harness.state().ui_state.pending_action,
            Some(PendingAction::ExportClipboard)
        );
    }

    #[test]
    fn test_toolbar_undo_button() {
        let mut harness = harness_for_toolbar(toolbar_state_with_history());
        harness.run();
        select_labeled(&harness, "Undo");
        harness.run();

        assert_eq!(
            harness.state().ui_state.pending_action,
            Some(PendingAction::Undo)
        );
    }
}
