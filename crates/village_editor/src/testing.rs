//! Test helpers for `village_editor` UI panels.
//!
//! This module provides state factories, harness builders, interaction free functions
//! and assertion helpers for use in `#[cfg(test)]` modules within this crate.
#![allow(dead_code)]
//!
//! # Usage
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use crate::testing::*;
//!     // ...
//! }
//! ```

use bevy_egui::egui;
use bevy_egui::egui::accesskit;
use egui_kittest::kittest::{NodeT, Queryable};
use egui_kittest::Harness;

use crate::preferences::EditorPreferences;
use crate::session::{EditorSession, Tool};
use crate::ui::{
    render_dialogs, render_inspector, render_map_settings, render_palette, render_portals,
    render_toolbar, PendingAction, SheetTextureCache, UiState,
};

// ============================================================================
// Bundle Structs
// ============================================================================

/// Bundle for `render_toolbar`; the harness owns both values.
pub struct ToolbarBundle {
    pub session: EditorSession,
    pub ui_state: UiState,
}

/// Bundle for the side panels and dialogs.
///
/// `textures` stays empty in tests, so thumbnails fall back to plain swatches.
pub struct PanelBundle {
    pub session: EditorSession,
    pub ui_state: UiState,
    pub textures: SheetTextureCache,
    pub preferences: EditorPreferences,
    /// Tile shown in the inspector
    pub inspected: Option<(i32, i32)>,
}

// ============================================================================
// State Factories
// ============================================================================

pub fn toolbar_state_default() -> ToolbarBundle {
    ToolbarBundle {
        session: EditorSession::new(),
        ui_state: UiState::default(),
    }
}

/// One placement on the map, so Undo is enabled
pub fn toolbar_state_with_history() -> ToolbarBundle {
    let mut bundle = toolbar_state_default();
    bundle.session.select_asset("rock_1");
    bundle.session.apply_at(3, 3);
    bundle
}

pub fn panel_state_default() -> PanelBundle {
    PanelBundle {
        session: EditorSession::new(),
        ui_state: UiState::default(),
        textures: SheetTextureCache::default(),
        preferences: EditorPreferences::default(),
        inspected: None,
    }
}

/// A rock placed at (4, 4) and selected in the inspector
pub fn panel_state_inspecting_rock() -> PanelBundle {
    let mut bundle = panel_state_default();
    bundle.session.select_asset("rock_1");
    bundle.session.apply_at(4, 4);
    bundle.session.clear_selection();
    bundle.inspected = Some((4, 4));
    bundle
}

// ============================================================================
// Harness Builders
// ============================================================================

/// Returns a `Harness<'static, ToolbarBundle>` that renders only the toolbar.
///
/// # Example
///
/// ```rust,ignore
/// let mut harness = harness_for_toolbar(toolbar_state_default());
/// harness.run();
/// harness.get_by_label("Grid").click();
/// harness.run();
/// assert!(!harness.state().ui_state.show_grid);
/// ```
pub fn harness_for_toolbar(state: ToolbarBundle) -> Harness<'static, ToolbarBundle> {
    Harness::new_state(
        |ctx, bundle: &mut ToolbarBundle| {
            render_toolbar(ctx, &mut bundle.session, &mut bundle.ui_state);
        },
        state,
    )
}

/// Returns a harness laid out like the editor: library on the left, map
/// settings and inspector on the right, dialogs on top.
pub fn harness_for_panels(state: PanelBundle) -> Harness<'static, PanelBundle> {
    Harness::new_state(
        |ctx, bundle: &mut PanelBundle| {
            egui::SidePanel::left("test_asset_library").show(ctx, |ui| {
                render_palette(
                    ui,
                    &mut bundle.session,
                    &mut bundle.ui_state,
                    &bundle.textures,
                    &bundle.preferences,
                );
            });
            egui::SidePanel::right("test_inspector").show(ctx, |ui| {
                render_map_settings(ui, &mut bundle.session);
                render_portals(ui, &mut bundle.session);
                render_inspector(
                    ui,
                    &mut bundle.session,
                    &mut bundle.ui_state,
                    bundle.inspected,
                );
            });
            // CentralPanel is required when SidePanels are present
            egui::CentralPanel::default().show(ctx, |_ui| {});
            render_dialogs(ctx, &mut bundle.session, &mut bundle.ui_state);
        },
        state,
    )
}

// ============================================================================
// Interaction Free Functions
// ============================================================================

/// Click the widget with the given AccessKit label.
///
/// After calling this, run `harness.run()` to process the click.
pub fn click_labeled<State>(harness: &Harness<'_, State>, label: &str) {
    harness.get_by_label(label).click();
}

/// Toggle a checkbox widget with the given AccessKit label (one click).
pub fn toggle_labeled<State>(harness: &Harness<'_, State>, label: &str) {
    harness.get_by_label(label).click();
}

/// Select a selectable label (tool button, asset name) with the given AccessKit label.
pub fn select_labeled<State>(harness: &Harness<'_, State>, label: &str) {
    harness.get_by_label(label).click();
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that `expected` is the session's active tool.
pub fn assert_tool_active(harness: &Harness<'_, ToolbarBundle>, expected: Tool) {
    let actual = harness.state().session.tool();
    assert_eq!(
        actual, expected,
        "Expected active tool to be {expected:?}, got {actual:?}",
    );
}

/// Assert that the checkbox with the given AccessKit label is in the expected toggled state.
///
/// # Panics
///
/// Panics if the widget is not found or does not expose a `toggled` state.
pub fn assert_checkbox_state<State>(harness: &Harness<'_, State>, label: &str, expected: bool) {
    let node = harness.get_by_label(label);
    let toggled = node
        .accesskit_node()
        .toggled()
        .unwrap_or_else(|| panic!("Widget '{label}' does not expose a toggled state (is it a checkbox?)"));
    let checked = toggled == accesskit::Toggled::True;
    assert_eq!(
        checked, expected,
        "Checkbox '{label}': expected checked={expected}, got checked={checked}",
    );
}

/// Assert that the widget with the given AccessKit label is disabled.
pub fn assert_widget_disabled<State>(harness: &Harness<'_, State>, label: &str) {
    let node = harness.get_by_label(label);
    assert!(
        node.accesskit_node().is_disabled(),
        "Expected widget '{label}' to be disabled, but it is enabled",
    );
}

/// Assert that a heading or label with the given text is present.
pub fn assert_label_present<State>(harness: &Harness<'_, State>, label: &str) {
    assert!(
        harness.query_by_label(label).is_some(),
        "Expected '{label}' to be present in the AccessKit tree, but it was not found",
    );
}

pub fn assert_pending_action(actual: Option<&PendingAction>, expected: &PendingAction) {
    assert_eq!(
        actual,
        Some(expected),
        "Expected pending_action = {expected:?}, got {actual:?}",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    /// All panel headings render with an empty texture cache.
    #[test]
    fn test_panel_headings_present() {
        let mut harness = harness_for_panels(panel_state_default());
        harness.run();
        assert_label_present(&harness, "Assets");
        assert_label_present(&harness, "Map");
        assert_label_present(&harness, "Portals");
        assert_label_present(&harness, "Inspector");
        assert_label_present(&harness, "Click a tile to inspect it.");
    }

    #[test]
    fn test_toolbar_undo_disabled_without_history() {
        let mut harness = harness_for_toolbar(toolbar_state_default());
        harness.run();
        assert_widget_disabled(&harness, "Undo");
    }

    #[test]
    fn test_palette_selects_asset_by_name() {
        let mut harness = harness_for_panels(panel_state_default());
        harness.run();
        select_labeled(&harness, "Village House");
        harness.run();

        let selected = harness.state().session.selected_asset().map(|a| a.id.clone());
        assert_eq!(selected.as_deref(), Some("house_1"));
    }

    #[test]
    fn test_palette_upload_and_crop_buttons() {
        let mut harness = harness_for_panels(panel_state_default());
        harness.run();
        click_labeled(&harness, "Crop sprite");
        harness.run();
        assert_pending_action(
            harness.state().ui_state.pending_action.as_ref(),
            &PendingAction::OpenCropper,
        );

        click_labeled(&harness, "Upload image");
        harness.run();
        assert_pending_action(
            harness.state().ui_state.pending_action.as_ref(),
            &PendingAction::UploadImage,
        );
    }

    #[test]
    fn test_selecting_portal_in_list() {
        let mut harness = harness_for_panels(panel_state_default());
        harness.run();
        select_labeled(&harness, "GALLERY");
        harness.run();
        assert_eq!(harness.state().session.portal_target(), "GALLERY");

        click_labeled(&harness, "W+");
        harness.run();
        let portal = harness
            .state()
            .session
            .state()
            .portal_for_target("GALLERY")
            .map(|p| (p.tw, p.th));
        assert_eq!(portal, Some((3, 2)));
    }

    #[test]
    fn test_inspector_removes_object() {
        let mut harness = harness_for_panels(panel_state_inspecting_rock());
        harness.run();
        assert_label_present(&harness, "Tile (4, 4)");

        click_labeled(&harness, "Remove");
        harness.run();
        assert!(harness.state().session.state().objects.is_empty());
    }

    #[test]
    fn test_inspector_above_player_toggle() {
        let mut harness = harness_for_panels(panel_state_inspecting_rock());
        harness.run();
        assert_checkbox_state(&harness, "Above player", false);

        toggle_labeled(&harness, "Above player");
        harness.run();
        assert!(harness.state().session.state().objects[0].is_above_player);
    }

    #[test]
    fn test_error_dialog_dismissed_with_ok() {
        let mut state = panel_state_default();
        state.ui_state.error_message = Some("Import failed".to_string());
        let mut harness = harness_for_panels(state);
        harness.run();
        assert_label_present(&harness, "Import failed");

        click_labeled(&harness, "OK");
        harness.run();
        assert!(harness.state().ui_state.error_message.is_none());
    }
}
