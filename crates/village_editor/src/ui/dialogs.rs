//! Dialog windows for the editor

use crate::session::EditorSession;
use crate::ui::{import_text, scatter, UiState};
use bevy::log::info;
use bevy_egui::egui;

/// What a numeric prompt edits once confirmed
#[derive(Debug, Clone, PartialEq)]
pub enum PromptKind {
    /// Scatter copies of an asset across the map
    Scatter { asset_id: String },
    /// Change an asset's scale multiplier
    RescaleAsset { asset_id: String },
    /// Change one placed object's display scale
    ObjectScale { object_id: String },
}

/// A single-field prompt window
#[derive(Debug, Clone, PartialEq)]
pub struct NumericPrompt {
    pub kind: PromptKind,
    pub title: String,
    pub text: String,
}

impl NumericPrompt {
    pub fn scatter(asset_id: &str, asset_name: &str) -> Self {
        Self {
            kind: PromptKind::Scatter {
                asset_id: asset_id.to_string(),
            },
            title: format!("Scatter {asset_name}"),
            text: "10".to_string(),
        }
    }

    pub fn rescale_asset(asset_id: &str, asset_name: &str, current: f32) -> Self {
        Self {
            kind: PromptKind::RescaleAsset {
                asset_id: asset_id.to_string(),
            },
            title: format!("Scale of {asset_name}"),
            text: current.to_string(),
        }
    }

    pub fn object_scale(object_id: &str, current: f32) -> Self {
        Self {
            kind: PromptKind::ObjectScale {
                object_id: object_id.to_string(),
            },
            title: "Object scale".to_string(),
            text: current.to_string(),
        }
    }

    /// The entered number, if it is one
    pub fn value(&self) -> Option<f32> {
        self.text
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
    }

    fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Scatter { .. } => "How many copies?",
            PromptKind::RescaleAsset { .. } => "Scale multiplier:",
            PromptKind::ObjectScale { .. } => "Display scale:",
        }
    }
}

/// Result of showing a prompt for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromptOutcome {
    Pending,
    /// OK was pressed; `None` when the text is not a number
    Confirmed(Option<f32>),
    Cancelled,
}

/// Show a numeric prompt window
pub fn render_prompt(ctx: &egui::Context, prompt: &mut NumericPrompt) -> PromptOutcome {
    let mut outcome = PromptOutcome::Pending;
    let label = prompt.label();

    egui::Window::new(prompt.title.clone())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(label);
                let response = ui.text_edit_singleline(&mut prompt.text);
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    outcome = PromptOutcome::Confirmed(prompt.value());
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    outcome = PromptOutcome::Confirmed(prompt.value());
                }
                if ui.button("Cancel").clicked() {
                    outcome = PromptOutcome::Cancelled;
                }
            });
        });

    outcome
}

/// Apply a confirmed prompt to the session
pub(crate) fn apply_prompt(
    session: &mut EditorSession,
    ui_state: &mut UiState,
    kind: &PromptKind,
    value: Option<f32>,
) {
    match kind {
        PromptKind::Scatter { asset_id } => {
            // Fractional counts are truncated; non-numbers and counts <= 0 do nothing
            let count = value.map(|v| v.trunc() as i64).unwrap_or(0);
            let placed = scatter(session, asset_id, count);
            if placed > 0 {
                info!("Scattered {placed} copies of {asset_id}");
            }
        }
        PromptKind::RescaleAsset { asset_id } => {
            let applied = value.is_some_and(|scale| session.rescale_asset(asset_id, scale));
            if !applied {
                ui_state.error_message = Some("Scale must be a positive number".to_string());
            }
        }
        PromptKind::ObjectScale { object_id } => {
            session.set_object_scale(object_id, value);
        }
    }
}

/// Render every open dialog
pub fn render_dialogs(ctx: &egui::Context, session: &mut EditorSession, ui_state: &mut UiState) {
    render_prompt_dialog(ctx, session, ui_state);
    render_import_dialog(ctx, session, ui_state);
    render_notice_dialog(ctx, ui_state);
    render_error_dialog(ctx, ui_state);
}

fn render_prompt_dialog(ctx: &egui::Context, session: &mut EditorSession, ui_state: &mut UiState) {
    let Some(prompt) = ui_state.prompt.as_mut() else {
        return;
    };
    match render_prompt(ctx, prompt) {
        PromptOutcome::Pending => {}
        PromptOutcome::Cancelled => ui_state.prompt = None,
        PromptOutcome::Confirmed(value) => {
            if let Some(prompt) = ui_state.prompt.take() {
                apply_prompt(session, ui_state, &prompt.kind, value);
            }
        }
    }
}

fn render_import_dialog(ctx: &egui::Context, session: &mut EditorSession, ui_state: &mut UiState) {
    let Some(mut text) = ui_state.import_text.take() else {
        return;
    };
    let mut open = true;
    let mut submitted = false;

    egui::Window::new("Import Map")
        .collapsible(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Paste exported map JSON:");
            egui::ScrollArea::vertical()
                .max_height(300.0)
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .code_editor()
                            .desired_rows(12)
                            .desired_width(f32::INFINITY),
                    );
                });

            ui.separator();

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!text.trim().is_empty(), egui::Button::new("Import"))
                    .clicked()
                {
                    submitted = true;
                }
                if ui.button("Cancel").clicked() {
                    open = false;
                }
            });
        });

    if submitted {
        // A rejected paste stays open so it can be fixed
        if import_text(session, ui_state, &text) {
            return;
        }
    }
    if open {
        ui_state.import_text = Some(text);
    }
}

fn render_notice_dialog(ctx: &egui::Context, ui_state: &mut UiState) {
    let Some(notice) = ui_state.notice.clone() else {
        return;
    };

    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(&notice);
            ui.separator();
            if ui.button("OK").clicked() {
                ui_state.notice = None;
            }
        });
}

fn render_error_dialog(ctx: &egui::Context, ui_state: &mut UiState) {
    let Some(error_msg) = ui_state.error_message.clone() else {
        return;
    };

    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(&error_msg);
            ui.separator();
            if ui.button("OK").clicked() {
                ui_state.error_message = None;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_value_parsing() {
        let mut prompt = NumericPrompt::scatter("tree_1", "Tree");
        assert_eq!(prompt.value(), Some(10.0));
        prompt.text = " 2.5 ".to_string();
        assert_eq!(prompt.value(), Some(2.5));
        prompt.text = "lots".to_string();
        assert_eq!(prompt.value(), None);
        prompt.text = "inf".to_string();
        assert_eq!(prompt.value(), None);
    }

    #[test]
    fn test_scatter_prompt() {
        let mut session = EditorSession::new();
        let mut ui_state = UiState::default();
        let kind = PromptKind::Scatter {
            asset_id: "tree_1".to_string(),
        };

        apply_prompt(&mut session, &mut ui_state, &kind, Some(3.7));
        assert_eq!(session.state().objects.len(), 3);

        apply_prompt(&mut session, &mut ui_state, &kind, Some(-4.0));
        apply_prompt(&mut session, &mut ui_state, &kind, None);
        assert_eq!(session.state().objects.len(), 3);
        assert!(ui_state.error_message.is_none());
    }

    #[test]
    fn test_rescale_prompt_rejects_bad_values() {
        let mut session = EditorSession::new();
        let mut ui_state = UiState::default();
        let kind = PromptKind::RescaleAsset {
            asset_id: "rock_1".to_string(),
        };

        apply_prompt(&mut session, &mut ui_state, &kind, Some(0.0));
        assert!(ui_state.error_message.is_some());
        assert_eq!(session.asset("rock_1").unwrap().effective_scale(), 1.0);

        ui_state.error_message = None;
        apply_prompt(&mut session, &mut ui_state, &kind, Some(2.0));
        assert!(ui_state.error_message.is_none());
        assert_eq!(session.asset("rock_1").unwrap().effective_scale(), 2.0);
    }

    #[test]
    fn test_object_scale_prompt_falls_back_on_garbage() {
        let mut session = EditorSession::new();
        let mut ui_state = UiState::default();
        session.select_asset("rock_1");
        session.apply_at(2, 2);
        let object_id = session.state().objects[0].id.clone();
        let kind = PromptKind::ObjectScale {
            object_id: object_id.clone(),
        };

        apply_prompt(&mut session, &mut ui_state, &kind, Some(1.5));
        assert_eq!(session.state().objects[0].scale, Some(1.5));

        apply_prompt(&mut session, &mut ui_state, &kind, None);
        assert_eq!(session.state().objects[0].scale, Some(3.0));
    }
}
