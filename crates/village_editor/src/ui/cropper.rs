//! Sprite cropper window

use bevy::log::info;
use bevy_egui::egui;

use crate::cropper::{CropSelection, CROP_ZOOM, SOURCE_SHEETS};
use crate::preferences::EditorPreferences;
use crate::session::EditorSession;
use crate::ui::{paint_texture, SheetTextureCache, UiState};

/// State of the cropper window
#[derive(Debug, Clone, Default)]
pub struct CropperState {
    pub open: bool,
    pub selection: CropSelection,
    /// Name for the asset being cut out
    pub name: String,
}

impl CropperState {
    /// Turn the current selection into a library asset
    pub fn save(&mut self, session: &mut EditorSession) -> Result<String, String> {
        let asset = self.selection.commit(&self.name).map_err(|e| e.to_string())?;
        info!(
            "Cropped {} ({}x{} at {}, {}) from {}",
            asset.name, asset.w, asset.h, asset.x, asset.y, asset.source
        );
        let id = session.add_asset(asset);
        session.select_asset(&id);
        self.name.clear();
        Ok(id)
    }
}

/// Render the cropper window while it is open
pub fn render_cropper(
    ctx: &egui::Context,
    session: &mut EditorSession,
    ui_state: &mut UiState,
    textures: &SheetTextureCache,
    prefs: &EditorPreferences,
) {
    if !ui_state.cropper.open {
        return;
    }

    let mut open = true;
    let mut save_requested = false;
    let cropper = &mut ui_state.cropper;

    egui::Window::new("Sprite Cropper")
        .open(&mut open)
        .default_size([640.0, 520.0])
        .resizable(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Sheet:");
                let mut source = cropper.selection.source.clone();
                egui::ComboBox::from_id_salt("crop_sheet")
                    .selected_text(&source)
                    .width(280.0)
                    .show_ui(ui, |ui| {
                        for sheet in SOURCE_SHEETS {
                            ui.selectable_value(&mut source, sheet.to_string(), *sheet);
                        }
                    });
                if source != cropper.selection.source {
                    cropper.selection.set_source(source);
                }
            });

            let selection = &cropper.selection;
            ui.label(format!(
                "Selection: {}x{} at ({}, {})",
                selection.w, selection.h, selection.x, selection.y
            ));

            ui.separator();

            egui::ScrollArea::both()
                .max_height(360.0)
                .show(ui, |ui| {
                    let key = prefs.sheet_path(&cropper.selection.source);
                    match textures.loaded.get(&key) {
                        Some(texture) => {
                            let (rect, response) = ui
                                .allocate_exact_size(texture.size * CROP_ZOOM, egui::Sense::drag());
                            let full = egui::Rect::from_min_max(
                                egui::pos2(0.0, 0.0),
                                egui::pos2(1.0, 1.0),
                            );
                            paint_texture(ui, rect, texture, full);

                            if let Some(pos) = response.interact_pointer_pos() {
                                let local = pos - rect.min;
                                if response.drag_started() {
                                    cropper.selection.begin(local.x, local.y);
                                } else if response.dragged() {
                                    cropper.selection.drag(local.x, local.y);
                                }
                            }
                            if response.drag_stopped() {
                                cropper.selection.end();
                            }

                            let selection = &cropper.selection;
                            let outline = egui::Rect::from_min_size(
                                rect.min
                                    + egui::vec2(selection.x as f32, selection.y as f32) * CROP_ZOOM,
                                egui::vec2(selection.w as f32, selection.h as f32) * CROP_ZOOM,
                            );
                            ui.painter().rect_stroke(
                                outline,
                                0.0,
                                egui::Stroke::new(2.0, egui::Color32::RED),
                                egui::StrokeKind::Outside,
                            );
                        }
                        None => {
                            ui.spinner();
                            ui.label("Loading sheet...");
                        }
                    }
                });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Name:");
                let response = ui.text_edit_singleline(&mut cropper.name);
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    save_requested = true;
                }
                if ui.button("Save asset").clicked() {
                    save_requested = true;
                }
            });
        });

    if save_requested {
        if let Err(e) = ui_state.cropper.save(session) {
            ui_state.error_message = Some(e);
        }
    }
    if !open {
        ui_state.cropper.open = false;
        ui_state.cropper.selection.end();
    }
}
