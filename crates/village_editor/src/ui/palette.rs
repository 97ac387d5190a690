//! Asset library panel

use bevy_egui::egui;
use village_core::{AssetCategory, AssetDefinition};

use crate::preferences::EditorPreferences;
use crate::session::{EditorSession, Tool};
use crate::ui::{paint_texture, NumericPrompt, PendingAction, SheetTextureCache, UiState};

const THUMBNAIL_SIZE: f32 = 40.0;

/// Change requested from a palette row, applied after the list is drawn
enum PaletteEdit {
    Select(String),
    Category(String, AssetCategory),
    Delete(String),
}

/// Render the asset library
pub fn render_palette(
    ui: &mut egui::Ui,
    session: &mut EditorSession,
    ui_state: &mut UiState,
    textures: &SheetTextureCache,
    prefs: &EditorPreferences,
) {
    ui.heading("Assets");

    ui.horizontal(|ui| {
        if ui.button("Upload image").clicked() {
            ui_state.pending_action = Some(PendingAction::UploadImage);
        }
        if ui.button("Crop sprite").clicked() {
            ui_state.pending_action = Some(PendingAction::OpenCropper);
        }
    });

    match session.tool() {
        Tool::Border => ui.label("Click an asset to tile it across the background."),
        _ => ui.label("Click an asset, then click the map to place it."),
    };
    ui.separator();

    let selected_id = session.selected_asset().map(|a| a.id.clone());
    let assets: Vec<AssetDefinition> = session.assets().to_vec();
    let mut edits = Vec::new();

    egui::ScrollArea::vertical().show(ui, |ui| {
        if assets.is_empty() {
            ui.label("No assets. Upload an image or crop one from a sheet.");
        }
        for asset in &assets {
            let selected = selected_id.as_deref() == Some(asset.id.as_str());
            render_asset_row(ui, asset, selected, textures, prefs, ui_state, &mut edits);
        }
    });

    for edit in edits {
        match edit {
            PaletteEdit::Select(id) => {
                session.select_asset(&id);
            }
            PaletteEdit::Category(id, category) => {
                session.set_asset_category(&id, category);
            }
            PaletteEdit::Delete(id) => {
                session.remove_asset(&id);
            }
        }
    }
}

fn render_asset_row(
    ui: &mut egui::Ui,
    asset: &AssetDefinition,
    selected: bool,
    textures: &SheetTextureCache,
    prefs: &EditorPreferences,
    ui_state: &mut UiState,
    edits: &mut Vec<PaletteEdit>,
) {
    let frame = egui::Frame::group(ui.style()).fill(if selected {
        ui.visuals().selection.bg_fill.gamma_multiply(0.4)
    } else {
        egui::Color32::TRANSPARENT
    });

    frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            let (rect, response) = ui.allocate_exact_size(
                egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE),
                egui::Sense::click(),
            );
            match textures.for_asset(asset, prefs) {
                Some(texture) => {
                    paint_texture(ui, fit_rect(rect, asset), texture, texture.uv_for(asset))
                }
                None => {
                    ui.painter()
                        .rect_filled(rect, 2.0, egui::Color32::from_gray(70));
                }
            }
            if response.clicked() {
                edits.push(PaletteEdit::Select(asset.id.clone()));
            }

            ui.vertical(|ui| {
                if ui.selectable_label(selected, &asset.name).clicked() {
                    edits.push(PaletteEdit::Select(asset.id.clone()));
                }

                ui.horizontal(|ui| {
                    let current = asset.category();
                    egui::ComboBox::from_id_salt(("category", asset.id.as_str()))
                        .selected_text(current.label())
                        .width(110.0)
                        .show_ui(ui, |ui| {
                            for category in AssetCategory::ALL {
                                if ui
                                    .selectable_label(current == category, category.label())
                                    .clicked()
                                    && current != category
                                {
                                    edits.push(PaletteEdit::Category(asset.id.clone(), category));
                                }
                            }
                        });
                });

                ui.horizontal(|ui| {
                    if ui
                        .small_button("Scatter")
                        .on_hover_text("Place copies at random tiles")
                        .clicked()
                    {
                        ui_state.prompt = Some(NumericPrompt::scatter(&asset.id, &asset.name));
                    }
                    if ui
                        .small_button(format!("x{}", asset.effective_scale()))
                        .on_hover_text("Change scale")
                        .clicked()
                    {
                        ui_state.prompt = Some(NumericPrompt::rescale_asset(
                            &asset.id,
                            &asset.name,
                            asset.effective_scale(),
                        ));
                    }
                    if ui.small_button("Delete").clicked() {
                        edits.push(PaletteEdit::Delete(asset.id.clone()));
                    }
                });
            });
        });
    });
}

/// Largest rectangle with the asset's aspect ratio centered in `rect`
fn fit_rect(rect: egui::Rect, asset: &AssetDefinition) -> egui::Rect {
    if !asset.has_valid_size() {
        return rect;
    }
    let aspect = asset.w as f32 / asset.h as f32;
    let size = if aspect >= 1.0 {
        egui::vec2(rect.width(), rect.width() / aspect)
    } else {
        egui::vec2(rect.height() * aspect, rect.height())
    };
    egui::Rect::from_center_size(rect.center(), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::starter_assets;

    #[test]
    fn test_fit_rect_keeps_aspect() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(40.0, 40.0));
        let mut asset = starter_assets().remove(0);
        asset.w = 32;
        asset.h = 16;

        let fitted = fit_rect(rect, &asset);
        assert_eq!(fitted.size(), egui::vec2(40.0, 20.0));
        assert_eq!(fitted.center(), rect.center());

        asset.w = 0;
        assert_eq!(fit_rect(rect, &asset), rect);
    }
}
