//! Editor panels and dialogs

mod cropper;
mod dialogs;
mod inspector;
mod palette;
mod portals;
mod toolbar;

pub use cropper::{render_cropper, CropperState};
pub use dialogs::{
    render_dialogs, render_prompt, NumericPrompt, PromptKind, PromptOutcome,
};
pub use inspector::render_inspector;
pub use palette::render_palette;
pub use portals::{render_map_settings, render_portals};
pub use toolbar::render_toolbar;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass, EguiTextureHandle};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;
use village_core::AssetDefinition;

use crate::library::{placeholder_upload, upload_from_path, AssetUploadError};
use crate::preferences::EditorPreferences;
use crate::render::{asset_image_path, ImageCache};
use crate::session::EditorSession;
use crate::tools::HoveredTile;

/// Actions requested by panels, carried out once per frame after drawing
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Undo,
    /// Copy the document to the clipboard
    ExportClipboard,
    /// Write the document to a file picked by the user
    ExportFile,
    /// Open the paste dialog
    OpenImport,
    /// Read a document from a file picked by the user
    ImportFile,
    /// Add an image picked by the user to the library
    UploadImage,
    OpenCropper,
}

/// UI-only editor state
#[derive(Resource)]
pub struct UiState {
    pub show_grid: bool,
    pub show_collisions: bool,
    pub pending_action: Option<PendingAction>,
    pub prompt: Option<NumericPrompt>,
    /// Text of the paste-to-import dialog while it is open
    pub import_text: Option<String>,
    pub cropper: CropperState,
    /// Informational message shown until dismissed
    pub notice: Option<String>,
    pub error_message: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_collisions: true,
            pending_action: None,
            prompt: None,
            import_text: None,
            cropper: CropperState::default(),
            notice: None,
            error_message: None,
        }
    }
}

impl UiState {
    pub fn from_preferences(prefs: &EditorPreferences) -> Self {
        let mut state = Self {
            show_grid: prefs.show_grid,
            show_collisions: prefs.show_collisions,
            ..default()
        };
        state.cropper.selection.set_source(prefs.last_crop_sheet.clone());
        state
    }
}

/// Image registered with egui
#[derive(Clone, Debug)]
pub struct SheetTexture {
    pub handle: Handle<Image>,
    pub id: egui::TextureId,
    pub size: egui::Vec2,
    /// Placeholder or uploaded image: draw the whole texture instead of a crop
    pub whole: bool,
}

impl SheetTexture {
    /// UV rectangle of an asset's crop inside this texture
    pub fn uv_for(&self, asset: &AssetDefinition) -> egui::Rect {
        if self.whole || asset.is_custom || self.size.x <= 0.0 || self.size.y <= 0.0 {
            return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        }
        egui::Rect::from_min_max(
            egui::pos2(asset.x as f32 / self.size.x, asset.y as f32 / self.size.y),
            egui::pos2(
                (asset.x + asset.w) as f32 / self.size.x,
                (asset.y + asset.h) as f32 / self.size.y,
            ),
        )
    }
}

/// egui textures for library images, keyed by asset path
#[derive(Resource, Default)]
pub struct SheetTextureCache {
    pub loaded: HashMap<String, SheetTexture>,
}

impl SheetTextureCache {
    pub fn for_asset(
        &self,
        asset: &AssetDefinition,
        prefs: &EditorPreferences,
    ) -> Option<&SheetTexture> {
        let key = asset_image_path(asset, prefs).unwrap_or_else(|| format!("embedded:{}", asset.id));
        self.loaded.get(&key)
    }
}

/// Paint part of a texture into a rectangle
pub fn paint_texture(ui: &egui::Ui, rect: egui::Rect, texture: &SheetTexture, uv: egui::Rect) {
    let mut mesh = egui::Mesh::with_texture(texture.id);
    mesh.add_rect_with_uv(rect, uv, egui::Color32::WHITE);
    ui.painter().add(egui::Shape::mesh(mesh));
}

/// Plugin for the editor's egui panels
pub struct EditorUiPlugin;

impl Plugin for EditorUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SheetTextureCache>()
            .init_resource::<UiState>()
            .add_systems(Startup, init_ui_state)
            .add_systems(Update, sync_sheet_textures)
            .add_systems(EguiPrimaryContextPass, editor_ui);
    }
}

fn init_ui_state(
    prefs: Res<EditorPreferences>,
    mut ui_state: ResMut<UiState>,
    mut session: ResMut<EditorSession>,
) {
    *ui_state = UiState::from_preferences(&prefs);
    session.set_tool(prefs.default_tool);
}

/// Register library images with egui once they are loaded
fn sync_sheet_textures(
    mut contexts: EguiContexts,
    session: Res<EditorSession>,
    ui_state: Res<UiState>,
    prefs: Res<EditorPreferences>,
    mut cache: ResMut<ImageCache>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut textures: ResMut<SheetTextureCache>,
) {
    let mut wanted: Vec<(String, Handle<Image>, bool)> = session
        .assets()
        .iter()
        .map(|asset| {
            let key = asset_image_path(asset, &prefs)
                .unwrap_or_else(|| format!("embedded:{}", asset.id));
            let (handle, placeholder) = cache.image_for(asset, &prefs, &asset_server, &mut images);
            (key, handle, placeholder)
        })
        .collect();

    if ui_state.cropper.open {
        let path = prefs.sheet_path(&ui_state.cropper.selection.source);
        let handle = cache.sheet(&path, &asset_server);
        let placeholder = cache.is_placeholder(&path);
        wanted.push((path, handle, placeholder));
    }

    for (key, handle, whole) in wanted {
        if textures.loaded.get(&key).is_some_and(|t| t.handle == handle) {
            continue;
        }
        let Some(image) = images.get(&handle) else {
            continue;
        };
        let size = image.size_f32();
        let id = contexts.add_image(EguiTextureHandle::Strong(handle.clone()));
        textures.loaded.insert(
            key,
            SheetTexture {
                handle,
                id,
                size: egui::vec2(size.x, size.y),
                whole,
            },
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn editor_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    mut ui_state: ResMut<UiState>,
    mut prefs: ResMut<EditorPreferences>,
    textures: Res<SheetTextureCache>,
    hovered: Res<HoveredTile>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    render_toolbar(ctx, &mut session, &mut ui_state);

    egui::SidePanel::left("asset_library")
        .default_width(260.0)
        .show(ctx, |ui| {
            render_palette(ui, &mut session, &mut ui_state, &textures, &prefs);
        });

    egui::SidePanel::right("inspector")
        .default_width(240.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                render_map_settings(ui, &mut session);
                ui.separator();
                render_portals(ui, &mut session);
                ui.separator();
                render_inspector(ui, &mut session, &mut ui_state, hovered.last_clicked);
            });
        });

    render_dialogs(ctx, &mut session, &mut ui_state);
    render_cropper(ctx, &mut session, &mut ui_state, &textures, &prefs);
    process_pending_actions(ctx, &mut session, &mut ui_state);

    // Keep persisted view settings in step with the toolbar
    if prefs.show_grid != ui_state.show_grid
        || prefs.show_collisions != ui_state.show_collisions
        || prefs.last_crop_sheet != ui_state.cropper.selection.source
    {
        prefs.show_grid = ui_state.show_grid;
        prefs.show_collisions = ui_state.show_collisions;
        prefs.last_crop_sheet = ui_state.cropper.selection.source.clone();
        if let Err(e) = prefs.save() {
            error!("Failed to save preferences: {e}");
        }
    }
    Ok(())
}

/// Carry out the action a panel requested this frame
pub fn process_pending_actions(
    ctx: &egui::Context,
    session: &mut EditorSession,
    ui_state: &mut UiState,
) {
    let Some(action) = ui_state.pending_action.take() else {
        return;
    };

    match action {
        PendingAction::Undo => {
            session.undo();
        }
        PendingAction::ExportClipboard => match session.export_json() {
            Ok(json) => {
                let document = session.export_document();
                ctx.copy_text(json);
                info!(
                    "Exported map: {} objects, {} collisions, {} portals",
                    document.objects.len(),
                    document.collisions.len(),
                    document.portals.len()
                );
                ui_state.notice = Some("Map JSON copied to the clipboard".to_string());
            }
            Err(e) => ui_state.error_message = Some(format!("Export failed: {e}")),
        },
        PendingAction::ExportFile => export_to_file(session, ui_state),
        PendingAction::OpenImport => {
            ui_state.import_text = Some(String::new());
        }
        PendingAction::ImportFile => import_from_file(session, ui_state),
        PendingAction::UploadImage => upload_image(session, ui_state),
        PendingAction::OpenCropper => {
            ui_state.cropper.open = true;
        }
    }
}

/// Apply pasted or loaded JSON, reporting failures to the user
pub fn import_text(session: &mut EditorSession, ui_state: &mut UiState, text: &str) -> bool {
    match session.import_json(text) {
        Ok(()) => {
            info!(
                "Imported map with {} objects and {} assets",
                session.state().objects.len(),
                session.assets().len()
            );
            ui_state.notice = Some("Map imported".to_string());
            true
        }
        Err(e) => {
            warn!("Import rejected: {e}");
            ui_state.error_message = Some(format!("Import failed: {e}"));
            false
        }
    }
}

/// Add a picked image file to the library
pub fn add_image_file(session: &mut EditorSession, ui_state: &mut UiState, path: &std::path::Path) {
    let upload = match upload_from_path(path) {
        Ok(upload) => upload,
        Err(e @ AssetUploadError::Decode { .. }) => {
            warn!("{e}; adding it with a placeholder");
            ui_state.notice = Some(format!("{e}. A placeholder is shown instead."));
            placeholder_upload(path)
        }
        Err(e) => {
            warn!("{e}");
            ui_state.error_message = Some(e.to_string());
            return;
        }
    };
    let id = session.add_uploaded_asset(upload.source, upload.name, upload.width, upload.height);
    session.select_asset(&id);
}

#[cfg(feature = "native")]
fn upload_image(session: &mut EditorSession, ui_state: &mut UiState) {
    if let Some(path) = rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
        .pick_file()
    {
        add_image_file(session, ui_state, &path);
    }
}

#[cfg(feature = "native")]
fn export_to_file(session: &mut EditorSession, ui_state: &mut UiState) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Map", &["json"])
        .set_file_name("village.map.json")
        .save_file()
    else {
        return;
    };
    let result = session
        .export_json()
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
    match result {
        Ok(()) => {
            info!("Exported map to {}", path.display());
            ui_state.notice = Some(format!("Saved {}", path.display()));
        }
        Err(e) => {
            error!("Failed to write {}: {e}", path.display());
            ui_state.error_message = Some(format!("Export failed: {e}"));
        }
    }
}

#[cfg(feature = "native")]
fn import_from_file(session: &mut EditorSession, ui_state: &mut UiState) {
    let Some(path) = rfd::FileDialog::new().add_filter("Map", &["json"]).pick_file() else {
        return;
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            import_text(session, ui_state, &text);
        }
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            ui_state.error_message = Some(format!("Import failed: {e}"));
        }
    }
}

#[cfg(not(feature = "native"))]
fn upload_image(_session: &mut EditorSession, ui_state: &mut UiState) {
    ui_state.notice = Some("File dialogs are not available in this build".to_string());
}

#[cfg(not(feature = "native"))]
fn export_to_file(_session: &mut EditorSession, ui_state: &mut UiState) {
    ui_state.notice = Some("File dialogs are not available in this build".to_string());
}

#[cfg(not(feature = "native"))]
fn import_from_file(_session: &mut EditorSession, ui_state: &mut UiState) {
    ui_state.notice = Some("File dialogs are not available in this build".to_string());
}

/// Scatter copies of an asset with an entropy-seeded generator
pub fn scatter(session: &mut EditorSession, asset_id: &str, count: i64) -> usize {
    let mut rng = SmallRng::from_entropy();
    session.distribute_randomly(asset_id, count, &mut rng)
}
