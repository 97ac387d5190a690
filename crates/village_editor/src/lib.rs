//! village_editor - Map editor for the pixel village
//!
//! This crate provides the editor used to author the village map:
//! - Sprite placement from an asset library, with rectangle fill
//! - Collision painting, portal and spawn positioning
//! - Bounded undo
//! - Sprite cropping and image upload
//! - JSON export/import compatible with the runtime loader
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use village_editor::EditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin)
//!         .run();
//! }
//! ```

pub mod commands;
pub mod cropper;
pub mod library;
pub mod preferences;
pub mod project;
pub mod render;
pub mod session;
pub mod tools;
pub mod ui;

#[cfg(test)]
mod testing;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub use commands::handle_keyboard_shortcuts;
pub use preferences::EditorPreferences;
pub use session::{EditorSession, TileRect, Tool};

use render::MapRenderPlugin;
use tools::EditorToolsPlugin;
use ui::EditorUiPlugin;

/// Main editor plugin
pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        // The binary inserts preferences early for the window; load them here otherwise
        if !app.world().contains_resource::<EditorPreferences>() {
            app.insert_resource(EditorPreferences::load());
        }

        app.add_plugins(EguiPlugin::default())
            .add_plugins(EditorUiPlugin)
            .add_plugins(MapRenderPlugin)
            .add_plugins(EditorToolsPlugin)
            .init_resource::<EditorSession>()
            .add_systems(Startup, setup_editor_camera)
            .add_systems(Update, handle_keyboard_shortcuts);
    }
}

/// Spawns the editor camera if one doesn't exist
fn setup_editor_camera(mut commands: Commands, camera_query: Query<&Camera2d>) {
    if camera_query.is_empty() {
        commands.spawn(Camera2d);
    }
}
