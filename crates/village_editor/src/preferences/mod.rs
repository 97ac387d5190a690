//! Editor preferences and persistent settings
//!
//! Stored as TOML in the platform config directory:
//! - Windows: %APPDATA%/village_editor/
//! - Linux: ~/.config/village_editor/
//! - macOS: ~/Library/Application Support/village_editor/

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::cropper::DEFAULT_SHEET;
use crate::session::Tool;

/// Editor preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Version for future migrations
    pub version: u32,

    // Window state, recorded when the window moves or resizes
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
    pub window_x: Option<i32>,
    pub window_y: Option<i32>,
    /// "windowed", "fullscreen" or "borderless_fullscreen"
    pub window_mode: Option<String>,

    // View
    pub show_grid: bool,
    pub show_collisions: bool,
    pub zoom: f32,

    pub default_tool: Tool,

    /// Sheet the cropper opens with
    pub last_crop_sheet: String,
    /// Directory of the shared sprite library, relative to the asset root
    pub sprite_root: String,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            version: 1,
            window_width: None,
            window_height: None,
            window_x: None,
            window_y: None,
            window_mode: None,
            show_grid: true,
            show_collisions: true,
            zoom: 1.0,
            default_tool: Tool::Place,
            last_crop_sheet: DEFAULT_SHEET.to_string(),
            sprite_root: "sprout-lands".to_string(),
        }
    }
}

impl EditorPreferences {
    /// Asset path of a sheet inside the sprite library
    pub fn sheet_path(&self, source: &str) -> String {
        let root = self.sprite_root.trim_end_matches('/');
        if root.is_empty() {
            source.to_string()
        } else {
            format!("{root}/{source}")
        }
    }
}
