//! Runtime settings loaded from `village.toml`

use crate::tuning::{AGENT_COUNT, CAMERA_ZOOM};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default settings file, looked up in the working directory
pub const SETTINGS_FILE: &str = "village.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Paths and tunables that vary per deployment
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Map document, relative to the asset root
    pub map_path: String,
    /// Player animation sheet (48x48 frames)
    pub player_sheet: String,
    /// Wandering agent animation sheet (16x16 frames)
    pub agent_sheet: String,
    /// Directory holding the shared sprite sheets referenced by asset sources
    pub sprite_root: String,
    /// Directory holding portal building images
    pub building_root: String,
    pub agent_count: usize,
    pub camera_zoom: f32,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            map_path: "maps/village.map.json".to_string(),
            player_sheet: "sprites/player.png".to_string(),
            agent_sheet: "sprites/chicken.png".to_string(),
            sprite_root: "sprout-lands".to_string(),
            building_root: "buildings".to_string(),
            agent_count: AGENT_COUNT,
            camera_zoom: CAMERA_ZOOM,
        }
    }
}

impl RuntimeSettings {
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(settings) => {
                info!("Loaded runtime settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Ignoring {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Asset path of a sprite sheet referenced by an asset definition
    pub fn sprite_path(&self, source: &str) -> String {
        join_asset_path(&self.sprite_root, source)
    }

    pub fn building_path(&self, image: &str) -> String {
        join_asset_path(&self.building_root, image)
    }
}

fn join_asset_path(root: &str, file: &str) -> String {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", root, file.trim_start_matches('/'))
    }
}
