//! Reading and writing the preferences file

use std::path::{Path, PathBuf};

use bevy::log::{debug, warn};
use directories::ProjectDirs;
use thiserror::Error;

use super::EditorPreferences;

const PREFERENCES_FILE: &str = "preferences.toml";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("No config directory available on this platform")]
    NoConfigDir,
    #[error("Preferences I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to parse preferences: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// Platform config directory for the editor
pub fn config_dir() -> Result<PathBuf, PreferencesError> {
    ProjectDirs::from("", "", "village_editor")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(PreferencesError::NoConfigDir)
}

pub fn preferences_path() -> Result<PathBuf, PreferencesError> {
    Ok(config_dir()?.join(PREFERENCES_FILE))
}

impl EditorPreferences {
    /// Load from the config directory, falling back to defaults
    pub fn load() -> Self {
        let path = match preferences_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}; using default preferences");
                return Self::default();
            }
        };
        match Self::load_from(&path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Ignoring preferences at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// `Ok(None)` when the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>, PreferencesError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&text)?))
    }

    /// Save to the config directory
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = preferences_path()?;
        self.save_to(&path)?;
        debug!("Saved preferences to {}", path.display());
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Tool;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("village_editor_prefs_{tag}_{}", std::process::id()))
            .join(PREFERENCES_FILE)
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("roundtrip");
        let mut prefs = EditorPreferences::default();
        prefs.show_collisions = false;
        prefs.default_tool = Tool::Collision;
        prefs.window_x = Some(10);
        prefs.window_y = Some(20);

        prefs.save_to(&path).unwrap();
        let loaded = EditorPreferences::load_from(&path).unwrap();
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(loaded, Some(prefs));
    }

    #[test]
    fn test_missing_file() {
        let path = temp_path("missing");
        assert!(EditorPreferences::load_from(&path).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "show_grid = \"sometimes\"").unwrap();
        let result = EditorPreferences::load_from(&path);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
        assert!(matches!(result, Err(PreferencesError::Deserialize(_))));
    }
}
