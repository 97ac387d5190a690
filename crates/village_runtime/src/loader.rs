//! Asset loader for map documents
//!
//! This module provides a Bevy AssetLoader implementation for loading `.map.json` files
//! written by the village editor. Combined with the `hot-reload` feature, edits saved
//! from the editor show up the next time the world is spawned.

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::log::warn;
use thiserror::Error;
use village_core::{DocumentError, MapDocument};

/// Error type for map loading failures
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid map format: {0}")]
    InvalidFormat(String),
}

impl From<DocumentError> for MapLoadError {
    fn from(error: DocumentError) -> Self {
        match error {
            DocumentError::Json(e) => MapLoadError::Json(e),
            other => MapLoadError::InvalidFormat(other.to_string()),
        }
    }
}

/// Asset loader for MapDocument JSON files
///
/// Malformed entries are dropped one by one with a warning; only an unreadable
/// file or an invalid `mapConfig` fails the load.
#[derive(Default)]
pub struct MapDocumentLoader;

impl AssetLoader for MapDocumentLoader {
    type Asset = MapDocument;
    type Settings = ();
    type Error = MapLoadError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let (document, skipped) = parse_document(&bytes)?;
        for entry in &skipped {
            warn!(
                "{:?}: skipped {} entry #{}: {}",
                load_context.path(),
                entry.section,
                entry.index,
                entry.reason
            );
        }

        Ok(document)
    }

    fn extensions(&self) -> &[&str] {
        &["map.json"]
    }
}

/// Parse a map document leniently
pub fn parse_document(
    bytes: &[u8],
) -> Result<(MapDocument, Vec<village_core::SkippedEntry>), MapLoadError> {
    Ok(MapDocument::from_json_lenient(bytes)?)
}
