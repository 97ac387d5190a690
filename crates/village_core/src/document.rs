//! Map document interchange format
//!
//! All spatial fields are absolute display pixels. Tile coordinates are an
//! editor-side convenience converted through [`crate::geometry`].

use crate::asset::AssetDefinition;
use crate::constants::{DISPLAY_TILE, SCALE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors produced while reading a map document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid map size {width}x{height}")]
    InvalidMapSize { width: i32, height: i32 },
    #[error("Asset '{0}' has a non-positive size")]
    InvalidAssetSize(String),
    #[error("Duplicate asset id '{0}'")]
    DuplicateAssetId(String),
}

fn default_scale() -> i32 {
    SCALE
}

fn default_object_scale() -> f32 {
    SCALE as f32
}

fn default_cell() -> i32 {
    DISPLAY_TILE
}

/// Global map parameters, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfigDoc {
    pub width: i32,
    pub height: i32,
    pub spawn_x: i32,
    pub spawn_y: i32,
    #[serde(default = "default_scale")]
    pub scale: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_asset_id: Option<String>,
}

/// A placed sprite instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedObjectDoc {
    #[serde(default)]
    pub id: String,
    pub asset_id: String,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_object_scale")]
    pub scale: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(default)]
    pub is_above_player: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<i32>,
}

/// A blocked cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionDoc {
    #[serde(default)]
    pub id: String,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_cell")]
    pub w: i32,
    #[serde(default = "default_cell")]
    pub h: i32,
}

/// A named transition zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalDoc {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub w: i32,
    #[serde(default)]
    pub h: i32,
    pub target: String,
    #[serde(default)]
    pub color: String,
}

/// The whole map, exchanged between the editor and the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy::asset::Asset, bevy::reflect::TypePath))]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub map_config: MapConfigDoc,
    #[serde(default)]
    pub assets: Vec<AssetDefinition>,
    #[serde(default)]
    pub objects: Vec<PlacedObjectDoc>,
    #[serde(default)]
    pub collisions: Vec<CollisionDoc>,
    #[serde(default)]
    pub portals: Vec<PortalDoc>,
}

/// An entry dropped by [`MapDocument::from_json_lenient`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub section: &'static str,
    pub index: usize,
    pub reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    map_config: MapConfigDoc,
    #[serde(default)]
    assets: Vec<serde_json::Value>,
    #[serde(default)]
    objects: Vec<serde_json::Value>,
    #[serde(default)]
    collisions: Vec<serde_json::Value>,
    #[serde(default)]
    portals: Vec<serde_json::Value>,
}

fn parse_entries<T: DeserializeOwned>(
    section: &'static str,
    values: Vec<serde_json::Value>,
    skipped: &mut Vec<SkippedEntry>,
) -> Vec<T> {
    let mut entries = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(entry) => entries.push(entry),
            Err(e) => skipped.push(SkippedEntry {
                section,
                index,
                reason: e.to_string(),
            }),
        }
    }
    entries
}

impl MapDocument {
    /// Parse and validate a document. Any malformed entry rejects the whole input.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: MapDocument = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    /// Parse a document, dropping malformed entries individually.
    ///
    /// Only a missing or invalid `mapConfig` is fatal.
    pub fn from_json_lenient(bytes: &[u8]) -> Result<(Self, Vec<SkippedEntry>), DocumentError> {
        let raw: RawDocument = serde_json::from_slice(bytes)?;
        let mut skipped = Vec::new();

        let mut seen = HashSet::new();
        let mut assets = Vec::with_capacity(raw.assets.len());
        for (index, value) in raw.assets.into_iter().enumerate() {
            let reason = match serde_json::from_value::<AssetDefinition>(value) {
                Err(e) => e.to_string(),
                Ok(asset) if !asset.has_valid_size() => format!("non-positive size ({})", asset.id),
                Ok(asset) if !seen.insert(asset.id.clone()) => format!("duplicate id ({})", asset.id),
                Ok(asset) => {
                    assets.push(asset);
                    continue;
                }
            };
            skipped.push(SkippedEntry {
                section: "assets",
                index,
                reason,
            });
        }

        let document = MapDocument {
            map_config: raw.map_config,
            assets,
            objects: parse_entries("objects", raw.objects, &mut skipped),
            collisions: parse_entries("collisions", raw.collisions, &mut skipped),
            portals: parse_entries("portals", raw.portals, &mut skipped),
        };
        document.validate_config()?;

        Ok((document, skipped))
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Minimal world used when no document is available
    pub fn default_world() -> Self {
        Self {
            map_config: MapConfigDoc {
                width: 1200,
                height: 1200,
                spawn_x: 600,
                spawn_y: 600,
                scale: SCALE,
                border_asset_id: None,
            },
            assets: Vec::new(),
            objects: Vec::new(),
            collisions: Vec::new(),
            portals: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        self.validate_config()?;

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if !asset.has_valid_size() {
                return Err(DocumentError::InvalidAssetSize(asset.id.clone()));
            }
            if !seen.insert(asset.id.as_str()) {
                return Err(DocumentError::DuplicateAssetId(asset.id.clone()));
            }
        }
        Ok(())
    }

    fn validate_config(&self) -> Result<(), DocumentError> {
        let config = &self.map_config;
        if config.width <= 0 || config.height <= 0 {
            return Err(DocumentError::InvalidMapSize {
                width: config.width,
                height: config.height,
            });
        }
        Ok(())
    }

    pub fn asset(&self, id: &str) -> Option<&AssetDefinition> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Width and height in whole tiles
    pub fn size_in_tiles(&self) -> (i32, i32) {
        (
            self.map_config.width / DISPLAY_TILE,
            self.map_config.height / DISPLAY_TILE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "mapConfig": { "width": 1536, "height": 1536, "spawnX": 792, "spawnY": 792, "scale": 3 },
        "assets": [
            { "id": "tree_1", "source": "Objects/Basic Grass Biom things.png", "x": 16, "y": 0, "w": 32, "h": 32, "name": "Green Tree" }
        ],
        "objects": [
            { "id": "o1", "assetId": "tree_1", "x": 240, "y": 240, "scale": 3, "w": 32, "h": 32, "isAbovePlayer": false }
        ],
        "collisions": [ { "id": "c1", "x": 144, "y": 144, "w": 48, "h": 48 } ],
        "portals": [
            { "id": "p1", "name": "PROJECTS", "x": 480, "y": 384, "w": 96, "h": 96, "target": "PORTFOLIO", "color": "#6366f1" }
        ]
    }"##;

    #[test]
    fn test_from_json() {
        let doc = MapDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.map_config.width, 1536);
        assert_eq!(doc.size_in_tiles(), (32, 32));
        assert_eq!(doc.objects[0].x, 240);
        assert_eq!(doc.objects[0].scale, 3.0);
        assert_eq!(doc.collisions[0].w, 48);
        assert_eq!(doc.portals[0].target, "PORTFOLIO");
        assert!(doc.asset("tree_1").is_some());
        assert!(doc.asset("missing").is_none());
    }

    #[test]
    fn test_missing_optional_fields_get_defaults() {
        let json = r#"{
            "mapConfig": { "width": 480, "height": 480, "spawnX": 0, "spawnY": 0 },
            "objects": [ { "assetId": "a", "x": 0, "y": 0 } ],
            "collisions": [ { "x": 48, "y": 48 } ]
        }"#;
        let doc = MapDocument::from_json(json).unwrap();
        assert_eq!(doc.map_config.scale, 3);
        assert_eq!(doc.objects[0].scale, 3.0);
        assert!(!doc.objects[0].is_above_player);
        assert_eq!(doc.collisions[0].h, 48);
        assert!(doc.portals.is_empty());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            MapDocument::from_json("not json"),
            Err(DocumentError::Json(_))
        ));
        assert!(MapDocument::from_json(r#"{"assets": []}"#).is_err());

        let zero = r#"{"mapConfig": {"width": 0, "height": 480, "spawnX": 0, "spawnY": 0}}"#;
        assert!(matches!(
            MapDocument::from_json(zero),
            Err(DocumentError::InvalidMapSize { .. })
        ));

        let dup = r#"{"mapConfig": {"width": 48, "height": 48, "spawnX": 0, "spawnY": 0},
            "assets": [
                {"id": "a", "source": "s.png", "x": 0, "y": 0, "w": 16, "h": 16, "name": "a"},
                {"id": "a", "source": "s.png", "x": 0, "y": 0, "w": 16, "h": 16, "name": "b"}
            ]}"#;
        assert!(matches!(
            MapDocument::from_json(dup),
            Err(DocumentError::DuplicateAssetId(_))
        ));
    }

    #[test]
    fn test_lenient_skips_bad_entries() {
        let json = r#"{
            "mapConfig": { "width": 480, "height": 480, "spawnX": 24, "spawnY": 24 },
            "assets": [
                {"id": "a", "source": "s.png", "x": 0, "y": 0, "w": 16, "h": 16, "name": "a"},
                {"id": "b", "source": "s.png", "x": 0, "y": 0, "w": 0, "h": 16, "name": "b"}
            ],
            "objects": [ { "assetId": "a", "x": 0, "y": 0 }, { "x": "oops" } ],
            "collisions": [ { "x": 48, "y": 48 }, 12 ],
            "portals": [ { "name": "X", "x": 0, "y": 0, "target": "T" } ]
        }"#;
        let (doc, skipped) = MapDocument::from_json_lenient(json.as_bytes()).unwrap();
        assert_eq!(doc.assets.len(), 1);
        assert_eq!(doc.objects.len(), 1);
        assert_eq!(doc.collisions.len(), 1);
        assert_eq!(doc.portals.len(), 1);
        assert_eq!(skipped.len(), 3);
        assert!(skipped.iter().any(|s| s.section == "objects" && s.index == 1));
    }

    #[test]
    fn test_lenient_reports_asset_index_in_input() {
        let json = r#"{
            "mapConfig": { "width": 480, "height": 480, "spawnX": 24, "spawnY": 24 },
            "assets": [
                {"id": 7},
                {"id": "a", "source": "s.png", "x": 0, "y": 0, "w": 16, "h": 16, "name": "a"},
                {"id": "a", "source": "s.png", "x": 0, "y": 0, "w": 16, "h": 16, "name": "a"}
            ]
        }"#;
        let (doc, skipped) = MapDocument::from_json_lenient(json.as_bytes()).unwrap();
        assert_eq!(doc.assets.len(), 1);

        let indices: Vec<usize> = skipped
            .iter()
            .filter(|s| s.section == "assets")
            .map(|s| s.index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(skipped[1].reason.starts_with("duplicate id"));
    }

    #[test]
    fn test_to_json_pretty_round_trip() {
        let doc = MapDocument::from_json(SAMPLE).unwrap();
        let json = doc.to_json_pretty().unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"isAbovePlayer\": false"));
        assert!(!json.contains("borderAssetId"));
        assert_eq!(MapDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_default_world() {
        let doc = MapDocument::default_world();
        assert_eq!(doc.map_config.width, 1200);
        assert_eq!(doc.map_config.height, 1200);
        assert_eq!((doc.map_config.spawn_x, doc.map_config.spawn_y), (600, 600));
        assert!(doc.validate().is_ok());
    }
}
