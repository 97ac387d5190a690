//! Sprite catalog entries

use crate::geometry::PixelRect;
use crate::layering::AssetCategory;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a short random identifier with the given prefix (e.g. `c_` for cropped assets)
pub fn short_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &simple[..9])
}

/// An entry in the sprite catalog.
///
/// Sheet assets reference a crop region inside a shared sprite sheet. Uploaded
/// (custom) assets cover their whole image and are rendered at native resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDefinition {
    pub id: String,
    /// Sheet path relative to the sprite library, a file path, or a `data:` URI
    pub source: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,
    /// Uniform scale multiplier applied on top of the global render scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// Layering category; inferred from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<AssetCategory>,
}

impl AssetDefinition {
    /// Create a sheet asset cropped from `source`
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            x,
            y,
            w,
            h,
            name: name.into(),
            is_custom: false,
            scale: None,
            category: None,
        }
    }

    /// Create a user-uploaded asset covering the whole image
    pub fn uploaded(
        id: impl Into<String>,
        source: impl Into<String>,
        w: i32,
        h: i32,
        name: impl Into<String>,
    ) -> Self {
        let mut asset = Self::new(id, source, 0, 0, w, h, name);
        asset.is_custom = true;
        asset.scale = Some(1.0);
        asset
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_category(mut self, category: AssetCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Scale multiplier, 1 when unset
    pub fn effective_scale(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    /// Explicit category, falling back to name inference
    pub fn category(&self) -> AssetCategory {
        self.category
            .unwrap_or_else(|| AssetCategory::infer_from_name(&self.name))
    }

    /// Whether the image data lives inside the document rather than on disk
    pub fn is_embedded(&self) -> bool {
        self.source.starts_with("data:") || self.source.starts_with("blob:")
    }

    /// Whether the runtime can render this asset from the shared sprite library
    pub fn is_sheet_asset(&self) -> bool {
        !self.is_custom && !self.is_embedded()
    }

    /// Crop region within the source image
    pub fn crop_rect(&self) -> PixelRect {
        PixelRect::new(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }

    pub fn has_valid_size(&self) -> bool {
        self.w > 0 && self.h > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        let id = short_id("c_");
        assert!(id.starts_with("c_"));
        assert_eq!(id.len(), 11);
        assert_ne!(short_id("c_"), short_id("c_"));
    }

    #[test]
    fn test_uploaded_asset() {
        let asset = AssetDefinition::uploaded("custom_1", "/tmp/cat.png", 64, 40, "cat.png");
        assert!(asset.is_custom);
        assert!(!asset.is_sheet_asset());
        assert_eq!(asset.effective_scale(), 1.0);
        assert_eq!(asset.crop_rect(), PixelRect::new(0.0, 0.0, 64.0, 40.0));
    }

    #[test]
    fn test_embedded_source() {
        let mut asset = AssetDefinition::new("a", "data:image/png;base64,AAAA", 0, 0, 16, 16, "a");
        assert!(asset.is_embedded());
        assert!(!asset.is_sheet_asset());

        asset.source = "Objects/Basic Plants.png".to_string();
        assert!(asset.is_sheet_asset());
    }

    #[test]
    fn test_category_fallback() {
        let asset = AssetDefinition::new("w", "Tilesets/Water.png", 0, 0, 16, 16, "Water Tile");
        assert_eq!(asset.category(), AssetCategory::Water);

        let asset = asset.with_category(AssetCategory::Default);
        assert_eq!(asset.category(), AssetCategory::Default);
    }

    #[test]
    fn test_serde_optional_fields() {
        let json = r#"{"id":"tree_1","source":"Objects/Basic Grass Biom things.png","x":16,"y":0,"w":32,"h":32,"name":"Green Tree"}"#;
        let asset: AssetDefinition = serde_json::from_str(json).unwrap();
        assert!(!asset.is_custom);
        assert_eq!(asset.scale, None);

        let out = serde_json::to_string(&asset).unwrap();
        assert!(!out.contains("isCustom"));
        assert!(!out.contains("category"));
    }
}
