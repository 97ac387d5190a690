//! Draw depth and derived collision geometry per asset category

use crate::constants::{depth, HITBOX_BOTTOM_MARGIN, HITBOX_HEIGHT_RATIO, HITBOX_WIDTH_RATIO};
use crate::geometry::PixelRect;
use serde::{Deserialize, Serialize};

/// Layering category of a sprite asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetCategory {
    /// Ground cover drawn beneath everything
    FloorDecoration,
    /// Drawn at the lowest depth and blocks movement
    Water,
    /// Y-sorted with the player
    Plant,
    /// Y-sorted but lifted above buildings
    HighPlant,
    /// Lifted above buildings like `HighPlant`, and blocks movement
    HighSolid,
    /// Y-sorted with a small bonus over the player, blocks movement
    Solid,
    #[default]
    Default,
}

const HIGH_SOLID_MARKERS: [&str; 1] = ["plant6"];
const HIGH_PLANT_MARKERS: [&str; 1] = ["plant2"];
const SOLID_PLANT_MARKERS: [&str; 4] = ["plant3", "plant4", "plant5", "plant13"];

impl AssetCategory {
    pub const ALL: [AssetCategory; 7] = [
        AssetCategory::FloorDecoration,
        AssetCategory::Water,
        AssetCategory::Plant,
        AssetCategory::HighPlant,
        AssetCategory::HighSolid,
        AssetCategory::Solid,
        AssetCategory::Default,
    ];

    /// Infer a category from legacy name markers (case-insensitive)
    pub fn infer_from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let has_plant = name.contains("plant");

        if name.contains("grass") && !has_plant {
            AssetCategory::FloorDecoration
        } else if name.contains("water") {
            AssetCategory::Water
        } else if HIGH_SOLID_MARKERS.iter().any(|m| name.contains(m)) {
            AssetCategory::HighSolid
        } else if HIGH_PLANT_MARKERS.iter().any(|m| name.contains(m)) {
            AssetCategory::HighPlant
        } else if SOLID_PLANT_MARKERS.iter().any(|m| name.contains(m)) {
            AssetCategory::Solid
        } else if has_plant {
            AssetCategory::Plant
        } else {
            AssetCategory::Default
        }
    }

    /// Draw depth for a sprite whose scaled bottom edge sits at `sprite_bottom`
    pub fn depth(self, sprite_bottom: f32) -> f32 {
        match self {
            AssetCategory::FloorDecoration => depth::FLOOR_DECORATION,
            AssetCategory::Water => depth::WATER,
            AssetCategory::HighPlant | AssetCategory::HighSolid => {
                sprite_bottom + depth::HIGH_PLANT_BONUS
            }
            AssetCategory::Solid => sprite_bottom + depth::SOLID_PLANT_BONUS,
            AssetCategory::Plant | AssetCategory::Default => sprite_bottom,
        }
    }

    pub fn blocks_movement(self) -> bool {
        matches!(
            self,
            AssetCategory::Water | AssetCategory::Solid | AssetCategory::HighSolid
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetCategory::FloorDecoration => "Floor decoration",
            AssetCategory::Water => "Water",
            AssetCategory::Plant => "Plant",
            AssetCategory::HighPlant => "High plant",
            AssetCategory::HighSolid => "High solid",
            AssetCategory::Solid => "Solid",
            AssetCategory::Default => "Default",
        }
    }
}

/// Derive the invisible obstacle for a sprite occupying `bounds` (scaled, map pixels).
///
/// Returns `None` for categories that do not block movement.
pub fn derive_hitbox(category: AssetCategory, bounds: PixelRect) -> Option<PixelRect> {
    if !category.blocks_movement() {
        return None;
    }

    let hit_w = bounds.w * HITBOX_WIDTH_RATIO;
    let hit_h = bounds.h * HITBOX_HEIGHT_RATIO;
    let center_x = bounds.x + bounds.w / 2.0;
    let center_y = bounds.bottom() - hit_h / 2.0 - HITBOX_BOTTOM_MARGIN;

    Some(PixelRect::from_center(center_x, center_y, hit_w, hit_h))
}
