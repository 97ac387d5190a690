//! Sprite cropper selection
//!
//! The source sheet is shown magnified; pointer positions arrive in displayed
//! pixels relative to the sheet's top-left corner and are snapped down to the
//! crop grid in sheet pixels.

use village_core::constants::CROP_GRID;
use village_core::{short_id, AssetCategory, AssetDefinition};

/// Magnification of the sheet inside the cropper window
pub const CROP_ZOOM: f32 = 2.0;

/// Sheets shipped with the shared sprite library
pub const SOURCE_SHEETS: &[&str] = &[
    "Characters/Basic Charakter Actions.png",
    "Characters/Basic Charakter Spritesheet.png",
    "Characters/Free Chicken Sprites.png",
    "Characters/Free Cow Sprites.png",
    "Objects/Basic Furniture.png",
    "Objects/Basic Grass Biom things.png",
    "Objects/Basic Grass Biom things 1.png",
    "Objects/Basic_Furniture.png",
    "Objects/Basic_Grass_Biom_things.png",
    "Objects/Basic Plants.png",
    "Objects/Basic_Plants.png",
    "Objects/Basic tools and meterials.png",
    "Objects/Basic_tools_and_meterials.png",
    "Objects/Chest.png",
    "Objects/Egg_item.png",
    "Objects/Free_Chicken_House.png",
    "Objects/Paths.png",
    "Objects/Wood_Bridge.png",
    "Tilesets/Grass.png",
    "Tilesets/Hills.png",
    "Tilesets/Tilled Dirt.png",
    "Tilesets/Water.png",
    "Tilesets/Wooden House.png",
    "Tilesets/Doors.png",
    "Tilesets/Fences.png",
];

/// Sheet preselected when the cropper opens for the first time
pub const DEFAULT_SHEET: &str = "Objects/Basic Grass Biom things.png";

/// Why a crop could not be turned into an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CropError {
    #[error("Asset name is required")]
    MissingName,
}

/// Snap a displayed coordinate to the crop grid in sheet pixels
pub fn snap_to_grid(displayed: f32) -> i32 {
    let sheet = (displayed / CROP_ZOOM).floor() as i32;
    sheet.div_euclid(CROP_GRID) * CROP_GRID
}

/// Rectangle being dragged over a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CropSelection {
    pub source: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    selecting: bool,
}

impl Default for CropSelection {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET)
    }
}

impl CropSelection {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            x: 0,
            y: 0,
            w: CROP_GRID,
            h: CROP_GRID,
            selecting: false,
        }
    }

    /// Switch sheets, resetting the selection
    pub fn set_source(&mut self, source: impl Into<String>) {
        *self = Self::new(source);
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Start a one-cell selection at the pointer
    pub fn begin(&mut self, displayed_x: f32, displayed_y: f32) {
        self.x = snap_to_grid(displayed_x);
        self.y = snap_to_grid(displayed_y);
        self.w = CROP_GRID;
        self.h = CROP_GRID;
        self.selecting = true;
    }

    /// Grow the selection to include the cell under the pointer
    pub fn drag(&mut self, displayed_x: f32, displayed_y: f32) {
        if !self.selecting {
            return;
        }
        let cur_x = snap_to_grid(displayed_x);
        let cur_y = snap_to_grid(displayed_y);
        self.w = (cur_x - self.x + CROP_GRID).max(CROP_GRID);
        self.h = (cur_y - self.y + CROP_GRID).max(CROP_GRID);
    }

    pub fn end(&mut self) {
        self.selecting = false;
    }

    /// Create an asset from the current selection
    pub fn commit(&self, name: &str) -> Result<AssetDefinition, CropError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CropError::MissingName);
        }
        let category = AssetCategory::infer_from_name(name);
        Ok(AssetDefinition::new(
            short_id("c_"),
            self.source.clone(),
            self.x,
            self.y,
            self.w,
            self.h,
            name,
        )
        .with_category(category))
    }
}
