//! Tile-space map model edited by the session
//!
//! Everything here is addressed in whole tiles. Pixel units only appear when
//! the map is exported (see [`exchange`]).

pub mod exchange;

use village_core::constants::SCALE;
use village_core::{short_id, AssetDefinition};

pub use exchange::{export_document, import_document, ImportError};

/// Global map parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub tiles_w: i32,
    pub tiles_h: i32,
    pub spawn_tx: i32,
    pub spawn_ty: i32,
    /// Asset tiled across the map background
    pub border_asset_id: Option<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tiles_w: 32,
            tiles_h: 32,
            spawn_tx: 16,
            spawn_ty: 16,
            border_asset_id: None,
        }
    }
}

/// An asset instance placed on a tile
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: String,
    pub asset_id: String,
    pub tx: i32,
    pub ty: i32,
    /// Display scale; `None` means the global render scale
    pub scale: Option<f32>,
    pub is_above_player: bool,
}

impl PlacedObject {
    /// Place `asset` at a tile with the asset's current scale baked in
    pub fn of_asset(asset: &AssetDefinition, tx: i32, ty: i32) -> Self {
        Self {
            id: short_id(""),
            asset_id: asset.id.clone(),
            tx,
            ty,
            scale: Some(SCALE as f32 * asset.effective_scale()),
            is_above_player: false,
        }
    }

    pub fn display_scale(&self) -> f32 {
        self.scale.unwrap_or(SCALE as f32)
    }
}

/// A single blocked tile
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionCell {
    pub id: String,
    pub tx: i32,
    pub ty: i32,
}

impl CollisionCell {
    pub fn new(tx: i32, ty: i32) -> Self {
        Self {
            id: short_id(""),
            tx,
            ty,
        }
    }
}

/// A named zone leading to another view
#[derive(Debug, Clone, PartialEq)]
pub struct PortalDefinition {
    pub id: String,
    pub name: String,
    pub tx: i32,
    pub ty: i32,
    pub tw: i32,
    pub th: i32,
    pub target: String,
    /// Hex color such as `#6366f1`
    pub color: String,
}

impl PortalDefinition {
    fn new(id: &str, name: &str, target: &str, tx: i32, ty: i32, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tx,
            ty,
            tw: 2,
            th: 2,
            target: target.to_string(),
            color: color.to_string(),
        }
    }
}

/// The undoable part of the editor session.
///
/// The asset catalog is deliberately not part of this snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapState {
    pub objects: Vec<PlacedObject>,
    pub collisions: Vec<CollisionCell>,
    pub portals: Vec<PortalDefinition>,
    pub config: MapConfig,
}

impl MapState {
    /// Empty 32x32 map with the three standard portals
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            collisions: Vec::new(),
            portals: default_portals(),
            config: MapConfig::default(),
        }
    }

    pub fn in_bounds(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && tx < self.config.tiles_w && ty < self.config.tiles_h
    }

    pub fn collision_at(&self, tx: i32, ty: i32) -> Option<usize> {
        self.collisions
            .iter()
            .position(|c| c.tx == tx && c.ty == ty)
    }

    pub fn objects_at(&self, tx: i32, ty: i32) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter().filter(move |o| o.tx == tx && o.ty == ty)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn portal_for_target(&self, target: &str) -> Option<&PortalDefinition> {
        self.portals.iter().find(|p| p.target == target)
    }

    pub fn portal_for_target_mut(&mut self, target: &str) -> Option<&mut PortalDefinition> {
        self.portals.iter_mut().find(|p| p.target == target)
    }
}

/// Built-in starter catalog
pub fn starter_assets() -> Vec<AssetDefinition> {
    vec![
        AssetDefinition::new(
            "tree_1",
            "Objects/Basic Grass Biom things.png",
            16,
            0,
            32,
            32,
            "Green Tree",
        ),
        AssetDefinition::new(
            "house_1",
            "Tilesets/Wooden House.png",
            0,
            0,
            80,
            80,
            "Village House",
        ),
        AssetDefinition::new(
            "rock_1",
            "Objects/Basic Grass Biom things.png",
            96,
            16,
            16,
            16,
            "Small Rock",
        ),
    ]
}

/// One portal per content view
pub fn default_portals() -> Vec<PortalDefinition> {
    vec![
        PortalDefinition::new("p1", "PROJECTS", "PORTFOLIO", 10, 8, "#6366f1"),
        PortalDefinition::new("p2", "SOCIAL", "SOCIAL", 20, 15, "#ec4899"),
        PortalDefinition::new("p3", "GALLERY", "GALLERY", 8, 20, "#14b8a6"),
    ]
}
