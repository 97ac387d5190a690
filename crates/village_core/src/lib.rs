//! Core data structures for pixel village
//!
//! This crate provides the types shared by the map editor and the world runtime:
//! - `geometry` - Tile/pixel conversion through the single display tile constant
//! - `AssetDefinition` - Sprite catalog entries (crop region within a sheet)
//! - `AssetCategory` - Layering category driving draw depth and derived hitboxes
//! - `MapDocument` - The JSON interchange format written by the editor and read by the runtime

pub mod constants;
mod asset;
mod document;
pub mod geometry;
mod layering;

pub use asset::{short_id, AssetDefinition};
pub use document::{
    CollisionDoc, DocumentError, MapConfigDoc, MapDocument, PlacedObjectDoc, PortalDoc,
    SkippedEntry,
};
pub use geometry::{display_tile_size, pixel_to_tile, tile_center_pixel, tile_to_pixel, PixelRect};
pub use layering::{derive_hitbox, AssetCategory};
