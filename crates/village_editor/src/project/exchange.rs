//! Conversion between the tile-space session model and the pixel-space map document

use super::{CollisionCell, MapConfig, MapState, PlacedObject, PortalDefinition};
use std::collections::HashSet;
use thiserror::Error;
use village_core::constants::{DISPLAY_TILE, SCALE};
use village_core::{
    pixel_to_tile, short_id, tile_center_pixel, tile_to_pixel, AssetDefinition, CollisionDoc,
    DocumentError, MapConfigDoc, MapDocument, PlacedObjectDoc, PortalDoc,
};

/// Why an import was rejected
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import is empty")]
    Empty,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Denormalize the session into a document
pub fn export_document(state: &MapState, assets: &[AssetDefinition]) -> MapDocument {
    let config = &state.config;
    let (width, height) = tile_to_pixel(config.tiles_w, config.tiles_h);
    let (spawn_x, spawn_y) = tile_center_pixel(config.spawn_tx, config.spawn_ty);

    let objects = state
        .objects
        .iter()
        .map(|object| {
            let asset = assets.iter().find(|a| a.id == object.asset_id);
            let (x, y) = tile_to_pixel(object.tx, object.ty);
            PlacedObjectDoc {
                id: object.id.clone(),
                asset_id: object.asset_id.clone(),
                x,
                y,
                scale: object.display_scale(),
                w: asset.map(|a| a.w),
                h: asset.map(|a| a.h),
                is_above_player: object.is_above_player,
                tx: Some(object.tx),
                ty: Some(object.ty),
            }
        })
        .collect();

    let collisions = state
        .collisions
        .iter()
        .map(|cell| {
            let (x, y) = tile_to_pixel(cell.tx, cell.ty);
            CollisionDoc {
                id: cell.id.clone(),
                x,
                y,
                w: DISPLAY_TILE,
                h: DISPLAY_TILE,
            }
        })
        .collect();

    let portals = state
        .portals
        .iter()
        .map(|portal| {
            let (x, y) = tile_to_pixel(portal.tx, portal.ty);
            let (w, h) = tile_to_pixel(portal.tw, portal.th);
            PortalDoc {
                id: portal.id.clone(),
                name: portal.name.clone(),
                x,
                y,
                w,
                h,
                target: portal.target.clone(),
                color: portal.color.clone(),
            }
        })
        .collect();

    MapDocument {
        map_config: MapConfigDoc {
            width,
            height,
            spawn_x,
            spawn_y,
            scale: SCALE,
            border_asset_id: config.border_asset_id.clone(),
        },
        assets: assets.to_vec(),
        objects,
        collisions,
        portals,
    }
}

fn tile_of(x: i32, y: i32) -> (i32, i32) {
    pixel_to_tile(x as f32, y as f32)
}

fn keep_or_new_id(id: &str) -> String {
    if id.is_empty() {
        short_id("")
    } else {
        id.to_string()
    }
}

/// Renormalize a document back into tile space.
///
/// Returns the map state and the asset catalog that should replace the
/// current one. Duplicate collision cells collapse into one.
pub fn import_document(document: &MapDocument) -> (MapState, Vec<AssetDefinition>) {
    let doc_config = &document.map_config;
    let (spawn_tx, spawn_ty) = tile_of(doc_config.spawn_x, doc_config.spawn_y);
    let config = MapConfig {
        tiles_w: (doc_config.width / DISPLAY_TILE).max(1),
        tiles_h: (doc_config.height / DISPLAY_TILE).max(1),
        spawn_tx,
        spawn_ty,
        border_asset_id: doc_config
            .border_asset_id
            .clone()
            .filter(|id| !id.is_empty()),
    };

    let objects = document
        .objects
        .iter()
        .map(|object| {
            let (tx, ty) = tile_of(object.x, object.y);
            PlacedObject {
                id: keep_or_new_id(&object.id),
                asset_id: object.asset_id.clone(),
                tx,
                ty,
                scale: Some(object.scale),
                is_above_player: object.is_above_player,
            }
        })
        .collect();

    let mut occupied = HashSet::new();
    let collisions = document
        .collisions
        .iter()
        .filter_map(|cell| {
            let (tx, ty) = tile_of(cell.x, cell.y);
            occupied.insert((tx, ty)).then(|| CollisionCell {
                id: keep_or_new_id(&cell.id),
                tx,
                ty,
            })
        })
        .collect();

    let portals = document
        .portals
        .iter()
        .map(|portal| {
            let (tx, ty) = tile_of(portal.x, portal.y);
            let tiles = |pixels: i32| match pixels / DISPLAY_TILE {
                n if n > 0 => n,
                _ => 1,
            };
            PortalDefinition {
                id: keep_or_new_id(&portal.id),
                name: portal.name.clone(),
                tx,
                ty,
                tw: tiles(portal.w),
                th: tiles(portal.h),
                target: portal.target.clone(),
                color: portal.color.clone(),
            }
        })
        .collect();

    (
        MapState {
            objects,
            collisions,
            portals,
            config,
        },
        document.assets.clone(),
    )
}

/// Parse pasted text strictly; nothing is returned unless the whole input is valid
pub fn parse_import(text: &str) -> Result<(MapState, Vec<AssetDefinition>), ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    let document = MapDocument::from_json(text)?;
    Ok(import_document(&document))
}
