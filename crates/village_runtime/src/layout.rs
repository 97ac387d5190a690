//! World layout derivation
//!
//! Turns a [`MapDocument`] into plain sprite, obstacle and portal descriptions in
//! map pixel space (y grows downward). Nothing here touches the ECS, so the whole
//! load procedure can be tested without an `App`.

use crate::tuning::{
    AGENT_SPAWN_OFFSETS, BUILDING_LIFT, KNOWN_MARKER_HEIGHT_RATIO, KNOWN_MARKER_WIDTH_RATIO,
};
use village_core::constants::{
    depth, COLLISION_Y_OFFSET, DISPLAY_TILE, PORTAL_WALL_HEIGHT_RATIO, PORTAL_WALL_WIDTH_RATIO,
    RETURN_SPAWN_MARGIN,
};
use village_core::{derive_hitbox, AssetDefinition, MapDocument, PixelRect};

/// A sprite cropped from a shared sheet, anchored at its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSpec {
    pub source: String,
    pub crop: PixelRect,
    /// Top-left corner in map pixels
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Derived from a water or solid sprite
    Hitbox,
    /// Painted collision cell
    Cell,
    /// Side wall next to a building entrance
    PortalWall,
    /// Invisible wall just outside the world rectangle
    WorldEdge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub rect: PixelRect,
    pub kind: ObstacleKind,
}

/// Building image drawn above a known portal
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSpec {
    pub image: &'static str,
    /// Anchor point in map pixels
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortalZone {
    pub name: String,
    pub target: String,
    pub rect: PixelRect,
    pub building: Option<BuildingSpec>,
    /// Translucent highlight drawn at [`depth::PORTAL_MARKER`]
    pub marker: PixelRect,
}

impl PortalZone {
    pub fn is_known(&self) -> bool {
        self.building.is_some()
    }
}

/// Everything the runtime spawns for one map document
#[derive(Debug, Clone, PartialEq)]
pub struct WorldLayout {
    pub width: f32,
    pub height: f32,
    pub background: Vec<SpriteSpec>,
    pub sprites: Vec<SpriteSpec>,
    pub obstacles: Vec<Obstacle>,
    pub portals: Vec<PortalZone>,
    pub spawn: (f32, f32),
    pub agent_spawns: Vec<(f32, f32)>,
    /// Human-readable reasons for every object dropped during derivation
    pub skipped: Vec<String>,
}

/// Building image for a known portal name
pub fn building_for_portal(name: &str) -> Option<&'static str> {
    match name {
        "PROJECTS" | "PROJELER" => Some("projects.png"),
        "SOCIAL" | "SOSYAL" => Some("social.png"),
        "GALLERY" | "GALERİ" => Some("gallery.png"),
        _ => None,
    }
}

/// Player spawn point in map pixels.
///
/// When the player returns from a portal target that still exists on the map,
/// they appear just below that portal instead of at the configured spawn.
pub fn resolve_spawn(document: &MapDocument, return_from: Option<&str>) -> (f32, f32) {
    let config = &document.map_config;
    let portal = return_from.and_then(|target| document.portals.iter().find(|p| p.target == target));

    match portal {
        Some(p) => (
            p.x as f32 + p.w as f32 / 2.0,
            p.y as f32 + p.h as f32 + RETURN_SPAWN_MARGIN,
        ),
        None => (config.spawn_x as f32, config.spawn_y as f32),
    }
}

impl WorldLayout {
    pub fn from_document(document: &MapDocument, return_from: Option<&str>) -> Self {
        let config = &document.map_config;
        let spawn = resolve_spawn(document, return_from);

        let mut layout = Self {
            width: config.width as f32,
            height: config.height as f32,
            background: Vec::new(),
            sprites: Vec::new(),
            obstacles: Vec::new(),
            portals: Vec::new(),
            spawn,
            agent_spawns: AGENT_SPAWN_OFFSETS
                .iter()
                .map(|(dx, dy)| (spawn.0 + dx, spawn.1 + dy))
                .collect(),
            skipped: Vec::new(),
        };

        layout.add_water_background(document);
        layout.add_objects(document);
        layout.add_collision_cells(document);
        layout.add_portals(document);
        layout
    }

    fn add_water_background(&mut self, document: &MapDocument) {
        let Some(water) = document
            .assets
            .iter()
            .find(|a| a.name.to_lowercase().contains("water") && a.is_sheet_asset())
        else {
            return;
        };

        let scale = document.map_config.scale.max(1);
        let step = village_core::constants::TILE_SIZE * scale;
        let tiles_x = (document.map_config.width + step - 1) / step;
        let tiles_y = (document.map_config.height + step - 1) / step;

        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                self.background.push(SpriteSpec {
                    source: water.source.clone(),
                    crop: water.crop_rect(),
                    x: (tx * step) as f32,
                    y: (ty * step) as f32,
                    scale: scale as f32,
                    depth: depth::WATER,
                });
            }
        }
    }

    fn add_objects(&mut self, document: &MapDocument) {
        for object in &document.objects {
            let Some(asset) = document.asset(&object.asset_id) else {
                self.skipped.push(format!(
                    "object '{}' references missing asset '{}'",
                    object.id, object.asset_id
                ));
                continue;
            };
            if !asset.is_sheet_asset() {
                self.skipped.push(format!(
                    "object '{}' uses embedded asset '{}'",
                    object.id, asset.id
                ));
                continue;
            }

            let w = object.w.unwrap_or(asset.w) as f32;
            let h = object.h.unwrap_or(asset.h) as f32;
            let bounds = PixelRect::new(
                object.x as f32,
                object.y as f32,
                w * object.scale,
                h * object.scale,
            );

            let category = asset.category();
            let depth = if object.is_above_player {
                depth::ABOVE_PLAYER
            } else {
                category.depth(bounds.bottom())
            };

            self.sprites.push(sprite_for(asset, bounds, object.scale, depth));

            if let Some(hitbox) = derive_hitbox(category, bounds) {
                self.obstacles.push(Obstacle {
                    rect: hitbox,
                    kind: ObstacleKind::Hitbox,
                });
            }
        }
    }

    fn add_collision_cells(&mut self, document: &MapDocument) {
        for cell in &document.collisions {
            if cell.w <= 0 || cell.h <= 0 {
                self.skipped
                    .push(format!("collision '{}' has a non-positive size", cell.id));
                continue;
            }
            self.obstacles.push(Obstacle {
                rect: PixelRect::new(
                    cell.x as f32,
                    cell.y as f32 + COLLISION_Y_OFFSET,
                    cell.w as f32,
                    cell.h as f32,
                ),
                kind: ObstacleKind::Cell,
            });
        }
    }

    fn add_portals(&mut self, document: &MapDocument) {
        for portal in &document.portals {
            let w = (if portal.w > 0 { portal.w } else { DISPLAY_TILE }) as f32;
            let h = (if portal.h > 0 { portal.h } else { DISPLAY_TILE }) as f32;
            let rect = PixelRect::new(portal.x as f32, portal.y as f32, w, h);
            let (cx, cy) = rect.center();

            let building = building_for_portal(&portal.name).map(|image| BuildingSpec {
                image,
                x: cx,
                y: cy - BUILDING_LIFT,
                depth: rect.bottom() + depth::BUILDING_BONUS,
            });

            let marker = if building.is_some() {
                let wall_w = w * PORTAL_WALL_WIDTH_RATIO;
                let wall_h = h * PORTAL_WALL_HEIGHT_RATIO;
                for wall_x in [rect.x, rect.x + w - wall_w] {
                    self.obstacles.push(Obstacle {
                        rect: PixelRect::new(wall_x, rect.y, wall_w, wall_h),
                        kind: ObstacleKind::PortalWall,
                    });
                }
                PixelRect::from_center(
                    cx,
                    cy,
                    w * KNOWN_MARKER_WIDTH_RATIO,
                    h * KNOWN_MARKER_HEIGHT_RATIO,
                )
            } else {
                rect
            };

            self.portals.push(PortalZone {
                name: portal.name.clone(),
                target: portal.target.clone(),
                rect,
                building,
                marker,
            });
        }
    }
}

fn sprite_for(asset: &AssetDefinition, bounds: PixelRect, scale: f32, depth: f32) -> SpriteSpec {
    SpriteSpec {
        source: asset.source.clone(),
        crop: asset.crop_rect(),
        x: bounds.x,
        y: bounds.y,
        scale,
        depth,
    }
}
