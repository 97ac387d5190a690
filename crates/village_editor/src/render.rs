//! Map canvas rendering
//!
//! The canvas is rebuilt from the session whenever its revision changes. Map
//! pixels are y-down; the canvas places tile (tx, ty) at world (tx * 48, -ty * 48).

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::sprite::Anchor;
use std::collections::HashMap;
use village_core::constants::{depth, DISPLAY_TILE, SCALE};
use village_core::{AssetCategory, AssetDefinition};

use crate::library::{embedded_image, placeholder_image};
use crate::preferences::EditorPreferences;
use crate::project::PlacedObject;
use crate::session::{EditorSession, TileRect, Tool};
use crate::tools::HoveredTile;
use crate::ui::UiState;

const TILE: f32 = DISPLAY_TILE as f32;

const GROUND_COLOR: Color = Color::srgb(0.369, 0.616, 0.204);
const GRID_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.1);
const COLLISION_COLOR: Color = Color::srgba(0.937, 0.267, 0.267, 0.4);
const SPAWN_COLOR: Color = Color::srgb(0.98, 0.8, 0.08);
const FILL_COLOR: Color = Color::srgb(0.506, 0.549, 0.973);

// Canvas layers
const Z_GROUND: f32 = -20.0;
const Z_BORDER: f32 = -10.0;
const Z_COLLISIONS: f32 = 5.0;
const Z_PORTALS: f32 = 6.0;
const Z_SPAWN: f32 = 7.0;

/// Marker for every entity making up the map canvas
#[derive(Component)]
pub struct CanvasEntity;

/// Parse a hex color string like "#ff0000" or "#ff000080" (with alpha)
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color::srgb_u8(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::srgba_u8(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}

/// Canvas stacking order of a placed object: above-player on top, ground cover beneath, else by row
pub fn editor_draw_order(object: &PlacedObject, asset: &AssetDefinition) -> f32 {
    if object.is_above_player {
        depth::EDITOR_ABOVE_PLAYER
    } else if asset.category() == AssetCategory::FloorDecoration {
        -1.0
    } else {
        object.ty as f32
    }
}

fn draw_order_to_z(order: f32) -> f32 {
    order * 0.004
}

/// Top-left corner of a tile in world space
pub fn tile_origin(tx: i32, ty: i32) -> Vec2 {
    Vec2::new(tx as f32 * TILE, -(ty as f32) * TILE)
}

/// Center of a tile rectangle in world space
fn tiles_center(tx: i32, ty: i32, tw: i32, th: i32) -> Vec2 {
    tile_origin(tx, ty) + Vec2::new(tw as f32 * TILE, -(th as f32) * TILE) / 2.0
}

/// Asset path the editor loads an asset's image from, `None` for embedded data
pub fn asset_image_path(asset: &AssetDefinition, prefs: &EditorPreferences) -> Option<String> {
    if asset.is_embedded() {
        None
    } else if asset.is_custom {
        Some(asset.source.clone())
    } else {
        Some(prefs.sheet_path(&asset.source))
    }
}

struct CachedImage {
    handle: Handle<Image>,
    placeholder: bool,
    name: String,
}

/// Loaded textures by asset path, with generated placeholders for failures
#[derive(Resource, Default)]
pub struct ImageCache {
    images: HashMap<String, CachedImage>,
    /// Bumped whenever an image is replaced by a placeholder
    generation: u64,
}

impl ImageCache {
    /// Handle for an asset's image and whether it is a placeholder
    pub fn image_for(
        &mut self,
        asset: &AssetDefinition,
        prefs: &EditorPreferences,
        asset_server: &AssetServer,
        images: &mut Assets<Image>,
    ) -> (Handle<Image>, bool) {
        let key = asset_image_path(asset, prefs).unwrap_or_else(|| format!("embedded:{}", asset.id));
        let cached = self.images.entry(key.clone()).or_insert_with(|| {
            if asset.is_embedded() {
                match embedded_image(&asset.source) {
                    Ok(image) => CachedImage {
                        handle: images.add(image),
                        placeholder: false,
                        name: asset.name.clone(),
                    },
                    Err(e) => {
                        warn!("Could not show {}: {e}; using a placeholder", asset.name);
                        CachedImage {
                            handle: images.add(placeholder_image(&asset.name)),
                            placeholder: true,
                            name: asset.name.clone(),
                        }
                    }
                }
            } else {
                CachedImage {
                    handle: asset_server.load(key),
                    placeholder: false,
                    name: asset.name.clone(),
                }
            }
        });
        (cached.handle.clone(), cached.placeholder)
    }

    /// Handle for a whole sheet of the sprite library (cropper)
    pub fn sheet(&mut self, path: &str, asset_server: &AssetServer) -> Handle<Image> {
        self.images
            .entry(path.to_string())
            .or_insert_with(|| CachedImage {
                handle: asset_server.load(path.to_string()),
                placeholder: false,
                name: path.to_string(),
            })
            .handle
            .clone()
    }

    pub fn is_placeholder(&self, path: &str) -> bool {
        self.images.get(path).is_some_and(|c| c.placeholder)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Swap images that failed to load for generated placeholders
fn swap_failed_images(
    mut cache: ResMut<ImageCache>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
) {
    let mut swapped = 0;
    for (path, cached) in cache.images.iter_mut().filter(|(_, c)| !c.placeholder) {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(cached.handle.id()) {
            warn!("Could not load image {path}: {err}; using a placeholder");
            cached.handle = images.add(placeholder_image(&cached.name));
            cached.placeholder = true;
            swapped += 1;
        }
    }
    if swapped > 0 {
        cache.generation += 1;
    }
}

#[derive(PartialEq, Clone, Copy)]
struct CanvasKey {
    revision: u64,
    show_collisions: bool,
    images: u64,
}

fn spawn_asset_sprite(
    commands: &mut Commands,
    asset: &AssetDefinition,
    image: (Handle<Image>, bool),
    size: Vec2,
    origin: Vec2,
    z: f32,
) {
    let (handle, placeholder) = image;
    // custom images and placeholders cover their whole texture
    let rect = (!placeholder && !asset.is_custom).then(|| {
        Rect::new(
            asset.x as f32,
            asset.y as f32,
            (asset.x + asset.w) as f32,
            (asset.y + asset.h) as f32,
        )
    });
    commands.spawn((
        CanvasEntity,
        Sprite {
            image: handle,
            rect,
            custom_size: Some(size),
            ..default()
        },
        Anchor::TOP_LEFT,
        Transform::from_xyz(origin.x, origin.y, z),
    ));
}

#[allow(clippy::too_many_arguments)]
fn rebuild_canvas(
    mut commands: Commands,
    session: Res<EditorSession>,
    ui_state: Res<UiState>,
    prefs: Res<EditorPreferences>,
    mut cache: ResMut<ImageCache>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    existing: Query<Entity, With<CanvasEntity>>,
    mut last: Local<Option<CanvasKey>>,
) {
    let key = CanvasKey {
        revision: session.revision(),
        show_collisions: ui_state.show_collisions,
        images: cache.generation(),
    };
    if *last == Some(key) {
        return;
    }
    *last = Some(key);

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let state = session.state();
    let config = &state.config;
    let map_size = Vec2::new(config.tiles_w as f32 * TILE, config.tiles_h as f32 * TILE);

    commands.spawn((
        CanvasEntity,
        Sprite::from_color(GROUND_COLOR, map_size),
        Anchor::TOP_LEFT,
        Transform::from_xyz(0.0, 0.0, Z_GROUND),
    ));

    // Background tiled from the border asset at the render scale
    if let Some(border) = config
        .border_asset_id
        .as_deref()
        .and_then(|id| session.asset(id))
        .filter(|a| a.has_valid_size())
    {
        let image = cache.image_for(border, &prefs, &asset_server, &mut images);
        let step = Vec2::new(border.w as f32, border.h as f32) * SCALE as f32;
        let (cols, rows) = (
            (map_size.x / step.x).ceil() as i32,
            (map_size.y / step.y).ceil() as i32,
        );
        for row in 0..rows {
            for col in 0..cols {
                let origin = Vec2::new(col as f32 * step.x, -(row as f32) * step.y);
                spawn_asset_sprite(&mut commands, border, image.clone(), step, origin, Z_BORDER);
            }
        }
    }

    for object in &state.objects {
        let Some(asset) = session.asset(&object.asset_id) else {
            continue;
        };
        let image = cache.image_for(asset, &prefs, &asset_server, &mut images);
        let size = Vec2::new(asset.w as f32, asset.h as f32) * object.display_scale();
        let z = draw_order_to_z(editor_draw_order(object, asset));
        spawn_asset_sprite(
            &mut commands,
            asset,
            image,
            size,
            tile_origin(object.tx, object.ty),
            z,
        );
    }

    if ui_state.show_collisions {
        for cell in &state.collisions {
            let center = tiles_center(cell.tx, cell.ty, 1, 1);
            commands.spawn((
                CanvasEntity,
                Sprite::from_color(COLLISION_COLOR, Vec2::splat(TILE)),
                Transform::from_xyz(center.x, center.y, Z_COLLISIONS),
            ));
        }
    }

    for portal in &state.portals {
        let color = parse_hex_color(&portal.color)
            .unwrap_or(Color::WHITE)
            .with_alpha(0.4);
        let center = tiles_center(portal.tx, portal.ty, portal.tw, portal.th);
        commands
            .spawn((
                CanvasEntity,
                Sprite::from_color(
                    color,
                    Vec2::new(portal.tw as f32 * TILE, portal.th as f32 * TILE),
                ),
                Transform::from_xyz(center.x, center.y, Z_PORTALS),
            ))
            .with_child((
                Text2d::new(portal.name.clone()),
                TextFont::from_font_size(14.0),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
    }

    let spawn = tiles_center(config.spawn_tx, config.spawn_ty, 1, 1);
    commands.spawn((
        CanvasEntity,
        Sprite::from_color(SPAWN_COLOR, Vec2::splat(TILE * 0.5)),
        Transform::from_xyz(spawn.x, spawn.y, Z_SPAWN),
    ));
}

fn rect_outline(gizmos: &mut Gizmos, top_left: Vec2, size: Vec2, color: Color) {
    let center = top_left + Vec2::new(size.x, -size.y) / 2.0;
    gizmos.rect_2d(center, size, color);
}

/// Grid, fill preview and placement ghost
fn draw_overlays(
    mut gizmos: Gizmos,
    session: Res<EditorSession>,
    ui_state: Res<UiState>,
    hovered: Res<HoveredTile>,
) {
    let config = &session.state().config;
    let width = config.tiles_w as f32 * TILE;
    let height = config.tiles_h as f32 * TILE;

    if ui_state.show_grid {
        for tx in 0..=config.tiles_w {
            let x = tx as f32 * TILE;
            gizmos.line_2d(Vec2::new(x, 0.0), Vec2::new(x, -height), GRID_COLOR);
        }
        for ty in 0..=config.tiles_h {
            let y = -(ty as f32) * TILE;
            gizmos.line_2d(Vec2::new(0.0, y), Vec2::new(width, y), GRID_COLOR);
        }
    }

    let Some((tx, ty)) = hovered.tile.filter(|&(tx, ty)| session.state().in_bounds(tx, ty)) else {
        return;
    };

    if let Some(start) = session.fill_start() {
        let rect = TileRect::from_corners(start, (tx, ty));
        let size = Vec2::new(
            (rect.max.0 - rect.min.0 + 1) as f32,
            (rect.max.1 - rect.min.1 + 1) as f32,
        ) * TILE;
        rect_outline(&mut gizmos, tile_origin(rect.min.0, rect.min.1), size, FILL_COLOR);
        return;
    }

    match (session.tool(), session.selected_asset()) {
        (Tool::Place, Some(asset)) => {
            let size = Vec2::new(asset.w as f32, asset.h as f32)
                * SCALE as f32
                * asset.effective_scale();
            rect_outline(&mut gizmos, tile_origin(tx, ty), size, FILL_COLOR.with_alpha(0.6));
        }
        _ => {
            rect_outline(&mut gizmos, tile_origin(tx, ty), Vec2::splat(TILE), GRID_COLOR.with_alpha(0.5));
        }
    }
}

/// Plugin for drawing the map being edited
pub struct MapRenderPlugin;

impl Plugin for MapRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImageCache>().add_systems(
            Update,
            (swap_failed_images, rebuild_canvas, draw_overlays).chain(),
        );
    }
}
