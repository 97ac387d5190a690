//! World spawning and teardown
//!
//! A [`SpawnWorld`] request loads the map document through the asset server,
//! derives a [`WorldLayout`] and spawns every sprite, obstacle and portal along
//! with the player and the wandering agents. Everything spawned carries
//! [`HubEntity`], so [`DespawnWorld`] removes the whole world as a unit.

use crate::agents::spawn_agent;
use crate::camera::focus_camera;
use crate::layout::{Obstacle, ObstacleKind, PortalZone, SpriteSpec, WorldLayout};
use crate::player::spawn_player;
use crate::portal::PortalSensor;
use crate::settings::RuntimeSettings;
use crate::tuning::{BUILDING_SCALE, DEPTH_TO_Z};
use avian2d::prelude::*;
use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::sprite::Anchor;
use village_core::constants::depth;
use village_core::{MapDocument, PixelRect};

/// Thickness of the invisible walls around the world edge
const EDGE_THICKNESS: f32 = 32.0;

/// Marker for every entity owned by the spawned world
#[derive(Component, Debug, Default)]
pub struct HubEntity;

/// Marker component for static obstacle entities
#[derive(Component, Debug)]
pub struct MapCollider {
    pub kind: ObstacleKind,
}

/// Size of the loaded world in map pixels
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

/// Request to build the world, optionally returning from a portal target
#[derive(Message, Debug, Clone, Default)]
pub struct SpawnWorld {
    pub return_from: Option<String>,
}

/// Request to remove every world entity
#[derive(Message, Debug, Clone, Default)]
pub struct DespawnWorld;

/// Sent once the world has been spawned
#[derive(Message, Debug, Clone)]
pub struct WorldSpawned {
    pub spawn: Vec2,
}

#[derive(Resource, Default)]
struct WorldLoad {
    document: Option<Handle<MapDocument>>,
    pending: Option<SpawnWorld>,
}

/// Map pixel position (y down) to world position (y up)
pub fn to_world(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, -y)
}

/// Map draw depth to a z translation
pub fn depth_to_z(depth: f32) -> f32 {
    depth * DEPTH_TO_Z
}

fn rect_center_world(rect: &PixelRect) -> Vec2 {
    let (cx, cy) = rect.center();
    to_world(cx, cy)
}

fn request_world(
    mut requests: MessageReader<SpawnWorld>,
    asset_server: Res<AssetServer>,
    settings: Res<RuntimeSettings>,
    mut load: ResMut<WorldLoad>,
) {
    for request in requests.read() {
        if load.document.is_none() {
            load.document = Some(asset_server.load(settings.map_path.clone()));
        }
        load.pending = Some(request.clone());
    }
}

fn spawn_world_when_ready(
    mut commands: Commands,
    mut load: ResMut<WorldLoad>,
    asset_server: Res<AssetServer>,
    documents: Res<Assets<MapDocument>>,
    settings: Res<RuntimeSettings>,
    mut cameras: Query<(&mut Transform, &mut Projection), With<Camera2d>>,
    mut spawned: MessageWriter<WorldSpawned>,
) {
    let Some(request) = load.pending.as_ref() else {
        return;
    };
    let Some(handle) = load.document.as_ref() else {
        return;
    };

    let document = if let Some(document) = documents.get(handle) {
        document.clone()
    } else if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle.id()) {
        warn!(
            "Map document '{}' unavailable ({}), using the default world",
            settings.map_path, error
        );
        MapDocument::default_world()
    } else {
        // still loading
        return;
    };

    let layout = WorldLayout::from_document(&document, request.return_from.as_deref());
    for reason in &layout.skipped {
        warn!("Skipped {}", reason);
    }

    spawn_layout(&mut commands, &asset_server, &settings, &layout);

    let spawn = to_world(layout.spawn.0, layout.spawn.1);
    focus_camera(&mut cameras, spawn, settings.camera_zoom);
    info!(
        "World loaded: {}x{} px, {} sprites, {} obstacles, {} portals",
        layout.width,
        layout.height,
        layout.sprites.len(),
        layout.obstacles.len(),
        layout.portals.len()
    );

    load.pending = None;
    spawned.write(WorldSpawned { spawn });
}

/// Spawn every entity described by a layout
pub fn spawn_layout(
    commands: &mut Commands,
    asset_server: &AssetServer,
    settings: &RuntimeSettings,
    layout: &WorldLayout,
) {
    commands.insert_resource(WorldBounds {
        width: layout.width,
        height: layout.height,
    });

    for spec in layout.background.iter().chain(layout.sprites.iter()) {
        spawn_sprite(commands, asset_server, settings, spec);
    }

    for obstacle in &layout.obstacles {
        spawn_obstacle(commands, obstacle);
    }
    for edge in edge_walls(layout.width, layout.height) {
        spawn_obstacle(
            commands,
            &Obstacle {
                rect: edge,
                kind: ObstacleKind::WorldEdge,
            },
        );
    }

    for portal in &layout.portals {
        spawn_portal(commands, asset_server, settings, portal);
    }

    let (x, y) = layout.spawn;
    spawn_player(commands, asset_server.load(settings.player_sheet.clone()), x, y);

    let agent_sheet: Handle<Image> = asset_server.load(settings.agent_sheet.clone());
    for &(ax, ay) in layout.agent_spawns.iter().take(settings.agent_count) {
        spawn_agent(commands, agent_sheet.clone(), ax, ay);
    }
}

/// Walls just outside each world edge, in map pixels
pub fn edge_walls(width: f32, height: f32) -> [PixelRect; 4] {
    let t = EDGE_THICKNESS;
    [
        PixelRect::new(-t, -t, width + 2.0 * t, t),
        PixelRect::new(-t, height, width + 2.0 * t, t),
        PixelRect::new(-t, 0.0, t, height),
        PixelRect::new(width, 0.0, t, height),
    ]
}

fn spawn_sprite(
    commands: &mut Commands,
    asset_server: &AssetServer,
    settings: &RuntimeSettings,
    spec: &SpriteSpec,
) {
    let crop = spec.crop;
    let position = to_world(spec.x, spec.y);
    commands.spawn((
        HubEntity,
        Sprite {
            image: asset_server.load(settings.sprite_path(&spec.source)),
            rect: Some(Rect::new(crop.x, crop.y, crop.x + crop.w, crop.y + crop.h)),
            ..default()
        },
        Anchor::TOP_LEFT,
        Transform::from_xyz(position.x, position.y, depth_to_z(spec.depth))
            .with_scale(Vec3::new(spec.scale, spec.scale, 1.0)),
    ));
}

fn spawn_obstacle(commands: &mut Commands, obstacle: &Obstacle) {
    let center = rect_center_world(&obstacle.rect);
    commands.spawn((
        HubEntity,
        MapCollider {
            kind: obstacle.kind,
        },
        RigidBody::Static,
        Collider::rectangle(obstacle.rect.w, obstacle.rect.h),
        Transform::from_xyz(center.x, center.y, 0.0),
    ));
}

fn spawn_portal(
    commands: &mut Commands,
    asset_server: &AssetServer,
    settings: &RuntimeSettings,
    portal: &PortalZone,
) {
    let center = rect_center_world(&portal.rect);
    commands.spawn((
        Name::new(format!("Portal {}", portal.name)),
        HubEntity,
        PortalSensor {
            name: portal.name.clone(),
            target: portal.target.clone(),
        },
        RigidBody::Static,
        Sensor,
        Collider::rectangle(portal.rect.w, portal.rect.h),
        CollidingEntities::default(),
        Transform::from_xyz(center.x, center.y, 0.0),
    ));

    let marker_color = if portal.is_known() {
        Color::srgba(0.0, 1.0, 0.0, 0.15)
    } else {
        Color::srgba(1.0, 1.0, 1.0, 0.15)
    };
    let marker_center = rect_center_world(&portal.marker);
    commands.spawn((
        HubEntity,
        Sprite::from_color(marker_color, Vec2::new(portal.marker.w, portal.marker.h)),
        Transform::from_xyz(
            marker_center.x,
            marker_center.y,
            depth_to_z(depth::PORTAL_MARKER),
        ),
    ));

    if let Some(building) = &portal.building {
        let position = to_world(building.x, building.y);
        commands.spawn((
            HubEntity,
            Sprite::from_image(asset_server.load(settings.building_path(building.image))),
            // image origin at 50% width, 80% height from the top
            Anchor(Vec2::new(0.0, -0.3)),
            Transform::from_xyz(position.x, position.y, depth_to_z(building.depth))
                .with_scale(Vec3::splat(BUILDING_SCALE)),
        ));
    }
}

fn despawn_world(
    mut requests: MessageReader<DespawnWorld>,
    mut commands: Commands,
    entities: Query<Entity, With<HubEntity>>,
    mut load: ResMut<WorldLoad>,
) {
    if requests.read().last().is_none() {
        return;
    }

    let mut count = 0;
    for entity in entities.iter() {
        commands.entity(entity).despawn();
        count += 1;
    }
    load.pending = None;
    commands.remove_resource::<WorldBounds>();
    debug!("Despawned {} world entities", count);
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldLoad>()
            .add_message::<SpawnWorld>()
            .add_message::<DespawnWorld>()
            .add_message::<WorldSpawned>()
            .add_systems(
                Update,
                (despawn_world, request_world, spawn_world_when_ready).chain(),
            );
    }
}
