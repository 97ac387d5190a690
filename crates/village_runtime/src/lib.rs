//! village_runtime - Playable world for pixel village maps
//!
//! This crate turns a map document written by the village editor into a
//! walkable world: cropped sprites layered by depth, static obstacles, portal
//! zones with their buildings, a physics-driven player and a couple of
//! wandering agents.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use village_runtime::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins.set(ImagePlugin::default_nearest()))
//!         .add_plugins(VillageRuntimePlugin)
//!         .insert_resource(RuntimeSettings::load(SETTINGS_FILE.as_ref()))
//!         .add_systems(Startup, |mut commands: Commands, mut spawn: MessageWriter<SpawnWorld>| {
//!             commands.spawn(Camera2d);
//!             spawn.write(SpawnWorld::default());
//!         })
//!         .run();
//! }
//! ```

pub mod agents;
pub mod animation;
pub mod camera;
pub mod joystick;
pub mod layout;
pub mod loader;
pub mod player;
pub mod portal;
pub mod settings;
pub mod tuning;
pub mod world;

use avian2d::prelude::*;
use bevy::prelude::*;
use village_core::MapDocument;

pub use agents::{AgentPlugin, WanderingAgent};
pub use animation::{AnimatedSprite, AnimationClip, SheetGrid, SpriteAnimationPlugin};
pub use camera::CameraFollowPlugin;
pub use joystick::{JoystickPlugin, JoystickState};
pub use layout::WorldLayout;
pub use loader::{MapDocumentLoader, MapLoadError};
pub use player::{ControlsEnabled, Player, PlayerPlugin};
pub use portal::{PortalEntered, PortalPlugin, PortalSensor, PortalTransition};
pub use settings::{RuntimeSettings, SettingsError, SETTINGS_FILE};
pub use world::{DespawnWorld, HubEntity, SpawnWorld, WorldBounds, WorldPlugin, WorldSpawned};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        ControlsEnabled, DespawnWorld, HubEntity, Player, PortalEntered, RuntimeSettings,
        SpawnWorld, VillageRuntimePlugin, WorldSpawned, SETTINGS_FILE,
    };
}

/// Plugin bundle for the playable world
///
/// Adds zero-gravity 2D physics, the map document asset loader and every
/// gameplay plugin. [`RuntimeSettings`] falls back to its defaults when the
/// app does not insert one.
pub struct VillageRuntimePlugin;

impl Plugin for VillageRuntimePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default())
            .insert_resource(Gravity(Vec2::ZERO))
            .init_resource::<RuntimeSettings>()
            .init_asset::<MapDocument>()
            .init_asset_loader::<MapDocumentLoader>()
            .add_plugins((
                SpriteAnimationPlugin,
                JoystickPlugin,
                PlayerPlugin,
                AgentPlugin,
                PortalPlugin,
                CameraFollowPlugin,
                WorldPlugin,
            ));
    }
}
