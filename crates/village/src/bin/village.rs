//! Pixel village game binary
//!
//! Run with: cargo run -p village

use std::path::Path;

use bevy::prelude::*;
use village::prelude::*;

fn main() {
    let settings = RuntimeSettings::load(Path::new(SETTINGS_FILE));

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Pixel Village".to_string(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .insert_resource(settings)
        .add_plugins((VillageRuntimePlugin, VillageAppPlugin))
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
