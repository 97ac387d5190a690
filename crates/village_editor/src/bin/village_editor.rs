//! Standalone village map editor binary
//!
//! Run with: cargo run -p village_editor

use bevy::asset::{AssetPlugin, UnapprovedPathMode};
use bevy::ecs::message::MessageReader;
use bevy::image::{ImageFilterMode, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::window::{
    MonitorSelection, VideoModeSelection, WindowMode, WindowMoved, WindowPosition, WindowResized,
    WindowResolution,
};
use village_editor::preferences::EditorPreferences;
use village_editor::tools::ViewportInputState;
use village_editor::EditorPlugin;

fn main() {
    // Load preferences early to get saved window size
    let preferences = EditorPreferences::load();
    let window_width = preferences.window_width.unwrap_or(1600.0) as u32;
    let window_height = preferences.window_height.unwrap_or(900.0) as u32;

    let window_position = match (preferences.window_x, preferences.window_y) {
        (Some(x), Some(y)) => WindowPosition::At(IVec2::new(x, y)),
        _ => WindowPosition::Automatic,
    };

    let window_mode = match preferences.window_mode.as_deref() {
        Some("borderless_fullscreen") => {
            WindowMode::BorderlessFullscreen(MonitorSelection::Current)
        }
        Some("fullscreen") => {
            WindowMode::Fullscreen(MonitorSelection::Current, VideoModeSelection::Current)
        }
        _ => WindowMode::Windowed,
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Village Map Editor".to_string(),
                        resolution: WindowResolution::new(window_width, window_height)
                            .with_scale_factor_override(1.0),
                        position: window_position,
                        mode: window_mode,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin {
                    // Pixel art stays crisp when zoomed
                    default_sampler: ImageSamplerDescriptor {
                        mag_filter: ImageFilterMode::Nearest,
                        min_filter: ImageFilterMode::Nearest,
                        mipmap_filter: ImageFilterMode::Nearest,
                        ..default()
                    },
                })
                .set(AssetPlugin {
                    // Uploaded images live anywhere on disk
                    unapproved_path_mode: UnapprovedPathMode::Allow,
                    ..default()
                }),
        )
        .insert_resource(preferences)
        .add_plugins(EditorPlugin)
        .add_systems(Update, save_window_state_on_change)
        .add_systems(Last, save_window_state_on_exit)
        .run();
}

/// Copy the window's size, position and mode into the preferences
fn record_window_state(window: &Window, preferences: &mut EditorPreferences) {
    preferences.window_width = Some(window.resolution.width());
    preferences.window_height = Some(window.resolution.height());
    if let WindowPosition::At(pos) = window.position {
        preferences.window_x = Some(pos.x);
        preferences.window_y = Some(pos.y);
    }
    preferences.window_mode = Some(match window.mode {
        WindowMode::BorderlessFullscreen(_) => "borderless_fullscreen".to_string(),
        WindowMode::Fullscreen(_, _) => "fullscreen".to_string(),
        _ => "windowed".to_string(),
    });
}

/// Save window state to preferences whenever the window is moved or resized
fn save_window_state_on_change(
    mut moved_events: MessageReader<WindowMoved>,
    mut resized_events: MessageReader<WindowResized>,
    windows: Query<&Window>,
    mut preferences: ResMut<EditorPreferences>,
) {
    let has_moved = moved_events.read().last().is_some();
    let has_resized = resized_events.read().last().is_some();

    if !has_moved && !has_resized {
        return;
    }

    if let Ok(window) = windows.single() {
        record_window_state(window, &mut preferences);
        if let Err(e) = preferences.save() {
            error!("Failed to save window state to preferences: {}", e);
        }
    }
}

/// Save window state and zoom when the app exits
fn save_window_state_on_exit(
    mut exit_events: MessageReader<AppExit>,
    windows: Query<&Window>,
    viewport: Res<ViewportInputState>,
    mut preferences: ResMut<EditorPreferences>,
) {
    if exit_events.read().next().is_none() {
        return;
    }
    if let Ok(window) = windows.single() {
        record_window_state(window, &mut preferences);
    }
    preferences.zoom = viewport.zoom;
    if let Err(e) = preferences.save() {
        error!("Failed to save preferences on exit: {}", e);
    }
}
