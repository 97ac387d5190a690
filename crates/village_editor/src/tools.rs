//! Editor tools - painting, pan/zoom
//!
//! Translates viewport input into session operations.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use village_core::pixel_to_tile;

use crate::preferences::EditorPreferences;
use crate::session::EditorSession;

const MIN_ZOOM: f32 = 0.25;
const MAX_ZOOM: f32 = 4.0;

/// Plugin for editor tools and viewport input
pub struct EditorToolsPlugin;

impl Plugin for EditorToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoveredTile>()
            .init_resource::<ViewportInputState>()
            .add_systems(Startup, restore_zoom)
            .add_systems(
                Update,
                (
                    track_hovered_tile,
                    handle_viewport_input,
                    handle_pan_input,
                    handle_zoom_input,
                    apply_camera_view,
                )
                    .chain(),
            );
    }
}

/// Tile under the cursor, if the cursor is over the window
#[derive(Resource, Default, Debug)]
pub struct HoveredTile {
    pub tile: Option<(i32, i32)>,
    /// Tile of the last click on the canvas, shown in the inspector
    pub last_clicked: Option<(i32, i32)>,
}

/// State for viewport input handling
#[derive(Resource, Debug)]
pub struct ViewportInputState {
    /// Whether we're currently panning
    pub is_panning: bool,
    /// Last cursor position for panning
    pub pan_last_pos: Option<Vec2>,
    pub zoom: f32,
    /// Camera center in world space
    pub camera_offset: Vec2,
}

impl Default for ViewportInputState {
    fn default() -> Self {
        Self {
            is_panning: false,
            pan_last_pos: None,
            zoom: 1.0,
            camera_offset: Vec2::new(768.0, -768.0),
        }
    }
}

impl ViewportInputState {
    /// Apply a scroll step; positive zooms in
    pub fn zoom_by(&mut self, scroll: f32) {
        self.zoom = (self.zoom * (1.0 + scroll * 0.1)).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Move the view by a cursor delta in window pixels
    pub fn pan_by(&mut self, cursor_delta: Vec2) {
        self.camera_offset.x -= cursor_delta.x / self.zoom;
        self.camera_offset.y += cursor_delta.y / self.zoom;
    }
}

fn restore_zoom(prefs: Res<EditorPreferences>, mut input_state: ResMut<ViewportInputState>) {
    if prefs.zoom.is_finite() {
        input_state.zoom = prefs.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// World position back to the tile grid (world y is map y negated)
pub fn world_to_tile(world: Vec2) -> (i32, i32) {
    pixel_to_tile(world.x, -world.y)
}

fn track_hovered_tile(
    mut hovered: ResMut<HoveredTile>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) {
    let tile = (|| {
        let window = windows.single().ok()?;
        let cursor = window.cursor_position()?;
        let (camera, transform) = camera_q.iter().next()?;
        let world = camera.viewport_to_world_2d(transform, cursor).ok()?;
        Some(world_to_tile(world))
    })();
    if hovered.tile != tile {
        hovered.tile = tile;
    }
}

fn handle_viewport_input(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    mut hovered: ResMut<HoveredTile>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
) {
    // Release ends the gesture wherever it happens
    if mouse_buttons.just_released(MouseButton::Left) {
        session.pointer_up();
        return;
    }

    // wants_pointer_input() is true over the whole central panel, so only
    // block while egui is actively using the pointer or it is over a panel.
    let Ok(ctx) = contexts.ctx_mut() else { return };
    if ctx.is_using_pointer() || ctx.is_pointer_over_area() {
        return;
    }

    let Some((tx, ty)) = hovered.tile else {
        return;
    };

    if mouse_buttons.just_pressed(MouseButton::Left) {
        hovered.last_clicked = Some((tx, ty));
        session.pointer_down(tx, ty);
    } else if mouse_buttons.pressed(MouseButton::Left) && session.is_pointer_held() {
        session.pointer_move(tx, ty);
    }
}

fn handle_pan_input(
    mut input_state: ResMut<ViewportInputState>,
    windows: Query<&Window>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
) {
    let Ok(window) = windows.single() else { return };
    let cursor = window.cursor_position();

    let panning =
        mouse_buttons.pressed(MouseButton::Middle) || mouse_buttons.pressed(MouseButton::Right);
    match (panning, cursor) {
        (true, Some(cursor)) => {
            if let Some(last) = input_state.pan_last_pos {
                input_state.pan_by(cursor - last);
            }
            input_state.is_panning = true;
            input_state.pan_last_pos = Some(cursor);
        }
        _ => {
            input_state.is_panning = false;
            input_state.pan_last_pos = None;
        }
    }
}

fn handle_zoom_input(
    mut contexts: EguiContexts,
    mut input_state: ResMut<ViewportInputState>,
    mut scroll: MessageReader<MouseWheel>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    // Side panels have scroll areas of their own
    let over_ui = ctx.is_using_pointer() || ctx.is_pointer_over_area();

    for event in scroll.read() {
        if !over_ui {
            input_state.zoom_by(event.y);
        }
    }
}

fn apply_camera_view(
    input_state: Res<ViewportInputState>,
    mut camera_q: Query<(&mut Transform, &mut Projection), With<Camera2d>>,
) {
    if !input_state.is_changed() {
        return;
    }
    for (mut transform, mut projection) in &mut camera_q {
        transform.translation.x = input_state.camera_offset.x;
        transform.translation.y = input_state.camera_offset.y;
        if let Projection::Orthographic(ortho) = projection.as_mut() {
            ortho.scale = 1.0 / input_state.zoom;
        }
    }
}
