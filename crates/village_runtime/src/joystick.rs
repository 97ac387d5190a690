//! Virtual joystick for touch and pointer input
//!
//! A press in the bottom half of the window anchors the stick base where the
//! finger landed; dragging produces a vector clamped to [`JOYSTICK_RADIUS`].

use crate::tuning::JOYSTICK_RADIUS;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Current joystick reading in screen orientation (y down)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct JoystickState {
    /// Where the active press started, in logical window pixels
    pub base: Option<Vec2>,
    /// Normalized vector, each axis in [-1, 1]
    pub value: Vec2,
}

impl JoystickState {
    /// Anchor the base, ignoring presses in the top half of the window
    pub fn press(&mut self, position: Vec2, window_height: f32) -> bool {
        if position.y < window_height / 2.0 {
            return false;
        }
        self.base = Some(position);
        self.value = Vec2::ZERO;
        true
    }

    pub fn drag(&mut self, position: Vec2) {
        if let Some(base) = self.base {
            self.value = joystick_vector(base, position, JOYSTICK_RADIUS);
        }
    }

    pub fn release(&mut self) {
        self.base = None;
        self.value = Vec2::ZERO;
    }
}

/// Drag vector from `base` to `current`, clamped to `radius` and scaled to [-1, 1]
pub fn joystick_vector(base: Vec2, current: Vec2, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let delta = (current - base).clamp_length_max(radius);
    delta / radius
}

pub fn update_joystick(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut joystick: ResMut<JoystickState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let touch = touches.iter().next();
    let pointer = touch.map(|t| t.position()).or_else(|| window.cursor_position());
    let just_pressed = touches.any_just_pressed() || mouse.just_pressed(MouseButton::Left);
    let held = touch.is_some() || mouse.pressed(MouseButton::Left);

    if !held {
        if joystick.base.is_some() {
            joystick.release();
        }
        return;
    }

    let Some(position) = pointer else {
        return;
    };

    if just_pressed && joystick.base.is_none() {
        joystick.press(position, window.height());
    } else {
        joystick.drag(position);
    }
}

pub struct JoystickPlugin;

impl Plugin for JoystickPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<JoystickState>()
            .add_systems(Update, update_joystick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResolution;

    #[test]
    fn test_joystick_vector_within_radius() {
        let v = joystick_vector(Vec2::new(100.0, 500.0), Vec2::new(125.0, 500.0), 50.0);
        assert_eq!(v, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_joystick_vector_clamped() {
        let v = joystick_vector(Vec2::ZERO, Vec2::new(300.0, 400.0), 50.0);
        assert!((v.length() - 1.0).abs() < 1e-5);
        assert!((v.x - 0.6).abs() < 1e-5);
        assert!((v.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_press_only_in_bottom_half() {
        let mut state = JoystickState::default();
        assert!(!state.press(Vec2::new(10.0, 100.0), 800.0));
        assert!(state.base.is_none());

        assert!(state.press(Vec2::new(10.0, 600.0), 800.0));
        state.drag(Vec2::new(10.0, 575.0));
        assert_eq!(state.value, Vec2::new(0.0, -0.5));

        state.release();
        assert_eq!(state, JoystickState::default());
    }

    fn joystick_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .add_plugins(JoystickPlugin);
        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution: WindowResolution::new(800, 600),
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();
        (app, window)
    }

    fn move_cursor(app: &mut App, window: Entity, position: Vec2) {
        app.world_mut()
            .get_mut::<Window>(window)
            .unwrap()
            .set_cursor_position(Some(position));
    }

    #[test]
    fn test_held_after_rejected_press_stays_idle() {
        let (mut app, window) = joystick_app();

        // Press in the top half of a 600px high window
        move_cursor(&mut app, window, Vec2::new(100.0, 100.0));
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert_eq!(*app.world().resource::<JoystickState>(), JoystickState::default());

        // Still held and dragging: nothing anchors late
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .clear_just_pressed(MouseButton::Left);
        move_cursor(&mut app, window, Vec2::new(140.0, 500.0));
        app.update();
        assert_eq!(*app.world().resource::<JoystickState>(), JoystickState::default());

        // A fresh press in the bottom half anchors normally
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .release(MouseButton::Left);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .clear();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        let state = *app.world().resource::<JoystickState>();
        assert_eq!(state.base, Some(Vec2::new(140.0, 500.0)));
    }
}
