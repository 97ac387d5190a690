//! Camera follow with smoothing and world-bound clamping

use crate::player::Player;
use crate::tuning::CAMERA_LERP;
use crate::world::WorldBounds;
use bevy::prelude::*;

/// Fraction of the remaining distance covered this frame, normalized to 60 fps
pub fn follow_factor(lerp: f32, delta_secs: f32) -> f32 {
    1.0 - (1.0 - lerp).powf(delta_secs * 60.0)
}

/// Clamp a camera center (world space, y up) so the view stays inside the
/// world. Axes where the world is smaller than the view are centered.
pub fn clamp_to_bounds(center: Vec2, half_view: Vec2, bounds: &WorldBounds) -> Vec2 {
    let clamp_axis = |value: f32, min: f32, max: f32| {
        if min > max {
            (min + max) / 2.0
        } else {
            value.clamp(min, max)
        }
    };

    Vec2::new(
        clamp_axis(center.x, half_view.x, bounds.width - half_view.x),
        clamp_axis(center.y, -bounds.height + half_view.y, -half_view.y),
    )
}

fn follow_player(
    time: Res<Time>,
    bounds: Option<Res<WorldBounds>>,
    players: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut cameras: Query<(&mut Transform, &Projection, &Camera), With<Camera2d>>,
) {
    let Some(bounds) = bounds else {
        return;
    };
    let Ok(player) = players.single() else {
        return;
    };
    let Ok((mut transform, projection, camera)) = cameras.single_mut() else {
        return;
    };

    let scale = match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        _ => 1.0,
    };
    let viewport = camera.logical_viewport_size().unwrap_or(Vec2::ZERO);
    let half_view = viewport * scale / 2.0;

    let current = transform.translation.truncate();
    let target = player.translation.truncate();
    let next = current.lerp(target, follow_factor(CAMERA_LERP, time.delta_secs()));
    let next = clamp_to_bounds(next, half_view, &bounds);

    transform.translation.x = next.x;
    transform.translation.y = next.y;
}

/// Snap the camera onto a point and apply the zoom level
pub fn focus_camera(
    cameras: &mut Query<(&mut Transform, &mut Projection), With<Camera2d>>,
    world_position: Vec2,
    zoom: f32,
) {
    for (mut transform, mut projection) in cameras.iter_mut() {
        transform.translation.x = world_position.x;
        transform.translation.y = world_position.y;
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = 1.0 / zoom.max(0.01);
        }
    }
}

pub struct CameraFollowPlugin;

impl Plugin for CameraFollowPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            follow_player.before(bevy::transform::TransformSystems::Propagate),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_factor_at_60fps() {
        assert!((follow_factor(0.1, 1.0 / 60.0) - 0.1).abs() < 1e-4);
        assert_eq!(follow_factor(0.1, 0.0), 0.0);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = WorldBounds {
            width: 1200.0,
            height: 1200.0,
        };
        let half = Vec2::new(200.0, 150.0);

        assert_eq!(
            clamp_to_bounds(Vec2::new(0.0, 0.0), half, &bounds),
            Vec2::new(200.0, -150.0)
        );
        assert_eq!(
            clamp_to_bounds(Vec2::new(600.0, -600.0), half, &bounds),
            Vec2::new(600.0, -600.0)
        );
        assert_eq!(
            clamp_to_bounds(Vec2::new(5000.0, -5000.0), half, &bounds),
            Vec2::new(1000.0, -1050.0)
        );

        // view wider than the world centers it
        let small = WorldBounds {
            width: 300.0,
            height: 1200.0,
        };
        assert_eq!(clamp_to_bounds(Vec2::new(0.0, -600.0), half, &small).x, 150.0);
    }
}
