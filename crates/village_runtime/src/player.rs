//! Player controller
//!
//! Keyboard and joystick input become a velocity in map pixel space (y down),
//! which is handed to the physics body. Collision response and sliding along
//! obstacles are left to avian.

use crate::animation::{AnimatedSprite, AnimationClip, SheetGrid};
use crate::joystick::{update_joystick, JoystickState};
use crate::portal::PortalTransition;
use crate::tuning::*;
use crate::world::{depth_to_z, HubEntity};
use avian2d::prelude::*;
use bevy::prelude::*;

/// Marker for the player's physics body
#[derive(Component, Debug, Default)]
pub struct Player;

/// Marker for the player's visual child
#[derive(Component, Debug, Default)]
pub struct PlayerSprite;

/// Whether player input is accepted (false while an overlay covers the world)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsEnabled(pub bool);

impl Default for ControlsEnabled {
    fn default() -> Self {
        Self(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Raw directional input for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Joystick vector in [-1, 1], y down
    pub joystick: Vec2,
}

impl PlayerInput {
    pub fn from_keyboard(keyboard: &ButtonInput<KeyCode>, joystick: Vec2) -> Self {
        Self {
            left: keyboard.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
            right: keyboard.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
            up: keyboard.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]),
            down: keyboard.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]),
            joystick,
        }
    }

    fn joystick_active(&self) -> bool {
        self.joystick.x.abs() > JOYSTICK_DEADZONE || self.joystick.y.abs() > JOYSTICK_DEADZONE
    }

    /// Velocity in map pixels per second (y down).
    ///
    /// Left beats right and up beats down. An active joystick overrides the keys.
    pub fn velocity(&self, speed: f32) -> Vec2 {
        if self.joystick_active() {
            return self.joystick * speed;
        }

        let mut velocity = Vec2::ZERO;
        if self.left {
            velocity.x = -speed;
        } else if self.right {
            velocity.x = speed;
        }
        if self.up {
            velocity.y = -speed;
        } else if self.down {
            velocity.y = speed;
        }

        if velocity.x != 0.0 && velocity.y != 0.0 {
            velocity *= DIAGONAL_FACTOR;
        }
        velocity
    }
}

/// Directional walk/idle state
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAnimState {
    Idle(Facing),
    Walking(Facing),
}

impl Default for PlayerAnimState {
    fn default() -> Self {
        PlayerAnimState::Idle(Facing::Down)
    }
}

impl PlayerAnimState {
    pub fn facing(self) -> Facing {
        match self {
            PlayerAnimState::Idle(facing) | PlayerAnimState::Walking(facing) => facing,
        }
    }

    /// Derive the next state from a map-space velocity, keeping the previous
    /// facing when idle.
    pub fn from_velocity(velocity: Vec2, previous: Facing) -> Self {
        let (abs_x, abs_y) = (velocity.x.abs(), velocity.y.abs());
        if abs_x < IDLE_SPEED_THRESHOLD && abs_y < IDLE_SPEED_THRESHOLD {
            return PlayerAnimState::Idle(previous);
        }

        let facing = if abs_y > abs_x * VERTICAL_DOMINANCE {
            if velocity.y < 0.0 {
                Facing::Up
            } else {
                Facing::Down
            }
        } else if velocity.x < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        };
        PlayerAnimState::Walking(facing)
    }

    /// Idle freezes on the neutral frame regardless of facing
    pub fn clip(self) -> AnimationClip {
        match self {
            PlayerAnimState::Idle(_) => AnimationClip::still(0),
            PlayerAnimState::Walking(Facing::Down) => AnimationClip::new(2, 3, 8),
            PlayerAnimState::Walking(Facing::Up) => AnimationClip::new(6, 7, 8),
            PlayerAnimState::Walking(Facing::Left) => AnimationClip::new(10, 11, 8),
            PlayerAnimState::Walking(Facing::Right) => AnimationClip::new(14, 15, 8),
        }
    }
}

pub const PLAYER_GRID: SheetGrid = SheetGrid::square(PLAYER_FRAME_SIZE, PLAYER_SHEET_COLUMNS);

/// Spawn the player at a map pixel position
pub fn spawn_player(commands: &mut Commands, sheet: Handle<Image>, x: f32, y: f32) -> Entity {
    let state = PlayerAnimState::default();
    commands
        .spawn((
            Name::new("Player"),
            HubEntity,
            Player,
            state,
            Transform::from_xyz(x, -y, 0.0),
            Visibility::default(),
            RigidBody::Dynamic,
            LockedAxes::ROTATION_LOCKED,
            GravityScale(0.0),
            Friction::ZERO,
            LinearVelocity::ZERO,
        ))
        .with_children(|parent| {
            parent.spawn((
                Collider::rectangle(PLAYER_BODY_SIZE, PLAYER_BODY_SIZE),
                Transform::from_xyz(0.0, -PLAYER_BODY_DROP, 0.0),
            ));
            parent.spawn((
                PlayerSprite,
                Sprite {
                    image: sheet,
                    rect: Some(PLAYER_GRID.frame_rect(0)),
                    ..default()
                },
                AnimatedSprite::new(PLAYER_GRID, state.clip()),
                Transform::from_xyz(0.0, 0.0, depth_to_z(y + PLAYER_DEPTH_OFFSET))
                    .with_scale(Vec3::splat(PLAYER_SPRITE_SCALE)),
            ));
        })
        .id()
}

/// Apply input to the player body and update its animation state
pub fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    joystick: Res<JoystickState>,
    controls: Res<ControlsEnabled>,
    mut query: Query<
        (&mut LinearVelocity, &mut PlayerAnimState),
        (With<Player>, Without<PortalTransition>),
    >,
) {
    let input = if controls.0 {
        PlayerInput::from_keyboard(&keyboard, joystick.value)
    } else {
        PlayerInput::default()
    };
    let velocity = input.velocity(PLAYER_SPEED);

    for (mut linear, mut state) in query.iter_mut() {
        // map space is y down, world space is y up
        linear.0 = Vec2::new(velocity.x, -velocity.y);

        let next = PlayerAnimState::from_velocity(velocity, state.facing());
        if *state != next {
            *state = next;
        }
    }
}

/// Push the animation state to the sprite and keep its depth in step with y
pub fn sync_player_sprite(
    players: Query<(&PlayerAnimState, &Transform, &Children), With<Player>>,
    mut sprites: Query<(&mut AnimatedSprite, &mut Transform), (With<PlayerSprite>, Without<Player>)>,
) {
    for (state, body, children) in players.iter() {
        let map_y = -body.translation.y;
        for child in children.iter() {
            if let Ok((mut animated, mut transform)) = sprites.get_mut(child) {
                animated.play(state.clip());
                transform.translation.z = depth_to_z(map_y + PLAYER_DEPTH_OFFSET);
            }
        }
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlsEnabled>()
            .add_systems(
                Update,
                (move_player.after(update_joystick), sync_player_sprite).chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(left: bool, right: bool, up: bool, down: bool) -> PlayerInput {
        PlayerInput {
            left,
            right,
            up,
            down,
            joystick: Vec2::ZERO,
        }
    }

    #[test]
    fn test_cardinal_velocity() {
        assert_eq!(keys(true, false, false, false).velocity(200.0), Vec2::new(-200.0, 0.0));
        assert_eq!(keys(false, false, false, true).velocity(200.0), Vec2::new(0.0, 200.0));
        assert_eq!(keys(false, false, false, false).velocity(200.0), Vec2::ZERO);
    }

    #[test]
    fn test_opposite_keys_prefer_left_and_up() {
        assert_eq!(keys(true, true, false, false).velocity(200.0), Vec2::new(-200.0, 0.0));
        assert_eq!(keys(false, false, true, true).velocity(200.0), Vec2::new(0.0, -200.0));
    }

    #[test]
    fn test_diagonal_speed_matches_cardinal() {
        let diagonal = keys(true, false, true, false).velocity(200.0);
        let cardinal = keys(false, false, true, false).velocity(200.0);
        assert!((diagonal.length() - cardinal.length()).abs() < 0.05);
        assert!(diagonal.x < 0.0 && diagonal.y < 0.0);
    }

    #[test]
    fn test_joystick_overrides_keys() {
        let mut input = keys(true, false, false, false);
        input.joystick = Vec2::new(0.0, 0.5);
        assert_eq!(input.velocity(200.0), Vec2::new(0.0, 100.0));

        input.joystick = Vec2::new(0.05, 0.05);
        assert_eq!(input.velocity(200.0), Vec2::new(-200.0, 0.0));
    }

    #[test]
    fn test_anim_state_from_velocity() {
        assert_eq!(
            PlayerAnimState::from_velocity(Vec2::new(5.0, -9.0), Facing::Left),
            PlayerAnimState::Idle(Facing::Left)
        );
        assert_eq!(
            PlayerAnimState::from_velocity(Vec2::new(0.0, -200.0), Facing::Down),
            PlayerAnimState::Walking(Facing::Up)
        );
        // equal diagonal prefers the horizontal animation
        assert_eq!(
            PlayerAnimState::from_velocity(Vec2::new(141.4, 141.4), Facing::Down),
            PlayerAnimState::Walking(Facing::Right)
        );
        assert_eq!(
            PlayerAnimState::from_velocity(Vec2::new(-100.0, 121.0), Facing::Down),
            PlayerAnimState::Walking(Facing::Down)
        );
    }

    #[test]
    fn test_clips() {
        assert_eq!(PlayerAnimState::Idle(Facing::Up).clip(), AnimationClip::still(0));
        assert_eq!(
            PlayerAnimState::Walking(Facing::Left).clip(),
            AnimationClip::new(10, 11, 8)
        );
    }

    #[test]
    fn test_move_player_system() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<JoystickState>()
            .init_resource::<ControlsEnabled>()
            .add_systems(Update, move_player);

        let player = app
            .world_mut()
            .spawn((Player, PlayerAnimState::default(), LinearVelocity::ZERO))
            .id();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        app.update();

        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(velocity.0, Vec2::new(0.0, PLAYER_SPEED));
        assert_eq!(
            *app.world().get::<PlayerAnimState>(player).unwrap(),
            PlayerAnimState::Walking(Facing::Up)
        );

        app.world_mut().resource_mut::<ControlsEnabled>().0 = false;
        app.update();
        let velocity = app.world().get::<LinearVelocity>(player).unwrap();
        assert_eq!(velocity.0, Vec2::ZERO);
    }
}
