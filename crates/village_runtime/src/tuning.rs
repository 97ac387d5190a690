//! Gameplay tuning constants

/// Player walking speed in pixels per second
pub const PLAYER_SPEED: f32 = 200.0;

/// Joystick axis magnitude below which keyboard input applies instead
pub const JOYSTICK_DEADZONE: f32 = 0.1;

/// Applied to both axes of diagonal keyboard movement
pub const DIAGONAL_FACTOR: f32 = 0.7071;

/// Per-axis speed below which the player counts as idle
pub const IDLE_SPEED_THRESHOLD: f32 = 10.0;

/// Vertical speed must exceed horizontal speed by this factor to face up/down
pub const VERTICAL_DOMINANCE: f32 = 1.2;

/// Added to the player's y position to obtain its draw depth
pub const PLAYER_DEPTH_OFFSET: f32 = 48.0;

pub const PLAYER_SPRITE_SCALE: f32 = 2.5;
pub const PLAYER_FRAME_SIZE: u32 = 48;
pub const PLAYER_SHEET_COLUMNS: u32 = 4;
/// Collision body size in display pixels (16 sheet pixels at sprite scale)
pub const PLAYER_BODY_SIZE: f32 = 16.0 * PLAYER_SPRITE_SCALE;
/// Body center sits below the sprite center, toward the feet
pub const PLAYER_BODY_DROP: f32 = 4.0 * PLAYER_SPRITE_SCALE;

pub const AGENT_COUNT: usize = 2;
pub const AGENT_SPEED: f32 = 30.0;
pub const AGENT_WALK_PROBABILITY: f64 = 0.6;
pub const AGENT_MIN_DECISION_MS: u64 = 1000;
pub const AGENT_MAX_DECISION_MS: u64 = 3000;
pub const AGENT_RESTITUTION: f32 = 0.2;
pub const AGENT_SPRITE_SCALE: f32 = 2.1;
pub const AGENT_FRAME_SIZE: u32 = 16;
pub const AGENT_SHEET_COLUMNS: u32 = 4;
pub const AGENT_BODY_SIZE: f32 = 10.0 * AGENT_SPRITE_SCALE;
/// Spawn offsets relative to the player spawn, in map pixels
pub const AGENT_SPAWN_OFFSETS: [(f32, f32); AGENT_COUNT] = [(100.0, 50.0), (-80.0, 120.0)];

/// Duration of the shrink/fade played when entering a portal
pub const PORTAL_TRANSITION_MS: u64 = 500;

pub const CAMERA_ZOOM: f32 = 2.2;
pub const CAMERA_LERP: f32 = 0.1;

/// Maximum joystick drag distance in logical pixels
pub const JOYSTICK_RADIUS: f32 = 50.0;

/// Converts map draw depth to a z translation inside the 2D camera's clip range
pub const DEPTH_TO_Z: f32 = 0.005;

/// Building sprite scale and vertical lift above the portal zone center
pub const BUILDING_SCALE: f32 = 0.3;
pub const BUILDING_LIFT: f32 = 20.0;

/// Known portal marker size relative to its zone
pub const KNOWN_MARKER_WIDTH_RATIO: f32 = 0.6;
pub const KNOWN_MARKER_HEIGHT_RATIO: f32 = 0.8;
