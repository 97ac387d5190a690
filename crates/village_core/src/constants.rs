//! Shared tuning constants
//!
//! The hitbox ratios and offsets are tuned against the sprite art and must keep
//! these exact values.

/// Native tile size of the sprite sheets, in source pixels
pub const TILE_SIZE: i32 = 16;

/// Uniform render scale applied to every tile
pub const SCALE: i32 = 3;

/// Size of one tile in display pixels (16 x 3 = 48)
pub const DISPLAY_TILE: i32 = TILE_SIZE * SCALE;

/// Maximum number of undo snapshots kept by the editor
pub const HISTORY_CAPACITY: usize = 20;

/// Snap grid used by the sprite cropper, in sheet pixels
pub const CROP_GRID: i32 = 16;

/// Derived hitbox width as a fraction of the scaled sprite width
pub const HITBOX_WIDTH_RATIO: f32 = 0.6;

/// Derived hitbox height as a fraction of the scaled sprite height
pub const HITBOX_HEIGHT_RATIO: f32 = 0.4;

/// Gap between the derived hitbox and the bottom edge of the sprite
pub const HITBOX_BOTTOM_MARGIN: f32 = 5.0;

/// Vertical correction applied to painted collision cells when the world loads
pub const COLLISION_Y_OFFSET: f32 = 48.0;

/// Distance below a portal zone where a returning player is placed
pub const RETURN_SPAWN_MARGIN: f32 = 60.0;

/// Width of each invisible side wall, as a fraction of the portal width
pub const PORTAL_WALL_WIDTH_RATIO: f32 = 0.3;

/// Height of each invisible side wall, as a fraction of the portal height
pub const PORTAL_WALL_HEIGHT_RATIO: f32 = 0.5;

pub mod depth {
    //! Draw depth constants. Higher values render on top.

    pub const WATER: f32 = -10.0;
    pub const FLOOR_DECORATION: f32 = -5.0;
    pub const PORTAL_MARKER: f32 = -4.0;
    pub const HIGH_PLANT_BONUS: f32 = 200.0;
    pub const SOLID_PLANT_BONUS: f32 = 10.0;
    pub const BUILDING_BONUS: f32 = 100.0;
    pub const ABOVE_PLAYER: f32 = 100_000.0;
    pub const WANDERING_AGENT: f32 = 9999.0;
    /// Depth used by the editor canvas for objects flagged above the player
    pub const EDITOR_ABOVE_PLAYER: f32 = 1000.0;
}
