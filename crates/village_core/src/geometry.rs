//! Tile <-> pixel conversion
//!
//! Every spatial computation in the editor and the runtime funnels through
//! [`DISPLAY_TILE`] so the two halves never disagree on alignment.

use crate::constants::DISPLAY_TILE;
use serde::{Deserialize, Serialize};

/// Display size of one tile in pixels
pub const fn display_tile_size() -> i32 {
    DISPLAY_TILE
}

/// Top-left pixel of a tile
pub fn tile_to_pixel(tx: i32, ty: i32) -> (i32, i32) {
    (tx * DISPLAY_TILE, ty * DISPLAY_TILE)
}

/// Center pixel of a tile
pub fn tile_center_pixel(tx: i32, ty: i32) -> (i32, i32) {
    let (x, y) = tile_to_pixel(tx, ty);
    (x + DISPLAY_TILE / 2, y + DISPLAY_TILE / 2)
}

/// Tile containing a pixel position.
///
/// Uses floor division, so positions left of or above the origin map to negative
/// tiles. Callers must range-check the result before touching map state.
pub fn pixel_to_tile(px: f32, py: f32) -> (i32, i32) {
    let size = DISPLAY_TILE as f32;
    ((px / size).floor() as i32, (py / size).floor() as i32)
}

/// Axis-aligned rectangle in map pixel space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle from its center point and size
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_to_pixel() {
        assert_eq!(tile_to_pixel(0, 0), (0, 0));
        assert_eq!(tile_to_pixel(5, 5), (240, 240));
        assert_eq!(tile_to_pixel(3, 7), (144, 336));
        assert_eq!(display_tile_size(), 48);
    }

    #[test]
    fn test_pixel_to_tile_floors() {
        assert_eq!(pixel_to_tile(47.9, 48.0), (0, 1));
        assert_eq!(pixel_to_tile(-1.0, 10.0), (-1, 0));
        assert_eq!(pixel_to_tile(2000.0, 2000.0), (41, 41));
    }

    #[test]
    fn test_tile_pixel_round_trip() {
        for tx in 0..64 {
            for ty in 0..64 {
                let (x, y) = tile_to_pixel(tx, ty);
                assert_eq!(pixel_to_tile(x as f32, y as f32), (tx, ty));
                let (cx, cy) = tile_center_pixel(tx, ty);
                assert_eq!(pixel_to_tile(cx as f32, cy as f32), (tx, ty));
            }
        }
    }

    #[test]
    fn test_rect_from_center() {
        let rect = PixelRect::from_center(100.0, 50.0, 20.0, 10.0);
        assert_eq!(rect, PixelRect::new(90.0, 45.0, 20.0, 10.0));
        assert_eq!(rect.center(), (100.0, 50.0));
        assert_eq!(rect.bottom(), 55.0);
        assert!(rect.contains(90.0, 45.0));
        assert!(!rect.contains(110.0, 45.0));
    }
}
