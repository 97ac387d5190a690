//! Frame animation for sprite sheets laid out on a uniform grid

use bevy::prelude::*;

/// A contiguous run of frames played in a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClip {
    pub first: usize,
    pub last: usize,
    pub fps: u32,
}

impl AnimationClip {
    pub const fn new(first: usize, last: usize, fps: u32) -> Self {
        Self { first, last, fps }
    }

    /// A single frame that never advances
    pub const fn still(frame: usize) -> Self {
        Self {
            first: frame,
            last: frame,
            fps: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.last.saturating_sub(self.first) + 1
    }

    /// Get the frame index for a given time in milliseconds
    pub fn frame_at_time(&self, time_ms: u32) -> usize {
        if self.fps == 0 {
            return self.first;
        }
        let frame_duration = (1000 / self.fps).max(1);
        let step = (time_ms / frame_duration) as usize % self.frame_count();
        self.first + step
    }
}

/// Frame layout of a sprite sheet (left-to-right, top-to-bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetGrid {
    pub frame_width: u32,
    pub frame_height: u32,
    pub columns: u32,
}

impl SheetGrid {
    pub const fn square(frame_size: u32, columns: u32) -> Self {
        Self {
            frame_width: frame_size,
            frame_height: frame_size,
            columns,
        }
    }

    /// Pixel rectangle of a frame within the sheet
    pub fn frame_rect(&self, frame: usize) -> Rect {
        let columns = self.columns.max(1) as usize;
        let col = (frame % columns) as f32;
        let row = (frame / columns) as f32;
        let (w, h) = (self.frame_width as f32, self.frame_height as f32);
        Rect::new(col * w, row * h, (col + 1.0) * w, (row + 1.0) * h)
    }
}

/// Component for playing sprite animations
#[derive(Component, Debug, Clone)]
pub struct AnimatedSprite {
    pub grid: SheetGrid,
    pub clip: AnimationClip,
    /// Elapsed time in the current clip (milliseconds)
    pub elapsed_ms: u32,
}

impl AnimatedSprite {
    pub fn new(grid: SheetGrid, clip: AnimationClip) -> Self {
        Self {
            grid,
            clip,
            elapsed_ms: 0,
        }
    }

    /// Switch clips, restarting only when the clip actually changes
    pub fn play(&mut self, clip: AnimationClip) {
        if self.clip != clip {
            self.clip = clip;
            self.elapsed_ms = 0;
        }
    }

    pub fn current_frame(&self) -> usize {
        self.clip.frame_at_time(self.elapsed_ms)
    }
}

/// Plugin for sprite animation support
pub struct SpriteAnimationPlugin;

impl Plugin for SpriteAnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, update_animated_sprites);
    }
}

/// System to update animated sprites
fn update_animated_sprites(time: Res<Time>, mut query: Query<(&mut AnimatedSprite, &mut Sprite)>) {
    let delta_ms = (time.delta_secs() * 1000.0) as u32;
    for (mut animated, mut sprite) in query.iter_mut() {
        animated.elapsed_ms = animated.elapsed_ms.wrapping_add(delta_ms);
        let rect = animated.grid.frame_rect(animated.current_frame());
        if sprite.rect != Some(rect) {
            sprite.rect = Some(rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_loops() {
        let walk = AnimationClip::new(2, 3, 8);
        assert_eq!(walk.frame_at_time(0), 2);
        assert_eq!(walk.frame_at_time(125), 3);
        assert_eq!(walk.frame_at_time(250), 2);

        let still = AnimationClip::still(0);
        assert_eq!(still.frame_at_time(10_000), 0);
    }

    #[test]
    fn test_frame_rect() {
        let grid = SheetGrid::square(48, 4);
        assert_eq!(grid.frame_rect(0), Rect::new(0.0, 0.0, 48.0, 48.0));
        assert_eq!(grid.frame_rect(5), Rect::new(48.0, 48.0, 96.0, 96.0));
    }

    #[test]
    fn test_play_restarts_only_on_change() {
        let mut animated = AnimatedSprite::new(SheetGrid::square(16, 4), AnimationClip::new(0, 1, 3));
        animated.elapsed_ms = 400;
        animated.play(AnimationClip::new(0, 1, 3));
        assert_eq!(animated.elapsed_ms, 400);
        animated.play(AnimationClip::new(4, 7, 8));
        assert_eq!(animated.elapsed_ms, 0);
    }
}
