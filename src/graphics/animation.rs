//! Time-stamped sprite animations.

use super::sprite::{Canvas, Palette, Sprite};
use crate::geometry::Vec2;

/// One frame that starts playing at `timestamp` seconds into the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub sprite: Sprite,
    pub timestamp: f32,
}

/// A list of frames played back against elapsed time.
///
/// The last frame's timestamp marks the end of the animation, so a looping
/// two-image animation is usually built as A@0, B@t, A@2t.
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    frames: Vec<AnimationFrame>,
    playback_progress: f32,
    is_playing: bool,
    pub should_loop: bool,
}

impl Default for SpriteAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteAnimation {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            playback_progress: 0.0,
            is_playing: false,
            should_loop: true,
        }
    }

    /// Evenly spaced frames stepping through the atlas by `offset` per frame,
    /// with a closing marker frame so every image gets the full `frame_length`.
    pub fn simple(
        first: Sprite,
        offset: (i32, i32),
        frame_count: usize,
        frame_length: f32,
    ) -> Self {
        let mut animation = Self::new();
        for i in 0..frame_count {
            let mut sprite = first;
            sprite.region.x += offset.0 * i as i32;
            sprite.region.y += offset.1 * i as i32;
            animation.add_frame(sprite, frame_length * i as f32);
        }
        animation.add_frame(first, frame_length * frame_count as f32);
        animation
    }

    pub fn add_frame(&mut self, sprite: Sprite, timestamp: f32) {
        self.frames.push(AnimationFrame { sprite, timestamp });
    }

    pub fn clear(&mut self) {
        self.stop();
        self.frames.clear();
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.playback_progress = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback_progress(&self) -> f32 {
        self.playback_progress
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total length: the highest frame timestamp.
    pub fn duration(&self) -> f32 {
        self.frames
            .iter()
            .map(|f| f.timestamp)
            .fold(0.0, f32::max)
    }

    /// The last frame whose timestamp is not after the playback position.
    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.frames
            .iter()
            .filter(|f| f.timestamp <= self.playback_progress)
            .max_by(|a, b| a.timestamp.total_cmp(&b.timestamp))
    }

    /// Panics if `index` is out of range.
    pub fn frame(&self, index: usize) -> &AnimationFrame {
        assert!(
            index < self.frames.len(),
            "A frame with index {} does not exist in this animation.",
            index
        );
        &self.frames[index]
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_playing {
            return;
        }
        self.playback_progress += dt;

        let duration = self.duration();
        if self.playback_progress > duration {
            if self.should_loop && duration > 0.0 {
                // keep the overshoot so long frames don't drift
                self.playback_progress = self.playback_progress.rem_euclid(duration);
            } else {
                self.stop();
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, palette: Palette, position: Vec2) {
        if let Some(frame) = self.current_frame() {
            canvas.draw_sprite(&frame.sprite, palette, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::sprite::SpriteKind;

    fn sprite(x: i32) -> Sprite {
        Sprite::new(SpriteKind::Star, x, 0, 9, 9)
    }

    fn two_frame() -> SpriteAnimation {
        let mut animation = SpriteAnimation::new();
        animation.add_frame(sprite(0), 0.0);
        animation.add_frame(sprite(10), 0.5);
        animation.add_frame(sprite(0), 1.0);
        animation
    }

    #[test]
    fn test_current_frame_follows_progress() {
        let mut animation = two_frame();
        animation.play();
        assert_eq!(animation.current_frame().unwrap().sprite.region.x, 0);

        animation.update(0.6);
        assert_eq!(animation.current_frame().unwrap().sprite.region.x, 10);
    }

    #[test]
    fn test_looping_keeps_overshoot() {
        let mut animation = two_frame();
        animation.play();
        animation.update(1.25);
        assert!(animation.is_playing());
        assert!((animation.playback_progress() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_long_step_wraps_past_several_loops() {
        let mut animation = two_frame();
        animation.play();
        animation.update(2.6);
        assert!((animation.playback_progress() - 0.6).abs() < 1e-5);
        assert_eq!(animation.current_frame().unwrap().sprite.region.x, 10);
    }

    #[test]
    fn test_default_matches_new() {
        let animation = SpriteAnimation::default();
        assert!(animation.should_loop);
        assert!(!animation.is_playing());
        assert_eq!(animation.frame_count(), 0);
    }

    #[test]
    fn test_non_looping_stops_at_end() {
        let mut animation = two_frame();
        animation.should_loop = false;
        animation.play();
        animation.update(1.5);
        assert!(!animation.is_playing());
        assert_eq!(animation.playback_progress(), 0.0);
    }

    #[test]
    fn test_paused_animation_does_not_advance() {
        let mut animation = two_frame();
        animation.update(0.7);
        assert_eq!(animation.playback_progress(), 0.0);
    }

    #[test]
    fn test_simple_builds_marker_frame() {
        let animation = SpriteAnimation::simple(sprite(644), (0, 9), 3, 0.4);
        assert_eq!(animation.frame_count(), 4);
        assert_eq!(animation.frame(2).sprite.region.y, 18);
        assert!((animation.duration() - 1.2).abs() < 1e-5);
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_frame_out_of_range_panics() {
        two_frame().frame(7);
    }
}
