//! Minimal 2D math for world positions and collision boxes.

use serde::{Deserialize, Serialize};

/// A position or displacement in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned integer rectangle, `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box for a sprite of the given size at a (rounded) world position.
    pub fn at(position: Vec2, width: i32, height: i32) -> Self {
        Self::new(
            position.x.round() as i32,
            position.y.round() as i32,
            width,
            height,
        )
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Grow (or shrink, with negative amounts) evenly on both sides of each axis.
    pub fn inflate(self, horizontal: i32, vertical: i32) -> Self {
        Self {
            x: self.x - horizontal,
            y: self.y - vertical,
            width: self.width + horizontal * 2,
            height: self.height + vertical * 2,
        }
    }

    /// True if the two rectangles share any interior area. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x < self.right()
            && self.x < other.right()
            && other.y < self.bottom()
            && self.y < other.bottom()
    }
}
