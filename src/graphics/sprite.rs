//! Sprite atlas regions and the drawing surface contract.

use crate::geometry::Vec2;

/// Which version of the sprite atlas an entity draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Dark sprites on a light sky.
    #[default]
    Normal,
    /// Colour-inverted atlas used at night.
    Inverted,
}

/// What a sprite depicts. Frontends that cannot blit the atlas (the
/// terminal renderer) use this to pick glyphs and colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Trex,
    TrexDucking,
    TrexDead,
    TrexIdleBackground,
    SmallCactus,
    LargeCactus,
    FlyingDino,
    Cloud,
    Star,
    Moon,
    Ground,
    BumpyGround,
    Digit(u8),
    HiLabel,
    GameOverText,
    ReplayButton,
}

/// A rectangle in the 1233x68 sprite atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SpriteRegion {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A drawable piece of the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub region: SpriteRegion,
}

impl Sprite {
    pub const fn new(kind: SpriteKind, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            kind,
            region: SpriteRegion::new(x, y, width, height),
        }
    }

    pub fn width(&self) -> i32 {
        self.region.width
    }

    pub fn height(&self) -> i32 {
        self.region.height
    }
}

/// Rendering surface implemented by the frontend.
pub trait Canvas {
    /// Clear the frame. `daylight` is the day/night scalar (1 = day, 0 = night).
    fn clear(&mut self, daylight: f32);

    /// Draw `sprite` with its top-left corner at `position` (world pixels).
    fn draw_sprite(&mut self, sprite: &Sprite, palette: Palette, position: Vec2);

    /// Cross-fade overlay drawn over the sky layer; `alpha` in [0, 1].
    fn fill_overlay(&mut self, _alpha: f32) {}
}

/// A canvas that records draw calls; used by tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub cleared_with: Option<f32>,
    pub calls: Vec<(Sprite, Palette, Vec2)>,
    pub overlay: Option<f32>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<SpriteKind> {
        self.calls.iter().map(|(sprite, _, _)| sprite.kind).collect()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, daylight: f32) {
        self.cleared_with = Some(daylight);
        self.calls.clear();
    }

    fn draw_sprite(&mut self, sprite: &Sprite, palette: Palette, position: Vec2) {
        self.calls.push((*sprite, palette, position));
    }

    fn fill_overlay(&mut self, alpha: f32) {
        self.overlay = Some(alpha);
    }
}
