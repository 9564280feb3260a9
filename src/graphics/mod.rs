//! Sprite descriptions and animations. Pixels are the frontend's business.

pub mod animation;
pub mod sprite;

pub use animation::SpriteAnimation;
pub use sprite::{Canvas, Palette, Sprite, SpriteKind};
