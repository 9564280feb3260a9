//! Parallax decorations: clouds by day, stars and the moon by night.

use super::{scroll_left, Drawable, EntityEvent, GameEntity, WorldContext};
use crate::constants::{CLOUD_DRAW_ORDER, MOON_DRAW_ORDER, STAR_DRAW_ORDER};
use crate::geometry::Vec2;
use crate::graphics::{Canvas, Palette, Sprite, SpriteAnimation, SpriteKind};

const CLOUD_SPRITE_POS_X: i32 = 87;
const CLOUD_SPRITE_POS_Y: i32 = 0;
const CLOUD_SPRITE_WIDTH: i32 = 46;
const CLOUD_SPRITE_HEIGHT: i32 = 17;
pub const CLOUD_SPEED_FACTOR: f32 = 0.5;

const STAR_SPRITE_POS_X: i32 = 644;
const STAR_SPRITE_POS_Y: i32 = 2;
const STAR_SPRITE_SIZE: i32 = 9;
const STAR_ANIMATION_FRAME_LENGTH: f32 = 0.4;
pub const STAR_SPEED_FACTOR: f32 = 0.2;

// phases are laid out right to left in the atlas
const MOON_RIGHTMOST_SPRITE_POS_X: i32 = 624;
const MOON_SPRITE_POS_Y: i32 = 2;
const MOON_SPRITE_WIDTH: i32 = 20;
const MOON_SPRITE_HEIGHT: i32 = 40;
pub const MOON_PHASE_COUNT: u32 = 7;
const MOON_FULL_PHASE: u32 = 3;
pub const MOON_SPEED_FACTOR: f32 = 0.1;

/// Sky objects hold still while the trex is dead.
fn drift(position: &mut Vec2, ctx: &WorldContext, factor: f32) {
    if ctx.trex_alive {
        scroll_left(position, ctx.trex_speed * factor, ctx.dt);
    }
}

#[derive(Debug, Clone)]
pub struct Cloud {
    position: Vec2,
    sprite: Sprite,
    palette: Palette,
}

impl Cloud {
    pub fn new(position: Vec2, palette: Palette) -> Self {
        Self {
            position,
            sprite: Sprite::new(
                SpriteKind::Cloud,
                CLOUD_SPRITE_POS_X,
                CLOUD_SPRITE_POS_Y,
                CLOUD_SPRITE_WIDTH,
                CLOUD_SPRITE_HEIGHT,
            ),
            palette,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

#[derive(Debug, Clone)]
pub struct Star {
    position: Vec2,
    animation: SpriteAnimation,
    palette: Palette,
}

impl Star {
    pub fn new(position: Vec2, palette: Palette) -> Self {
        let mut animation = SpriteAnimation::simple(
            Sprite::new(
                SpriteKind::Star,
                STAR_SPRITE_POS_X,
                STAR_SPRITE_POS_Y,
                STAR_SPRITE_SIZE,
                STAR_SPRITE_SIZE,
            ),
            (0, STAR_SPRITE_SIZE),
            3,
            STAR_ANIMATION_FRAME_LENGTH,
        );
        animation.play();

        Self {
            position,
            animation,
            palette,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn animation(&self) -> &SpriteAnimation {
        &self.animation
    }
}

/// The one moon. Recycled to the right edge instead of despawned.
#[derive(Debug, Clone)]
pub struct Moon {
    position: Vec2,
    palette: Palette,
}

impl Moon {
    pub fn new(position: Vec2, palette: Palette) -> Self {
        Self { position, palette }
    }

    /// Atlas region for the phase shown after `night_count` nights.
    pub fn sprite_for_phase(night_count: u32) -> Sprite {
        let mut index = night_count % MOON_PHASE_COUNT;
        let mut width = MOON_SPRITE_WIDTH;

        // full moon is twice as wide, everything after it sits one slot further left
        if index == MOON_FULL_PHASE {
            width *= 2;
        }
        if index >= MOON_FULL_PHASE {
            index += 1;
        }

        Sprite::new(
            SpriteKind::Moon,
            MOON_RIGHTMOST_SPRITE_POS_X - index as i32 * MOON_SPRITE_WIDTH,
            MOON_SPRITE_POS_Y,
            width,
            MOON_SPRITE_HEIGHT,
        )
    }
}

#[derive(Debug, Clone)]
pub enum SkyObject {
    Cloud(Cloud),
    Star(Star),
    Moon(Moon),
}

impl SkyObject {
    pub fn position(&self) -> Vec2 {
        match self {
            SkyObject::Cloud(c) => c.position,
            SkyObject::Star(s) => s.position,
            SkyObject::Moon(m) => m.position,
        }
    }

    pub fn set_position(&mut self, position: Vec2) {
        match self {
            SkyObject::Cloud(c) => c.position = position,
            SkyObject::Star(s) => s.position = position,
            SkyObject::Moon(m) => m.position = position,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            SkyObject::Cloud(c) => c.palette,
            SkyObject::Star(s) => s.palette,
            SkyObject::Moon(m) => m.palette,
        }
    }
}

impl From<Cloud> for SkyObject {
    fn from(cloud: Cloud) -> Self {
        SkyObject::Cloud(cloud)
    }
}

impl From<Star> for SkyObject {
    fn from(star: Star) -> Self {
        SkyObject::Star(star)
    }
}

impl From<Moon> for SkyObject {
    fn from(moon: Moon) -> Self {
        SkyObject::Moon(moon)
    }
}

impl Drawable for SkyObject {
    fn draw(&self, canvas: &mut dyn Canvas, ctx: &WorldContext) {
        match self {
            SkyObject::Cloud(c) => canvas.draw_sprite(&c.sprite, c.palette, c.position),
            SkyObject::Star(s) if ctx.is_night => s.animation.draw(canvas, s.palette, s.position),
            SkyObject::Moon(m) if ctx.is_night => {
                let sprite = Moon::sprite_for_phase(ctx.night_count);
                canvas.draw_sprite(&sprite, m.palette, m.position);
            }
            _ => {}
        }
    }

    fn draw_order(&self) -> i32 {
        match self {
            SkyObject::Cloud(_) => CLOUD_DRAW_ORDER,
            SkyObject::Star(_) => STAR_DRAW_ORDER,
            SkyObject::Moon(_) => MOON_DRAW_ORDER,
        }
    }
}

impl GameEntity for SkyObject {
    fn update(&mut self, ctx: &WorldContext) -> Option<EntityEvent> {
        match self {
            SkyObject::Cloud(c) => drift(&mut c.position, ctx, CLOUD_SPEED_FACTOR),
            SkyObject::Star(s) => {
                drift(&mut s.position, ctx, STAR_SPEED_FACTOR);
                // no twinkling once the trex is dead
                if ctx.trex_alive {
                    s.animation.update(ctx.dt);
                }
            }
            SkyObject::Moon(m) => drift(&mut m.position, ctx, MOON_SPEED_FACTOR),
        }
        None
    }

    fn set_palette(&mut self, palette: Palette) {
        match self {
            SkyObject::Cloud(c) => c.palette = palette,
            SkyObject::Star(s) => s.palette = palette,
            SkyObject::Moon(m) => m.palette = palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::graphics::sprite::RecordingCanvas;

    fn ctx(is_night: bool, night_count: u32) -> WorldContext {
        WorldContext {
            dt: 1.0,
            trex_speed: 100.0,
            trex_alive: true,
            trex_collision_box: Rect::default(),
            is_night,
            night_count,
        }
    }

    #[test]
    fn test_moon_phases_walk_left_through_atlas() {
        let xs: Vec<i32> = (0..7).map(|n| Moon::sprite_for_phase(n).region.x).collect();
        assert_eq!(xs, vec![624, 604, 584, 544, 524, 504, 484]);
    }

    #[test]
    fn test_full_moon_is_double_width() {
        assert_eq!(Moon::sprite_for_phase(3).width(), 40);
        assert_eq!(Moon::sprite_for_phase(10).width(), 40);
        assert_eq!(Moon::sprite_for_phase(4).width(), 20);
    }

    #[test]
    fn test_parallax_speeds() {
        let mut cloud: SkyObject = Cloud::new(Vec2::new(500.0, 30.0), Palette::Normal).into();
        let mut star: SkyObject = Star::new(Vec2::new(500.0, 30.0), Palette::Normal).into();
        let mut moon: SkyObject = Moon::new(Vec2::new(500.0, 20.0), Palette::Normal).into();

        for object in [&mut cloud, &mut star, &mut moon] {
            object.update(&ctx(false, 0));
        }
        assert_eq!(cloud.position().x, 450.0);
        assert_eq!(star.position().x, 480.0);
        assert_eq!(moon.position().x, 490.0);
    }

    #[test]
    fn test_sky_holds_still_when_trex_dead() {
        let mut cloud: SkyObject = Cloud::new(Vec2::new(500.0, 30.0), Palette::Normal).into();
        let dead = WorldContext {
            trex_alive: false,
            ..ctx(false, 0)
        };
        cloud.update(&dead);
        assert_eq!(cloud.position().x, 500.0);
    }

    #[test]
    fn test_stars_and_moon_only_drawn_at_night() {
        let objects: Vec<SkyObject> = vec![
            Cloud::new(Vec2::new(0.0, 30.0), Palette::Normal).into(),
            Star::new(Vec2::new(0.0, 30.0), Palette::Normal).into(),
            Moon::new(Vec2::new(0.0, 20.0), Palette::Normal).into(),
        ];

        let mut day = RecordingCanvas::new();
        let mut night = RecordingCanvas::new();
        for object in &objects {
            object.draw(&mut day, &ctx(false, 2));
            object.draw(&mut night, &ctx(true, 2));
        }

        assert_eq!(day.kinds(), vec![SpriteKind::Cloud]);
        assert_eq!(
            night.kinds(),
            vec![SpriteKind::Cloud, SpriteKind::Star, SpriteKind::Moon]
        );
        assert_eq!(night.calls[2].0.region.x, 584);
    }

    #[test]
    fn test_star_twinkles_while_alive() {
        let mut star: SkyObject = Star::new(Vec2::new(300.0, 30.0), Palette::Normal).into();
        let short = WorldContext {
            dt: 0.5,
            ..ctx(true, 0)
        };
        star.update(&short);

        if let SkyObject::Star(s) = &star {
            assert_eq!(s.animation().current_frame().unwrap().sprite.region.y, 11);
        } else {
            panic!("expected a star");
        }
    }
}
