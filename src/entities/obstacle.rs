//! Hazards: cactus groups on the ground and flying dinos in the air.

use super::{scroll_left, Drawable, EntityEvent, GameEntity, WorldContext};
use crate::constants::OBSTACLE_DRAW_ORDER;
use crate::geometry::{Rect, Vec2};
use crate::graphics::{Canvas, Palette, Sprite, SpriteAnimation, SpriteKind};

pub const SMALL_CACTUS_SPRITE_POS_X: i32 = 228;
pub const SMALL_CACTUS_SPRITE_WIDTH: i32 = 17;
pub const SMALL_CACTUS_SPRITE_HEIGHT: i32 = 36;
pub const SMALL_CACTUS_POS_Y: f32 = 94.0;

pub const LARGE_CACTUS_SPRITE_POS_X: i32 = 332;
pub const LARGE_CACTUS_SPRITE_WIDTH: i32 = 25;
pub const LARGE_CACTUS_SPRITE_HEIGHT: i32 = 51;
pub const LARGE_CACTUS_POS_Y: f32 = 80.0;

const CACTUS_COLLISION_BOX_INSET: i32 = 3;

pub const FLYING_DINO_SPRITE_POS_X: i32 = 134;
pub const FLYING_DINO_SPRITE_POS_Y: i32 = 0;
pub const FLYING_DINO_SPRITE_WIDTH: i32 = 46;
pub const FLYING_DINO_SPRITE_HEIGHT: i32 = 42;
const FLYING_DINO_ANIMATION_FRAME_LENGTH: f32 = 0.2;
/// Flying dinos move towards the trex on top of the world scroll (px/s).
pub const FLYING_DINO_SPEED: f32 = 80.0;
const FLYING_DINO_COLLISION_INSET_H: i32 = 4;
const FLYING_DINO_COLLISION_INSET_V: i32 = 10;

/// Altitudes a flying dino may spawn at: below the ducking head, at head
/// height, and high overhead.
pub const FLYING_DINO_POSSIBLE_POS_Y: [f32; 3] = [90.0, 62.0, 24.0];

/// Number of cacti standing side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSize {
    Small,
    Medium,
    Large,
}

impl GroupSize {
    pub const ALL: [GroupSize; 3] = [GroupSize::Small, GroupSize::Medium, GroupSize::Large];

    pub fn count(&self) -> i32 {
        match self {
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
        }
    }

    /// Offset (in cactus widths) of the group's first cactus in the atlas.
    fn atlas_offset(&self) -> i32 {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CactusGroup {
    position: Vec2,
    is_large: bool,
    size: GroupSize,
    sprite: Sprite,
    palette: Palette,
}

impl CactusGroup {
    /// A group standing on the ground with its left edge at `x`.
    pub fn new(x: f32, is_large: bool, size: GroupSize, palette: Palette) -> Self {
        let (kind, atlas_x, width, height, y) = if is_large {
            (
                SpriteKind::LargeCactus,
                LARGE_CACTUS_SPRITE_POS_X,
                LARGE_CACTUS_SPRITE_WIDTH,
                LARGE_CACTUS_SPRITE_HEIGHT,
                LARGE_CACTUS_POS_Y,
            )
        } else {
            (
                SpriteKind::SmallCactus,
                SMALL_CACTUS_SPRITE_POS_X,
                SMALL_CACTUS_SPRITE_WIDTH,
                SMALL_CACTUS_SPRITE_HEIGHT,
                SMALL_CACTUS_POS_Y,
            )
        };

        Self {
            position: Vec2::new(x, y),
            is_large,
            size,
            sprite: Sprite::new(
                kind,
                atlas_x + width * size.atlas_offset(),
                0,
                width * size.count(),
                height,
            ),
            palette,
        }
    }

    pub fn is_large(&self) -> bool {
        self.is_large
    }

    pub fn size(&self) -> GroupSize {
        self.size
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn collision_box(&self) -> Rect {
        Rect::at(self.position, self.sprite.width(), self.sprite.height())
            .inflate(-CACTUS_COLLISION_BOX_INSET, -CACTUS_COLLISION_BOX_INSET)
    }
}

#[derive(Debug, Clone)]
pub struct FlyingDino {
    position: Vec2,
    animation: SpriteAnimation,
    palette: Palette,
}

impl FlyingDino {
    pub fn new(position: Vec2, palette: Palette) -> Self {
        let mut animation = SpriteAnimation::simple(
            Sprite::new(
                SpriteKind::FlyingDino,
                FLYING_DINO_SPRITE_POS_X,
                FLYING_DINO_SPRITE_POS_Y,
                FLYING_DINO_SPRITE_WIDTH,
                FLYING_DINO_SPRITE_HEIGHT,
            ),
            (FLYING_DINO_SPRITE_WIDTH, 0),
            2,
            FLYING_DINO_ANIMATION_FRAME_LENGTH,
        );
        animation.play();

        Self {
            position,
            animation,
            palette,
        }
    }

    pub fn collision_box(&self) -> Rect {
        Rect::at(
            self.position,
            FLYING_DINO_SPRITE_WIDTH,
            FLYING_DINO_SPRITE_HEIGHT,
        )
        .inflate(-FLYING_DINO_COLLISION_INSET_H, -FLYING_DINO_COLLISION_INSET_V)
    }
}

/// Anything the trex can run into.
#[derive(Debug, Clone)]
pub enum Obstacle {
    Cactus(CactusGroup),
    FlyingDino(FlyingDino),
}

impl Obstacle {
    pub fn position(&self) -> Vec2 {
        match self {
            Obstacle::Cactus(c) => c.position,
            Obstacle::FlyingDino(d) => d.position,
        }
    }

    /// Teleport the obstacle. Spawning and tests only.
    pub fn set_position(&mut self, position: Vec2) {
        match self {
            Obstacle::Cactus(c) => c.position = position,
            Obstacle::FlyingDino(d) => d.position = position,
        }
    }

    pub fn collision_box(&self) -> Rect {
        match self {
            Obstacle::Cactus(c) => c.collision_box(),
            Obstacle::FlyingDino(d) => d.collision_box(),
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Obstacle::Cactus(c) => c.palette,
            Obstacle::FlyingDino(d) => d.palette,
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, Obstacle::FlyingDino(_))
    }
}

impl From<CactusGroup> for Obstacle {
    fn from(cactus: CactusGroup) -> Self {
        Obstacle::Cactus(cactus)
    }
}

impl From<FlyingDino> for Obstacle {
    fn from(dino: FlyingDino) -> Self {
        Obstacle::FlyingDino(dino)
    }
}

impl Drawable for Obstacle {
    fn draw(&self, canvas: &mut dyn Canvas, _ctx: &WorldContext) {
        match self {
            Obstacle::Cactus(c) => canvas.draw_sprite(&c.sprite, c.palette, c.position),
            Obstacle::FlyingDino(d) => d.animation.draw(canvas, d.palette, d.position),
        }
    }

    fn draw_order(&self) -> i32 {
        OBSTACLE_DRAW_ORDER
    }
}

impl GameEntity for Obstacle {
    fn update(&mut self, ctx: &WorldContext) -> Option<EntityEvent> {
        match self {
            Obstacle::Cactus(c) => scroll_left(&mut c.position, ctx.trex_speed, ctx.dt),
            Obstacle::FlyingDino(d) => {
                scroll_left(&mut d.position, ctx.trex_speed, ctx.dt);
                if ctx.trex_alive {
                    d.position.x -= FLYING_DINO_SPEED * ctx.dt;
                    d.animation.update(ctx.dt);
                }
            }
        }

        (ctx.trex_alive && self.collision_box().intersects(&ctx.trex_collision_box))
            .then_some(EntityEvent::HitTrex)
    }

    fn set_palette(&mut self, palette: Palette) {
        match self {
            Obstacle::Cactus(c) => c.palette = palette,
            Obstacle::FlyingDino(d) => d.palette = palette,
        }
    }
}
