//! Simulated objects and the managers that spawn and retire them.
//!
//! Everything that scrolls with the world (obstacles, sky objects, ground
//! tiles) is an [`Entity`] owned by the [`EntityManager`]. The managers
//! only remember the [`EntityId`]s they created and find the rest through
//! [`EntityManager::entities_of_type`].

pub mod entity_manager;
pub mod ground;
pub mod obstacle;
pub mod obstacle_manager;
pub mod score_board;
pub mod sky;
pub mod sky_manager;
pub mod trex;

pub use entity_manager::{EntityId, EntityManager};
pub use ground::{GroundManager, GroundTile};
pub use obstacle::Obstacle;
pub use obstacle_manager::ObstacleManager;
pub use score_board::{ScoreBoard, ScoreEvent};
pub use sky::{Cloud, Moon, SkyObject, Star};
pub use sky_manager::{SkyEvent, SkyManager};
pub use trex::{Trex, TrexEvent, TrexState};

use crate::geometry::{Rect, Vec2};
use crate::graphics::{Canvas, Palette};

/// Read-only snapshot of the world handed to every entity for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldContext {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Current world scroll speed (px/s).
    pub trex_speed: f32,
    pub trex_alive: bool,
    pub trex_collision_box: Rect,
    pub is_night: bool,
    pub night_count: u32,
}

/// What the spawning managers need to know about the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnContext {
    pub dt: f32,
    /// Accumulated (fractional) score.
    pub score: f64,
    pub trex_speed: f32,
    /// Palette new entities start with.
    pub palette: Palette,
}

/// Something an entity reports back from its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityEvent {
    /// The entity's collision box overlapped the trex.
    HitTrex,
}

/// Anything that can be painted in the layered draw pass.
pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas, ctx: &WorldContext);

    /// Lower values are painted first (further back).
    fn draw_order(&self) -> i32;
}

/// A unit of simulation owned by the [`EntityManager`].
pub trait GameEntity: Drawable {
    fn update(&mut self, ctx: &WorldContext) -> Option<EntityEvent>;

    /// Swap to the atlas matching the day/night phase. No-op for entities
    /// that never change colour.
    fn set_palette(&mut self, _palette: Palette) {}
}

/// Typed access to one variant of an entity collection.
pub trait EntityVariant<E>: Sized {
    fn view(entity: &E) -> Option<&Self>;
    fn view_mut(entity: &mut E) -> Option<&mut Self>;
}

/// Move a position left at `speed` px/s for `dt` seconds.
pub fn scroll_left(position: &mut Vec2, speed: f32, dt: f32) {
    position.x -= speed * dt;
}

/// Every kind of entity the game spawns.
#[derive(Debug, Clone)]
pub enum Entity {
    Obstacle(Obstacle),
    Sky(SkyObject),
    Ground(GroundTile),
}

impl Drawable for Entity {
    fn draw(&self, canvas: &mut dyn Canvas, ctx: &WorldContext) {
        match self {
            Entity::Obstacle(o) => o.draw(canvas, ctx),
            Entity::Sky(s) => s.draw(canvas, ctx),
            Entity::Ground(g) => g.draw(canvas, ctx),
        }
    }

    fn draw_order(&self) -> i32 {
        match self {
            Entity::Obstacle(o) => o.draw_order(),
            Entity::Sky(s) => s.draw_order(),
            Entity::Ground(g) => g.draw_order(),
        }
    }
}

impl GameEntity for Entity {
    fn update(&mut self, ctx: &WorldContext) -> Option<EntityEvent> {
        match self {
            Entity::Obstacle(o) => o.update(ctx),
            Entity::Sky(s) => s.update(ctx),
            Entity::Ground(g) => g.update(ctx),
        }
    }

    fn set_palette(&mut self, palette: Palette) {
        match self {
            Entity::Obstacle(o) => o.set_palette(palette),
            Entity::Sky(s) => s.set_palette(palette),
            Entity::Ground(g) => g.set_palette(palette),
        }
    }
}

impl From<Obstacle> for Entity {
    fn from(obstacle: Obstacle) -> Self {
        Entity::Obstacle(obstacle)
    }
}

impl From<SkyObject> for Entity {
    fn from(sky: SkyObject) -> Self {
        Entity::Sky(sky)
    }
}

impl From<GroundTile> for Entity {
    fn from(tile: GroundTile) -> Self {
        Entity::Ground(tile)
    }
}

/// Implements [`EntityVariant<Entity>`] for a type reachable by one match pattern.
macro_rules! entity_variant {
    ($ty:ty, $binding:ident => $pattern:pat) => {
        impl EntityVariant<Entity> for $ty {
            fn view(entity: &Entity) -> Option<&Self> {
                match entity {
                    $pattern => Some($binding),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn view_mut(entity: &mut Entity) -> Option<&mut Self> {
                match entity {
                    $pattern => Some($binding),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

entity_variant!(Obstacle, o => Entity::Obstacle(o));
entity_variant!(SkyObject, s => Entity::Sky(s));
entity_variant!(Cloud, c => Entity::Sky(SkyObject::Cloud(c)));
entity_variant!(Star, s => Entity::Sky(SkyObject::Star(s)));
entity_variant!(Moon, m => Entity::Sky(SkyObject::Moon(m)));
entity_variant!(GroundTile, g => Entity::Ground(g));
