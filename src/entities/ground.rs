//! The scrolling floor, built from 600px tiles laid end to end.

use super::{
    scroll_left, Drawable, Entity, EntityEvent, EntityId, EntityManager, GameEntity, SpawnContext,
    WorldContext,
};
use crate::constants::{GROUND_DRAW_ORDER, GROUND_TILE_HEIGHT, GROUND_TILE_POS_Y, GROUND_TILE_WIDTH};
use crate::geometry::Vec2;
use crate::graphics::{Canvas, Palette, Sprite, SpriteKind};
use rand::Rng;

const GROUND_SPRITE_POS_X: i32 = 2;
const GROUND_SPRITE_POS_Y: i32 = 54;

#[derive(Debug, Clone)]
pub struct GroundTile {
    position: Vec2,
    sprite: Sprite,
    palette: Palette,
}

impl GroundTile {
    pub fn new(x: f32, bumpy: bool, palette: Palette) -> Self {
        let width = GROUND_TILE_WIDTH as i32;
        let sprite = if bumpy {
            Sprite::new(
                SpriteKind::BumpyGround,
                GROUND_SPRITE_POS_X + width,
                GROUND_SPRITE_POS_Y,
                width,
                GROUND_TILE_HEIGHT as i32,
            )
        } else {
            Sprite::new(
                SpriteKind::Ground,
                GROUND_SPRITE_POS_X,
                GROUND_SPRITE_POS_Y,
                width,
                GROUND_TILE_HEIGHT as i32,
            )
        };

        Self {
            position: Vec2::new(x, GROUND_TILE_POS_Y),
            sprite,
            palette,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_bumpy(&self) -> bool {
        self.sprite.kind == SpriteKind::BumpyGround
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }
}

impl Drawable for GroundTile {
    fn draw(&self, canvas: &mut dyn Canvas, _ctx: &WorldContext) {
        canvas.draw_sprite(&self.sprite, self.palette, self.position);
    }

    fn draw_order(&self) -> i32 {
        GROUND_DRAW_ORDER
    }
}

impl GameEntity for GroundTile {
    fn update(&mut self, ctx: &WorldContext) -> Option<EntityEvent> {
        scroll_left(&mut self.position, ctx.trex_speed, ctx.dt);
        None
    }

    fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }
}

/// Keeps the floor continuous. Tracks the ids of the tiles it spawned.
#[derive(Debug, Clone, Default)]
pub struct GroundManager {
    tile_ids: Vec<EntityId>,
}

impl GroundManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_ids(&self) -> &[EntityId] {
        &self.tile_ids
    }

    /// Forget old tiles and lay a single regular tile at the left edge.
    pub fn initialize(&mut self, entities: &mut EntityManager<Entity>, palette: Palette) {
        self.tile_ids.clear();
        let id = entities.add(GroundTile::new(0.0, false, palette));
        self.tile_ids.push(id);
    }

    pub fn update<R: Rng>(
        &mut self,
        entities: &mut EntityManager<Entity>,
        spawn: &SpawnContext,
        rng: &mut R,
    ) {
        // rightmost tile is always the last one spawned
        if let Some(last_x) = self.last_tile_x(entities) {
            if last_x < GROUND_TILE_WIDTH {
                // the new tile is committed after this tick's scroll, so start it one step back
                let x = last_x + GROUND_TILE_WIDTH - spawn.trex_speed * spawn.dt;
                let id = entities.add(GroundTile::new(x, rng.gen_bool(0.5), spawn.palette));
                self.tile_ids.push(id);
            }
        }

        let mut kept = Vec::with_capacity(self.tile_ids.len());
        for &id in &self.tile_ids {
            match entities.get::<GroundTile>(id) {
                Some(tile) if tile.position().x < -GROUND_TILE_WIDTH => {
                    entities.remove(id);
                }
                Some(_) => kept.push(id),
                None => {}
            }
        }
        self.tile_ids = kept;
    }

    fn last_tile_x(&self, entities: &EntityManager<Entity>) -> Option<f32> {
        self.tile_ids
            .last()
            .and_then(|id| entities.get::<GroundTile>(*id))
            .map(|tile| tile.position().x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tick(
        ground: &mut GroundManager,
        entities: &mut EntityManager<Entity>,
        rng: &mut ChaCha8Rng,
        speed: f32,
        dt: f32,
    ) {
        let spawn = SpawnContext {
            dt,
            score: 0.0,
            trex_speed: speed,
            palette: Palette::Normal,
        };
        ground.update(entities, &spawn, rng);
        entities.update(&WorldContext {
            dt,
            trex_speed: speed,
            trex_alive: true,
            trex_collision_box: Rect::default(),
            is_night: false,
            night_count: 0,
        });
    }

    fn tile_xs(entities: &EntityManager<Entity>) -> Vec<f32> {
        let mut xs: Vec<f32> = entities
            .entities_of_type::<GroundTile>()
            .map(|(_, t)| t.position().x)
            .collect();
        xs.sort_by(f32::total_cmp);
        xs
    }

    #[test]
    fn test_initialize_lays_one_regular_tile() {
        let mut ground = GroundManager::new();
        let mut entities = EntityManager::new();
        ground.initialize(&mut entities, Palette::Normal);
        entities.flush();

        let tiles: Vec<&GroundTile> = entities
            .entities_of_type::<GroundTile>()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].position(), Vec2::new(0.0, GROUND_TILE_POS_Y));
        assert!(!tiles[0].is_bumpy());
    }

    #[test]
    fn test_next_tile_is_flush() {
        let mut ground = GroundManager::new();
        let mut entities = EntityManager::new();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        ground.initialize(&mut entities, Palette::Normal);
        entities.flush();

        tick(&mut ground, &mut entities, &mut rng, 300.0, 0.5);
        assert_eq!(tile_xs(&entities), vec![-150.0, 450.0]);

        tick(&mut ground, &mut entities, &mut rng, 300.0, 0.5);
        // the previous tile is still short of the right edge, so one more is queued
        assert_eq!(tile_xs(&entities), vec![-300.0, 300.0, 900.0]);
    }

    #[test]
    fn test_floor_has_no_gaps() {
        let mut ground = GroundManager::new();
        let mut entities = EntityManager::new();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        ground.initialize(&mut entities, Palette::Normal);
        entities.flush();

        for _ in 0..600 {
            tick(&mut ground, &mut entities, &mut rng, 450.0, 1.0 / 60.0);
            let xs = tile_xs(&entities);
            assert!(xs[0] <= 0.0);
            assert!(*xs.last().unwrap() + GROUND_TILE_WIDTH >= crate::constants::WINDOW_WIDTH);
            for pair in xs.windows(2) {
                assert!((pair[1] - pair[0] - GROUND_TILE_WIDTH).abs() < 0.01);
            }
        }
    }

    #[test]
    fn test_tiles_past_left_edge_are_removed() {
        let mut ground = GroundManager::new();
        let mut entities = EntityManager::new();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        ground.initialize(&mut entities, Palette::Normal);
        entities.flush();

        for _ in 0..100 {
            tick(&mut ground, &mut entities, &mut rng, 600.0, 0.1);
        }
        assert!(entities.len() <= 3);
        assert_eq!(ground.tile_ids().len(), entities.len());
    }
}
