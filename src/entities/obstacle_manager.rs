//! Decides when and what to spawn, and retires obstacles that left the screen.

use super::obstacle::{CactusGroup, FlyingDino, GroupSize, Obstacle, FLYING_DINO_POSSIBLE_POS_Y};
use super::{Entity, EntityId, EntityManager, SpawnContext};
use crate::config::{ObstacleConfig, TrexConfig};
use crate::constants::WINDOW_WIDTH;
use crate::geometry::Vec2;
use log::debug;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObstacleKind {
    Cactus,
    FlyingDino,
}

#[derive(Debug, Clone)]
pub struct ObstacleManager {
    config: ObstacleConfig,
    start_speed: f32,
    max_speed: f32,
    is_enabled: bool,
    /// Score at the previous spawn; `None` until the first one of a run.
    last_spawn_score: Option<f64>,
    /// Score gap that must pass before the next spawn.
    current_target_distance: f64,
}

impl ObstacleManager {
    pub fn new(config: ObstacleConfig, trex: &TrexConfig) -> Self {
        Self {
            config,
            start_speed: trex.start_speed,
            max_speed: trex.max_speed,
            is_enabled: false,
            last_spawn_score: None,
            current_target_distance: 0.0,
        }
    }

    pub fn config(&self) -> &ObstacleConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Disabled managers still despawn, they just never spawn.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = enabled;
    }

    pub fn last_spawn_score(&self) -> Option<f64> {
        self.last_spawn_score
    }

    pub fn current_target_distance(&self) -> f64 {
        self.current_target_distance
    }

    /// Forget spawn history so the next eligible tick spawns immediately.
    /// Live obstacles are cleared by the world together with everything else.
    pub fn reset(&mut self) {
        self.last_spawn_score = None;
        self.current_target_distance = 0.0;
    }

    /// Despawn off-screen obstacles, then spawn a new one if due.
    ///
    /// Returns the id of the obstacle spawned this tick, if any.
    pub fn update<R: Rng>(
        &mut self,
        entities: &mut EntityManager<Entity>,
        spawn: &SpawnContext,
        rng: &mut R,
    ) -> Option<EntityId> {
        self.despawn(entities);

        if !self.is_enabled || !self.should_spawn(spawn.score) {
            return None;
        }

        let obstacle = self.create_obstacle(spawn, rng);
        self.last_spawn_score = Some(spawn.score);
        self.current_target_distance = self.next_target_distance(spawn.trex_speed, rng);

        debug!(
            "Spawned {} at score {:.1}, next in {:.1}",
            if obstacle.is_flying() { "flying dino" } else { "cactus group" },
            spawn.score,
            self.current_target_distance
        );
        Some(entities.add(obstacle))
    }

    fn should_spawn(&self, score: f64) -> bool {
        if score < self.config.min_spawn_score {
            return false;
        }
        match self.last_spawn_score {
            None => true,
            Some(last) => score - last >= self.current_target_distance,
        }
    }

    /// Uniform gap in `[min, max]` plus a bonus that grows linearly with speed.
    pub fn next_target_distance<R: Rng>(&self, trex_speed: f32, rng: &mut R) -> f64 {
        let base = rng.gen_range(self.config.min_distance..=self.config.max_distance);
        base + self.speed_bonus(trex_speed)
    }

    fn speed_bonus(&self, trex_speed: f32) -> f64 {
        let range = self.max_speed - self.start_speed;
        if range <= 0.0 {
            return 0.0;
        }
        let ratio = ((trex_speed - self.start_speed) / range).clamp(0.0, 1.0);
        ratio as f64 * self.config.speed_tolerance
    }

    fn choose_kind<R: Rng>(&self, score: f64, rng: &mut R) -> ObstacleKind {
        let flying_weight = if score >= self.config.flying_min_score {
            self.config.flying_weight
        } else {
            0
        };
        let total = self.config.cactus_weight + flying_weight;
        if total == 0 || rng.gen_range(0..total) < self.config.cactus_weight {
            ObstacleKind::Cactus
        } else {
            ObstacleKind::FlyingDino
        }
    }

    fn create_obstacle<R: Rng>(&self, spawn: &SpawnContext, rng: &mut R) -> Obstacle {
        match self.choose_kind(spawn.score, rng) {
            ObstacleKind::Cactus => {
                let is_large = rng.gen_bool(0.5);
                let size = GroupSize::ALL[rng.gen_range(0..GroupSize::ALL.len())];
                CactusGroup::new(WINDOW_WIDTH, is_large, size, spawn.palette).into()
            }
            ObstacleKind::FlyingDino => {
                let y = FLYING_DINO_POSSIBLE_POS_Y[rng.gen_range(0..FLYING_DINO_POSSIBLE_POS_Y.len())];
                FlyingDino::new(Vec2::new(WINDOW_WIDTH, y), spawn.palette).into()
            }
        }
    }

    fn despawn(&self, entities: &mut EntityManager<Entity>) {
        let gone: Vec<EntityId> = entities
            .entities_of_type::<Obstacle>()
            .filter(|(id, obstacle)| {
                obstacle.position().x < self.config.despawn_x && !entities.is_pending_removal(*id)
            })
            .map(|(id, _)| id)
            .collect();
        for id in gone {
            entities.remove(id);
        }
    }
}
