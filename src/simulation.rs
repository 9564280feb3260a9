//! The world: one object that owns every piece of the simulation and runs
//! a tick in a fixed order.
//!
//! Per tick: input → trex → ground, obstacle and sky managers → entity
//! updates (collisions are detected here) and commit → score. Nothing is
//! drawn during a tick; [`World::draw`] paints the current state on demand.

use crate::config::GameConfig;
use crate::constants::{SCORE_BOARD_POS_X, SCORE_BOARD_POS_Y, TREX_START_POS_X, TREX_START_POS_Y};
use crate::entities::{
    Drawable, Entity, EntityEvent, EntityManager, GroundManager, ObstacleManager, ScoreBoard,
    ScoreEvent, SkyEvent, SkyManager, SpawnContext, Trex, TrexEvent, TrexState, WorldContext,
};
use crate::geometry::Vec2;
use crate::graphics::{Canvas, Palette};
use crate::input::{InputController, InputSnapshot};
use log::{debug, info};
use rand::Rng;

/// Something that happened during a tick, for the session layer to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    /// A jump command was accepted.
    Jumped,
    JumpCompleted,
    /// The trex hit an obstacle. Carries the final display score.
    Died { score: i32 },
    NewHighScore(i32),
    ScoreMilestone(i32),
    NightStarted { night_count: u32 },
    DayStarted,
}

/// Events produced during one tick, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<WorldEvent>,
}

impl TickReport {
    pub fn contains(&self, event: &WorldEvent) -> bool {
        self.events.contains(event)
    }

    pub fn died(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, WorldEvent::Died { .. }))
    }
}

pub struct World<R: Rng> {
    config: GameConfig,
    rng: R,
    entities: EntityManager<Entity>,
    trex: Trex,
    score_board: ScoreBoard,
    obstacles: ObstacleManager,
    sky: SkyManager,
    ground: GroundManager,
    input: InputController,
    palette: Palette,
}

impl<R: Rng> World<R> {
    /// A fresh title-screen world: an idle trex on a single ground tile.
    pub fn new(config: GameConfig, rng: R) -> Self {
        let config = config.sanitized();
        let trex = Trex::new(
            config.trex.clone(),
            Vec2::new(TREX_START_POS_X, TREX_START_POS_Y),
        );
        let score_board = ScoreBoard::new(
            config.score.clone(),
            Vec2::new(SCORE_BOARD_POS_X, SCORE_BOARD_POS_Y),
        );
        let obstacles = ObstacleManager::new(config.obstacles.clone(), &config.trex);
        let sky = SkyManager::new(config.sky.clone());

        let mut world = Self {
            config,
            rng,
            entities: EntityManager::new(),
            trex,
            score_board,
            obstacles,
            sky,
            ground: GroundManager::new(),
            input: InputController::new(),
            palette: Palette::Normal,
        };
        world.ground.initialize(&mut world.entities, world.palette);
        world.entities.flush();
        world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn trex(&self) -> &Trex {
        &self.trex
    }

    pub fn trex_mut(&mut self) -> &mut Trex {
        &mut self.trex
    }

    pub fn score_board(&self) -> &ScoreBoard {
        &self.score_board
    }

    pub fn score_board_mut(&mut self) -> &mut ScoreBoard {
        &mut self.score_board
    }

    pub fn entities(&self) -> &EntityManager<Entity> {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager<Entity> {
        &mut self.entities
    }

    pub fn obstacles(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn sky(&self) -> &SkyManager {
        &self.sky
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// True once the first jump left the title screen.
    pub fn is_started(&self) -> bool {
        self.trex.state() != TrexState::Idle
    }

    pub fn set_obstacles_enabled(&mut self, enabled: bool) {
        self.obstacles.set_enabled(enabled);
    }

    /// Leave the title screen with the first jump.
    pub fn start(&mut self) -> bool {
        self.trex.state() == TrexState::Idle && self.trex.begin_jump()
    }

    /// Start a new run after a game over. Spawning is enabled immediately.
    pub fn replay(&mut self) {
        info!(
            "Replay after score {} (hi {})",
            self.score_board.display_score(),
            self.score_board.hi_score()
        );
        self.entities.clear();
        self.obstacles.reset();
        self.obstacles.set_enabled(true);
        self.sky.reset();
        self.ground.initialize(&mut self.entities, self.palette);
        self.trex.initialize();
        self.score_board.reset();
        self.input.reset();
        self.entities.flush();
    }

    fn context(&self, dt: f32) -> WorldContext {
        WorldContext {
            dt,
            trex_speed: self.trex.speed(),
            trex_alive: self.trex.is_alive(),
            trex_collision_box: self.trex.collision_box(),
            is_night: self.sky.is_night(),
            night_count: self.sky.night_count(),
        }
    }

    fn apply_palette(&mut self, palette: Palette) {
        debug!("Palette switched to {:?}", palette);
        self.palette = palette;
        self.entities.set_palette(palette);
        self.trex.set_palette(palette);
        self.score_board.set_palette(palette);
    }

    /// Advance the world by `dt` seconds. A dead trex freezes everything
    /// until [`World::replay`].
    pub fn tick(&mut self, dt: f32, input: InputSnapshot) -> TickReport {
        let mut report = TickReport::default();
        if !self.trex.is_alive() {
            return report;
        }

        if self.input.process(&mut self.trex, input).jumped {
            report.events.push(WorldEvent::Jumped);
        }
        if let Some(TrexEvent::JumpCompleted) = self.trex.update(dt, &mut self.rng) {
            report.events.push(WorldEvent::JumpCompleted);
        }

        // title screen: the world holds still until the first jump
        if !self.is_started() {
            return report;
        }

        let spawn = SpawnContext {
            dt,
            score: self.score_board.score(),
            trex_speed: self.trex.speed(),
            palette: self.palette,
        };
        self.ground.update(&mut self.entities, &spawn, &mut self.rng);
        self.obstacles
            .update(&mut self.entities, &spawn, &mut self.rng);
        for event in self.sky.update(&mut self.entities, &spawn, &mut self.rng) {
            match event {
                SkyEvent::NightStarted { night_count } => {
                    report.events.push(WorldEvent::NightStarted { night_count })
                }
                SkyEvent::DayStarted => report.events.push(WorldEvent::DayStarted),
                SkyEvent::PaletteChanged(palette) => self.apply_palette(palette),
            }
        }

        let ctx = self.context(dt);
        for (id, event) in self.entities.update(&ctx) {
            match event {
                EntityEvent::HitTrex => {
                    if let Some(TrexEvent::Died) = self.trex.die() {
                        debug!("Trex hit by {:?}", id);
                        self.on_death(&mut report);
                    }
                }
            }
        }

        if self.trex.is_alive() {
            if let Some(ScoreEvent::Milestone(score)) =
                self.score_board.update(dt, self.trex.speed())
            {
                report.events.push(WorldEvent::ScoreMilestone(score));
            }
        }
        report
    }

    fn on_death(&mut self, report: &mut TickReport) {
        let score = self.score_board.display_score();
        info!("Trex died with score {}", score);
        report.events.push(WorldEvent::Died { score });

        if score > self.score_board.hi_score() {
            info!("New high score {}", score);
            self.score_board.set_hi_score(score);
            report.events.push(WorldEvent::NewHighScore(score));
        }
    }

    /// Paint the current state back to front.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(self.sky.clear_color_scalar());
        let ctx = self.context(0.0);
        let extra: [&dyn Drawable; 2] = [&self.trex, &self.score_board];
        self.entities.draw_with(&extra, canvas, &ctx);
        if self.sky.overlay_alpha() > 0.0 {
            canvas.fill_overlay(self.sky.overlay_alpha());
        }
    }
}
