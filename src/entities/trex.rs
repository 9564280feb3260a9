//! The player character: a small physics body driven by a state machine.
//!
//! Commands (`begin_jump`, `cancel_jump`, `duck`, `get_up`, `drop`, `die`)
//! return `false` when the current state does not allow them. That is the
//! normal outcome of mashing keys, not an error, so callers may ignore it.

use super::{Drawable, WorldContext};
use crate::config::TrexConfig;
use crate::constants::TREX_DRAW_ORDER;
use crate::geometry::{Rect, Vec2};
use crate::graphics::{Canvas, Palette, Sprite, SpriteAnimation, SpriteKind};
use rand::Rng;

const TREX_IDLE_BACKGROUND_SPRITE_POS_X: i32 = 40;
const TREX_IDLE_BACKGROUND_SPRITE_POS_Y: i32 = 0;

pub const TREX_DEFAULT_SPRITE_POS_X: i32 = 848;
pub const TREX_DEFAULT_SPRITE_POS_Y: i32 = 0;
pub const TREX_DEFAULT_SPRITE_WIDTH: i32 = 44;
pub const TREX_DEFAULT_SPRITE_HEIGHT: i32 = 52;

const TREX_RUNNING_ANIMATION_FRAME_LENGTH: f32 = 0.1;
const TREX_DUCKING_SPRITE_WIDTH: i32 = 59;
const TREX_DUCKING_SPRITE_ONE_POS_X: i32 = TREX_DEFAULT_SPRITE_POS_X + TREX_DEFAULT_SPRITE_WIDTH * 6;
const TREX_DEAD_SPRITE_POS_X: i32 = TREX_DEFAULT_SPRITE_POS_X + TREX_DEFAULT_SPRITE_WIDTH * 5;

const BLINK_ANIMATION_EYE_CLOSE_TIME: f32 = 0.5;

/// Pixels taken off each side of the sprite for the collision box.
pub const COLLISION_BOX_INSET: i32 = 3;
/// Extra pixels taken off the top of the collision box while ducking.
pub const DUCK_COLLISION_REDUCTION: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrexState {
    Idle,
    Running,
    Jumping,
    Falling,
    Ducking,
}

/// Lifecycle notifications produced by [`Trex::update`] and [`Trex::die`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrexEvent {
    JumpCompleted,
    Died,
}

#[derive(Debug, Clone)]
pub struct Trex {
    config: TrexConfig,
    position: Vec2,
    /// Sprite top when standing on the ground.
    start_pos_y: f32,
    state: TrexState,
    is_alive: bool,
    speed: f32,
    vertical_velocity: f32,
    drop_velocity: f32,
    palette: Palette,

    idle_background_sprite: Sprite,
    idle_sprite: Sprite,
    idle_blink_sprite: Sprite,
    dead_sprite: Sprite,
    blink_animation: SpriteAnimation,
    run_animation: SpriteAnimation,
    duck_animation: SpriteAnimation,
}

impl Trex {
    /// Create an idle trex whose feet rest on the ground line at `position`.
    pub fn new(config: TrexConfig, position: Vec2) -> Self {
        let idle_sprite = Sprite::new(
            SpriteKind::Trex,
            TREX_DEFAULT_SPRITE_POS_X,
            TREX_DEFAULT_SPRITE_POS_Y,
            TREX_DEFAULT_SPRITE_WIDTH,
            TREX_DEFAULT_SPRITE_HEIGHT,
        );
        let idle_blink_sprite = Sprite::new(
            SpriteKind::Trex,
            TREX_DEFAULT_SPRITE_POS_X + TREX_DEFAULT_SPRITE_WIDTH,
            TREX_DEFAULT_SPRITE_POS_Y,
            TREX_DEFAULT_SPRITE_WIDTH,
            TREX_DEFAULT_SPRITE_HEIGHT,
        );

        let mut run_animation = SpriteAnimation::simple(
            Sprite::new(
                SpriteKind::Trex,
                TREX_DEFAULT_SPRITE_POS_X + TREX_DEFAULT_SPRITE_WIDTH * 2,
                TREX_DEFAULT_SPRITE_POS_Y,
                TREX_DEFAULT_SPRITE_WIDTH,
                TREX_DEFAULT_SPRITE_HEIGHT,
            ),
            (TREX_DEFAULT_SPRITE_WIDTH, 0),
            2,
            TREX_RUNNING_ANIMATION_FRAME_LENGTH,
        );
        run_animation.play();

        let mut duck_animation = SpriteAnimation::simple(
            Sprite::new(
                SpriteKind::TrexDucking,
                TREX_DUCKING_SPRITE_ONE_POS_X,
                TREX_DEFAULT_SPRITE_POS_Y,
                TREX_DUCKING_SPRITE_WIDTH,
                TREX_DEFAULT_SPRITE_HEIGHT,
            ),
            (TREX_DUCKING_SPRITE_WIDTH, 0),
            2,
            TREX_RUNNING_ANIMATION_FRAME_LENGTH,
        );
        duck_animation.play();

        Self {
            speed: config.start_speed,
            config,
            position,
            start_pos_y: position.y,
            state: TrexState::Idle,
            is_alive: true,
            vertical_velocity: 0.0,
            drop_velocity: 0.0,
            palette: Palette::Normal,
            // little idle sprite that has the ground drawn with it
            idle_background_sprite: Sprite::new(
                SpriteKind::TrexIdleBackground,
                TREX_IDLE_BACKGROUND_SPRITE_POS_X,
                TREX_IDLE_BACKGROUND_SPRITE_POS_Y,
                TREX_DEFAULT_SPRITE_WIDTH,
                TREX_DEFAULT_SPRITE_HEIGHT,
            ),
            idle_sprite,
            idle_blink_sprite,
            dead_sprite: Sprite::new(
                SpriteKind::TrexDead,
                TREX_DEAD_SPRITE_POS_X,
                TREX_DEFAULT_SPRITE_POS_Y,
                TREX_DEFAULT_SPRITE_WIDTH,
                TREX_DEFAULT_SPRITE_HEIGHT,
            ),
            blink_animation: SpriteAnimation::new(),
            run_animation,
            duck_animation,
        }
    }

    /// Reset for a new run: running on the ground at start speed.
    pub fn initialize(&mut self) {
        self.speed = self.config.start_speed;
        self.state = TrexState::Running;
        self.is_alive = true;
        self.position.y = self.start_pos_y;
        self.vertical_velocity = 0.0;
        self.drop_velocity = 0.0;
    }

    pub fn state(&self) -> TrexState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.state, TrexState::Jumping | TrexState::Falling)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn ground_line(&self) -> f32 {
        self.start_pos_y
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn config(&self) -> &TrexConfig {
        &self.config
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Deflated sprite bounds, lowered further while ducking.
    pub fn collision_box(&self) -> Rect {
        let mut rect = Rect::at(
            self.position,
            TREX_DEFAULT_SPRITE_WIDTH,
            TREX_DEFAULT_SPRITE_HEIGHT,
        )
        .inflate(-COLLISION_BOX_INSET, -COLLISION_BOX_INSET);

        if self.state == TrexState::Ducking {
            rect.y += DUCK_COLLISION_REDUCTION;
            rect.height -= DUCK_COLLISION_REDUCTION;
        }
        rect
    }

    /// Leave the ground. Valid from Idle (starts the game), Running and Ducking.
    pub fn begin_jump(&mut self) -> bool {
        if !self.is_alive || self.is_airborne() {
            return false;
        }
        self.state = TrexState::Jumping;
        self.vertical_velocity = self.config.jump_start_velocity;
        true
    }

    /// Cut a jump short once it has reached the minimum height.
    pub fn cancel_jump(&mut self) -> bool {
        if self.state != TrexState::Jumping
            || (self.start_pos_y - self.position.y) < self.config.min_jump_height
        {
            return false;
        }
        self.vertical_velocity = if self.vertical_velocity < self.config.cancel_jump_velocity {
            self.config.cancel_jump_velocity
        } else {
            0.0
        };
        self.state = TrexState::Falling;
        true
    }

    pub fn duck(&mut self) -> bool {
        if !self.is_alive || self.state != TrexState::Running {
            return false;
        }
        self.state = TrexState::Ducking;
        true
    }

    pub fn get_up(&mut self) -> bool {
        if self.state != TrexState::Ducking {
            return false;
        }
        self.state = TrexState::Running;
        true
    }

    /// Fall faster while airborne.
    pub fn drop(&mut self) -> bool {
        if !self.is_alive || !self.is_airborne() {
            return false;
        }
        self.state = TrexState::Falling;
        self.drop_velocity = self.config.drop_velocity;
        true
    }

    /// One-way switch to dead. Returns the death event only the first time.
    pub fn die(&mut self) -> Option<TrexEvent> {
        if !self.is_alive {
            return None;
        }
        self.is_alive = false;
        self.speed = 0.0;
        Some(TrexEvent::Died)
    }

    /// Advance physics and animation by `dt` seconds.
    ///
    /// Returns [`TrexEvent::JumpCompleted`] on the tick the trex lands.
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Option<TrexEvent> {
        if !self.is_alive {
            return None;
        }

        let mut event = None;
        match self.state {
            TrexState::Idle => {
                if !self.blink_animation.is_playing() {
                    self.create_blink_animation(rng);
                    self.blink_animation.play();
                }
                self.blink_animation.update(dt);
            }
            TrexState::Jumping | TrexState::Falling => {
                self.position.y += self.vertical_velocity * dt + self.drop_velocity * dt;
                self.vertical_velocity += self.config.gravity * dt;

                if self.vertical_velocity >= 0.0 {
                    self.state = TrexState::Falling;
                }

                if self.position.y >= self.start_pos_y {
                    self.position.y = self.start_pos_y;
                    self.vertical_velocity = 0.0;
                    self.drop_velocity = 0.0;
                    self.state = TrexState::Running;
                    event = Some(TrexEvent::JumpCompleted);
                }
            }
            TrexState::Running => self.run_animation.update(dt),
            TrexState::Ducking => self.duck_animation.update(dt),
        }

        if self.state != TrexState::Idle {
            self.speed = (self.speed + self.config.acceleration * dt).min(self.config.max_speed);
        }
        event
    }

    /// Eyes open, close after a random wait, open again.
    fn create_blink_animation<R: Rng>(&mut self, rng: &mut R) {
        self.blink_animation.clear();
        self.blink_animation.should_loop = false;

        let blink_timestamp =
            rng.gen_range(self.config.blink_min_seconds..=self.config.blink_max_seconds);
        self.blink_animation.add_frame(self.idle_sprite, 0.0);
        self.blink_animation
            .add_frame(self.idle_blink_sprite, blink_timestamp);
        self.blink_animation.add_frame(
            self.idle_sprite,
            blink_timestamp + BLINK_ANIMATION_EYE_CLOSE_TIME,
        );
    }

    /// Length of the blink cycle currently playing (0 before the first idle update).
    pub fn blink_duration(&self) -> f32 {
        self.blink_animation.duration()
    }
}

impl Drawable for Trex {
    fn draw(&self, canvas: &mut dyn Canvas, _ctx: &WorldContext) {
        if !self.is_alive {
            canvas.draw_sprite(&self.dead_sprite, self.palette, self.position);
            return;
        }

        match self.state {
            TrexState::Idle => {
                // ground and blink drawn together so the title screen looks alive
                canvas.draw_sprite(&self.idle_background_sprite, self.palette, self.position);
                self.blink_animation
                    .draw(canvas, self.palette, self.position);
            }
            TrexState::Jumping | TrexState::Falling => {
                canvas.draw_sprite(&self.idle_sprite, self.palette, self.position);
            }
            TrexState::Running => self.run_animation.draw(canvas, self.palette, self.position),
            TrexState::Ducking => self.duck_animation.draw(canvas, self.palette, self.position),
        }
    }

    fn draw_order(&self) -> i32 {
        TREX_DRAW_ORDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const GROUND: f32 = 82.0;

    fn running_trex() -> Trex {
        let mut trex = Trex::new(TrexConfig::default(), Vec2::new(1.0, GROUND));
        trex.initialize();
        trex
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_new_trex_is_idle_and_alive() {
        let trex = Trex::new(TrexConfig::default(), Vec2::new(1.0, GROUND));
        assert_eq!(trex.state(), TrexState::Idle);
        assert!(trex.is_alive());
        assert_eq!(trex.ground_line(), GROUND);
    }

    #[test]
    fn test_begin_jump_from_idle_and_running() {
        let mut idle = Trex::new(TrexConfig::default(), Vec2::new(1.0, GROUND));
        assert!(idle.begin_jump());
        assert_eq!(idle.state(), TrexState::Jumping);

        let mut running = running_trex();
        assert!(running.begin_jump());
        assert_eq!(running.vertical_velocity(), -480.0);
    }

    #[test]
    fn test_cannot_jump_while_airborne() {
        let mut trex = running_trex();
        assert!(trex.begin_jump());
        assert!(!trex.begin_jump());

        trex.update(0.3, &mut rng());
        assert_eq!(trex.state(), TrexState::Falling);
        assert!(!trex.begin_jump());
    }

    #[test]
    fn test_cancel_jump_below_min_height_is_noop() {
        let mut trex = running_trex();
        trex.begin_jump();
        trex.update(0.01, &mut rng()); // ~4.8px up

        let velocity = trex.vertical_velocity();
        assert!(!trex.cancel_jump());
        assert_eq!(trex.state(), TrexState::Jumping);
        assert_eq!(trex.vertical_velocity(), velocity);
    }

    #[test]
    fn test_cancel_jump_after_min_height_falls() {
        let mut trex = running_trex();
        trex.begin_jump();
        trex.update(0.1, &mut rng()); // 48px up, still rising fast

        assert!(trex.cancel_jump());
        assert_eq!(trex.state(), TrexState::Falling);
        assert_eq!(trex.vertical_velocity(), -100.0);
    }

    #[test]
    fn test_landing_snaps_to_ground_and_reports_once() {
        let mut trex = running_trex();
        trex.begin_jump();

        let mut rng = rng();
        let mut completions = 0;
        for _ in 0..200 {
            if trex.update(1.0 / 60.0, &mut rng) == Some(TrexEvent::JumpCompleted) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(trex.state(), TrexState::Running);
        assert_eq!(trex.position().y, GROUND);
        assert_eq!(trex.vertical_velocity(), 0.0);
    }

    #[test]
    fn test_duck_only_on_ground() {
        let mut trex = running_trex();
        assert!(trex.duck());
        assert_eq!(trex.state(), TrexState::Ducking);
        assert!(trex.get_up());
        assert_eq!(trex.state(), TrexState::Running);

        trex.begin_jump();
        assert!(!trex.duck());
        assert!(!trex.get_up());
    }

    #[test]
    fn test_ducking_shrinks_collision_box_only() {
        let mut trex = running_trex();
        let standing = trex.collision_box();
        let y_before = trex.position().y;

        trex.duck();
        trex.update(0.1, &mut rng());
        let ducking = trex.collision_box();

        assert_eq!(trex.state(), TrexState::Ducking);
        assert_eq!(trex.position().y, y_before);
        assert_eq!(ducking.height, standing.height - DUCK_COLLISION_REDUCTION);
        assert_eq!(ducking.bottom(), standing.bottom());
    }

    #[test]
    fn test_drop_only_while_airborne() {
        let mut trex = running_trex();
        assert!(!trex.drop());

        trex.begin_jump();
        assert!(trex.drop());
        assert_eq!(trex.state(), TrexState::Falling);
    }

    #[test]
    fn test_drop_lands_sooner() {
        let mut rng = rng();
        let ticks_to_land = |drop: bool, rng: &mut ChaCha8Rng| {
            let mut trex = running_trex();
            trex.begin_jump();
            if drop {
                trex.drop();
            }
            (1..1000)
                .find(|_| trex.update(1.0 / 60.0, rng) == Some(TrexEvent::JumpCompleted))
                .unwrap()
        };
        assert!(ticks_to_land(true, &mut rng) < ticks_to_land(false, &mut rng));
    }

    #[test]
    fn test_speed_accelerates_and_caps() {
        let mut trex = running_trex();
        let mut rng = rng();
        let mut previous = trex.speed();
        for _ in 0..1000 {
            trex.update(1.0, &mut rng);
            assert!(trex.speed() >= previous);
            assert!(trex.speed() <= trex.config().max_speed);
            previous = trex.speed();
        }
        assert_eq!(trex.speed(), 900.0);

        trex.initialize();
        assert_eq!(trex.speed(), 280.0);
    }

    #[test]
    fn test_idle_speed_does_not_change() {
        let mut trex = Trex::new(TrexConfig::default(), Vec2::new(1.0, GROUND));
        trex.update(5.0, &mut rng());
        assert_eq!(trex.speed(), 280.0);
    }

    #[test]
    fn test_die_is_one_way() {
        let mut trex = running_trex();
        assert_eq!(trex.die(), Some(TrexEvent::Died));
        assert_eq!(trex.die(), None);
        assert!(!trex.is_alive());
        assert!(!trex.begin_jump());
        assert!(!trex.duck());

        trex.initialize();
        assert!(trex.is_alive());
    }

    #[test]
    fn test_blink_timer_rerandomizes_in_range() {
        let mut trex = Trex::new(TrexConfig::default(), Vec2::new(1.0, GROUND));
        let mut rng = rng();
        let mut durations = Vec::new();
        for _ in 0..5 {
            trex.update(0.0, &mut rng);
            durations.push(trex.blink_duration());
            // run the current blink to completion
            trex.update(11.0, &mut rng);
        }
        for d in &durations {
            assert!(*d >= 2.0 + BLINK_ANIMATION_EYE_CLOSE_TIME);
            assert!(*d <= 10.0 + BLINK_ANIMATION_EYE_CLOSE_TIME);
        }
        assert!(durations.windows(2).any(|w| w[0] != w[1]));
    }
}
