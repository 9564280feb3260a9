//! Score accumulation, the high score and the milestone flash.

use super::{Drawable, WorldContext};
use crate::config::ScoreConfig;
use crate::constants::SCORE_BOARD_DRAW_ORDER;
use crate::geometry::Vec2;
use crate::graphics::{Canvas, Palette, Sprite, SpriteKind};

const DIGIT_SPRITE_POS_X: i32 = 655;
const DIGIT_SPRITE_POS_Y: i32 = 0;
const DIGIT_SPRITE_WIDTH: i32 = 10;
const DIGIT_SPRITE_HEIGHT: i32 = 13;

const HI_LABEL_SPRITE_POS_X: i32 = 755;
const HI_LABEL_SPRITE_POS_Y: i32 = 0;
const HI_LABEL_SPRITE_WIDTH: i32 = 20;
const HI_LABEL_SPRITE_HEIGHT: i32 = 13;

pub const DIGIT_COUNT: usize = 5;
const MAX_DISPLAY_SCORE: i32 = 99_999;
const SCORE_MARGIN: f32 = 70.0;
const HI_LABEL_MARGIN: f32 = 28.0;

const FLASH_FRAME_LENGTH: f32 = 1.0 / 3.0;
const FLASH_COUNT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    /// The display score crossed a milestone; the board starts flashing.
    Milestone(i32),
}

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    config: ScoreConfig,
    position: Vec2,
    score: f64,
    hi_score: i32,
    palette: Palette,
    is_flashing: bool,
    flash_time: f32,
}

impl ScoreBoard {
    pub fn new(config: ScoreConfig, position: Vec2) -> Self {
        Self {
            config,
            position,
            score: 0.0,
            hi_score: 0,
            palette: Palette::Normal,
            is_flashing: false,
            flash_time: 0.0,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    pub fn display_score(&self) -> i32 {
        self.score.floor() as i32
    }

    pub fn hi_score(&self) -> i32 {
        self.hi_score
    }

    pub fn set_hi_score(&mut self, hi_score: i32) {
        self.hi_score = hi_score;
    }

    pub fn has_hi_score(&self) -> bool {
        self.hi_score > 0
    }

    pub fn is_flashing(&self) -> bool {
        self.is_flashing
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Restart the run's score and stop any flash in progress.
    pub fn reset(&mut self) {
        self.score = 0.0;
        self.is_flashing = false;
        self.flash_time = 0.0;
    }

    /// Accumulate `trex_speed * multiplier` points per second.
    pub fn update(&mut self, dt: f32, trex_speed: f32) -> Option<ScoreEvent> {
        let old_display = self.display_score();
        self.score += trex_speed as f64 * self.config.multiplier * dt as f64;
        let display = self.display_score();

        let mut event = None;
        let milestone = self.config.milestone.max(1);
        if !self.is_flashing && display / milestone != old_display / milestone {
            self.is_flashing = true;
            self.flash_time = 0.0;
            event = Some(ScoreEvent::Milestone(display - display % milestone));
        }

        if self.is_flashing {
            self.flash_time += dt;
            // off, on, off, on... FLASH_COUNT times
            if self.flash_time >= FLASH_FRAME_LENGTH * FLASH_COUNT as f32 * 2.0 {
                self.is_flashing = false;
            }
        }
        event
    }

    /// The current score is hidden during every other flash frame.
    pub fn is_score_visible(&self) -> bool {
        !self.is_flashing || (self.flash_time / FLASH_FRAME_LENGTH) as u32 % 2 != 0
    }

    fn draw_number(&self, canvas: &mut dyn Canvas, value: i32, start_x: f32) {
        let mut x = start_x;
        for digit in split_digits(value) {
            canvas.draw_sprite(&digit_sprite(digit), self.palette, Vec2::new(x, self.position.y));
            x += DIGIT_SPRITE_WIDTH as f32;
        }
    }
}

impl Drawable for ScoreBoard {
    fn draw(&self, canvas: &mut dyn Canvas, _ctx: &WorldContext) {
        if self.has_hi_score() {
            let label = Sprite::new(
                SpriteKind::HiLabel,
                HI_LABEL_SPRITE_POS_X,
                HI_LABEL_SPRITE_POS_Y,
                HI_LABEL_SPRITE_WIDTH,
                HI_LABEL_SPRITE_HEIGHT,
            );
            canvas.draw_sprite(
                &label,
                self.palette,
                Vec2::new(self.position.x - HI_LABEL_MARGIN, self.position.y),
            );
            self.draw_number(canvas, self.hi_score, self.position.x);
        }

        if self.is_score_visible() {
            self.draw_number(canvas, self.display_score(), self.position.x + SCORE_MARGIN);
        }
    }

    fn draw_order(&self) -> i32 {
        SCORE_BOARD_DRAW_ORDER
    }
}

/// Five zero-padded digits, most significant first. Scores past 99999 stay pinned.
pub fn split_digits(value: i32) -> [u8; DIGIT_COUNT] {
    let mut remaining = value.clamp(0, MAX_DISPLAY_SCORE);
    let mut digits = [0u8; DIGIT_COUNT];
    for slot in digits.iter_mut().rev() {
        *slot = (remaining % 10) as u8;
        remaining /= 10;
    }
    digits
}

/// Atlas region of a single digit. Panics outside `0..=9`.
pub fn digit_sprite(digit: u8) -> Sprite {
    assert!(digit <= 9, "Digit must be 0-9, got {}", digit);
    Sprite::new(
        SpriteKind::Digit(digit),
        DIGIT_SPRITE_POS_X + digit as i32 * DIGIT_SPRITE_WIDTH,
        DIGIT_SPRITE_POS_Y,
        DIGIT_SPRITE_WIDTH,
        DIGIT_SPRITE_HEIGHT,
    )
}
