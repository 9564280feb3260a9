//! Terminal implementation of [`Canvas`].
//!
//! Sprites are stamped into a cell buffer (one glyph plus colours per
//! cell) scaled down from world pixels, then flushed row by row as
//! Paragraph lines, merging runs of equal style into single spans.

use crate::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::geometry::Vec2;
use crate::graphics::{Canvas, Palette, Sprite, SpriteKind};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

const DAY_SKY: (u8, u8, u8) = (247, 247, 247);
const NIGHT_SKY: (u8, u8, u8) = (32, 33, 36);
const INK: Color = Color::Rgb(83, 83, 83);
const INVERTED_INK: Color = Color::Rgb(172, 172, 172);
const CLOUD_INK: Color = Color::Rgb(200, 200, 200);
const STAR_INK: Color = Color::Rgb(255, 244, 180);

/// One terminal character with its colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

pub struct TerminalCanvas {
    width: u16,
    height: u16,
    sky: Color,
    cells: Vec<Vec<Cell>>,
}

impl TerminalCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            sky: Color::Reset,
            cells: vec![vec![Cell::default(); width as usize]; height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        self.cells.get(row as usize)?.get(col as usize)
    }

    fn to_col(&self, x: f32) -> i32 {
        (x * self.width as f32 / WINDOW_WIDTH).floor() as i32
    }

    fn to_row(&self, y: f32) -> i32 {
        (y * self.height as f32 / WINDOW_HEIGHT).floor() as i32
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return;
        }
        let sky = self.sky;
        self.cells[row as usize][col as usize] = Cell { ch, fg, bg: sky };
    }

    fn put_text(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
    }

    /// Convert the buffer into styled lines, one per row.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        self.cells
            .iter()
            .map(|row| {
                let mut spans: Vec<Span<'static>> = Vec::new();
                let mut current = Style::default();
                let mut text = String::new();
                for cell in row {
                    let style = Style::default().fg(cell.fg).bg(cell.bg);
                    if style != current && !text.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut text), current));
                    }
                    current = style;
                    text.push(cell.ch);
                }
                if !text.is_empty() {
                    spans.push(Span::styled(text, current));
                }
                Line::from(spans)
            })
            .collect()
    }
}

fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

/// Sky colour for a day/night scalar (0 night, 1 day).
pub fn sky_color(daylight: f32) -> Color {
    let t = daylight.clamp(0.0, 1.0);
    Color::Rgb(
        lerp_channel(NIGHT_SKY.0, DAY_SKY.0, t),
        lerp_channel(NIGHT_SKY.1, DAY_SKY.1, t),
        lerp_channel(NIGHT_SKY.2, DAY_SKY.2, t),
    )
}

fn ink(kind: SpriteKind, palette: Palette) -> Color {
    match kind {
        SpriteKind::Cloud => CLOUD_INK,
        SpriteKind::Star | SpriteKind::Moon => STAR_INK,
        _ => match palette {
            Palette::Normal => INK,
            Palette::Inverted => INVERTED_INK,
        },
    }
}

/// Glyph for cell (`dx`, `dy`) of a sprite `w` x `h` cells big, or None to
/// leave the cell alone.
fn glyph(kind: SpriteKind, dx: i32, dy: i32, w: i32, h: i32) -> Option<char> {
    let last_col = dx == w - 1;
    match kind {
        SpriteKind::Trex if dy == 0 && last_col => Some('▀'),
        SpriteKind::Trex if dy == h - 1 => Some(if dx % 2 == 0 { '╹' } else { ' ' }),
        SpriteKind::Trex => Some('█'),
        SpriteKind::TrexDucking if dy == h - 1 => Some('▀'),
        SpriteKind::TrexDucking => Some('▄'),
        SpriteKind::TrexDead if dy == 0 && last_col => Some('x'),
        SpriteKind::TrexDead => Some('█'),
        SpriteKind::TrexIdleBackground => None,
        SpriteKind::SmallCactus | SpriteKind::LargeCactus => {
            Some(if dx % 2 == 0 { '┃' } else if dy == h / 2 { '┛' } else { ' ' })
        }
        SpriteKind::FlyingDino if dy == 0 => Some('v'),
        SpriteKind::FlyingDino => Some(if last_col { '<' } else { '═' }),
        SpriteKind::Cloud if dy == 0 => Some('~'),
        SpriteKind::Cloud => None,
        SpriteKind::Star => (dx == 0 && dy == 0).then_some('*'),
        SpriteKind::Moon => (dx == 0 && dy == 0).then_some('◐'),
        SpriteKind::Ground if dy == 0 => Some('_'),
        SpriteKind::BumpyGround if dy == 0 => Some(if dx % 9 == 4 { '^' } else { '_' }),
        SpriteKind::Ground | SpriteKind::BumpyGround => (dx % 7 == 3).then_some('.'),
        // text sprites are handled by `label`
        SpriteKind::Digit(_)
        | SpriteKind::HiLabel
        | SpriteKind::GameOverText
        | SpriteKind::ReplayButton => None,
    }
}

fn label(kind: SpriteKind) -> Option<String> {
    match kind {
        SpriteKind::Digit(d) => Some(d.to_string()),
        SpriteKind::HiLabel => Some("HI".to_string()),
        SpriteKind::GameOverText => Some("G A M E  O V E R".to_string()),
        SpriteKind::ReplayButton => Some("↻".to_string()),
        _ => None,
    }
}

impl Canvas for TerminalCanvas {
    fn clear(&mut self, daylight: f32) {
        self.sky = sky_color(daylight);
        let blank = Cell {
            ch: ' ',
            fg: Color::Reset,
            bg: self.sky,
        };
        for row in &mut self.cells {
            row.fill(blank);
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, palette: Palette, position: Vec2) {
        let col = self.to_col(position.x);
        let row = self.to_row(position.y);
        let fg = ink(sprite.kind, palette);

        if let Some(text) = label(sprite.kind) {
            self.put_text(col, row, &text, fg);
            return;
        }

        let end_col = self.to_col(position.x + sprite.width() as f32).max(col + 1);
        let end_row = self.to_row(position.y + sprite.height() as f32).max(row + 1);
        let (w, h) = (end_col - col, end_row - row);
        for dy in 0..h {
            for dx in 0..w {
                if let Some(ch) = glyph(sprite.kind, dx, dy, w, h) {
                    self.put(col + dx, row + dy, ch, fg);
                }
            }
        }
    }

    // the clear colour already carries the day/night fade
    fn fill_overlay(&mut self, _alpha: f32) {}
}
