//! The runner screen: play field, status bar and info panel.

use super::canvas::TerminalCanvas;
use super::game_common::{
    centered_line, field_row, render_game_over_banner, render_info_panel_frame,
    render_status_bar, runner_layout, status_lines,
};
use crate::constants::WINDOW_WIDTH;
use crate::geometry::Vec2;
use crate::graphics::{Canvas, Sprite, SpriteKind};
use crate::session::{Screen, Session};
use crate::simulation::World;
use rand::Rng;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const INFO_PANEL_WIDTH: u16 = 20;

/// World pixels visible on the title screen; the reveal widens from here.
const INITIAL_VISIBLE_WIDTH: f32 = 50.0;

const GAME_OVER_TEXT: Sprite = Sprite::new(SpriteKind::GameOverText, 655, 15, 191, 11);
const REPLAY_BUTTON: Sprite = Sprite::new(SpriteKind::ReplayButton, 2, 2, 36, 32);

pub fn render_runner_scene<R: Rng>(frame: &mut Frame, area: Rect, session: &Session<R>) {
    let layout = runner_layout(frame, area, " T-Rex Runner ", INFO_PANEL_WIDTH);

    render_play_field(frame, layout.field, session);

    match session.screen() {
        Screen::Initial => render_start_prompt(frame, layout.field),
        Screen::GameOver => render_game_over_banner(
            frame,
            layout.pane,
            "GAME OVER",
            &format!("Score {}", session.world().score_board().display_score()),
            "[Enter/Space] Replay  [Q] Quit",
        ),
        Screen::Transition | Screen::Playing => {}
    }

    render_status(frame, layout.status_bar, session);
    render_info_panel(frame, layout.info_panel, session.world());
}

/// Number of columns visible while the field slides open.
fn revealed_width(session_progress: f32, screen: Screen, width: u16) -> u16 {
    let visible = match screen {
        Screen::Initial => INITIAL_VISIBLE_WIDTH,
        Screen::Transition => {
            INITIAL_VISIBLE_WIDTH + (WINDOW_WIDTH - INITIAL_VISIBLE_WIDTH) * session_progress
        }
        Screen::Playing | Screen::GameOver => WINDOW_WIDTH,
    };
    (visible * width as f32 / WINDOW_WIDTH).ceil().clamp(1.0, width as f32) as u16
}

fn render_play_field<R: Rng>(frame: &mut Frame, field: Rect, session: &Session<R>) {
    if field.height < 4 || field.width < 10 {
        return;
    }

    let mut canvas = TerminalCanvas::new(field.width, field.height);
    session.world().draw(&mut canvas);

    if session.screen() == Screen::GameOver {
        let x = (WINDOW_WIDTH - GAME_OVER_TEXT.width() as f32) / 2.0;
        canvas.draw_sprite(&GAME_OVER_TEXT, session.world().palette(), Vec2::new(x, 50.0));
        let x = (WINDOW_WIDTH - REPLAY_BUTTON.width() as f32) / 2.0;
        canvas.draw_sprite(&REPLAY_BUTTON, session.world().palette(), Vec2::new(x, 75.0));
    }

    let visible = revealed_width(session.transition_progress(), session.screen(), field.width);
    for (row, line) in canvas.to_lines().into_iter().enumerate() {
        frame.render_widget(Paragraph::new(line), field_row(field, row as u16, visible));
    }
}

fn render_start_prompt(frame: &mut Frame, area: Rect) {
    if area.height < 5 || area.width < 30 {
        return;
    }
    let prompt = "[ Press Space/Up to Start ]";
    let prompt_area = centered_line(area, area.y + area.height / 2, prompt.len() as u16);
    frame.render_widget(
        Paragraph::new(Span::styled(
            prompt,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        prompt_area,
    );
}

fn render_status<R: Rng>(frame: &mut Frame, area: Rect, session: &Session<R>) {
    let (text, color, controls): (&str, Color, &[(&str, &str)]) = match session.screen() {
        Screen::Initial => (
            "Ready",
            Color::Gray,
            &[("[Space/Up]", "Start"), ("[M]", "Mute"), ("[Q]", "Quit")],
        ),
        Screen::Transition | Screen::Playing => (
            "Run!",
            Color::Green,
            &[("[Space/Up]", "Jump"), ("[Down]", "Duck"), ("[Q]", "Quit")],
        ),
        Screen::GameOver => (
            "Ouch",
            Color::Red,
            &[("[Enter/Space]", "Replay"), ("[Q]", "Quit")],
        ),
    };
    render_status_bar(frame, area, status_lines(text, color, controls));
}

fn render_info_panel<R: Rng>(frame: &mut Frame, area: Rect, world: &World<R>) {
    let inner = render_info_panel_frame(frame, area, " Run ");
    if inner.width == 0 {
        return;
    }
    let trex = world.trex();
    let config = &world.config().trex;

    let speed_pct = if config.max_speed > config.start_speed {
        ((trex.speed() - config.start_speed) / (config.max_speed - config.start_speed) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u32
    } else {
        0
    };
    let phase = if world.sky().is_night() { "Night" } else { "Day" };

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));
    let lines = vec![
        Line::from(vec![
            label("Score: "),
            Span::styled(
                world.score_board().display_score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Best:  "),
            Span::styled(
                world.score_board().hi_score().to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Speed: "),
            Span::styled(format!("{}%", speed_pct), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            label("Sky:   "),
            Span::styled(
                format!("{} ({})", phase, world.sky().night_count()),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
