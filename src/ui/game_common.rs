//! Screen layout around the play field: frame, status lines, info panel, banner.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Largest cell grid the 600x150 world is scaled into. Bigger terminals get
/// margins instead of chunkier sprites.
pub const MAX_FIELD_WIDTH: u16 = 120;
pub const MAX_FIELD_HEIGHT: u16 = 25;

const MIN_FIELD_WIDTH: u16 = 10;
const MIN_FIELD_HEIGHT: u16 = 4;
const STATUS_HEIGHT: u16 = 2;

/// Areas returned by [`runner_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerLayout {
    /// Everything left of the info panel and above the status lines.
    pub pane: Rect,
    /// The world's cell grid, centred in `pane`.
    pub field: Rect,
    pub status_bar: Rect,
    /// Zero width when the terminal is too narrow for it.
    pub info_panel: Rect,
}

/// Draw the outer frame and split what is inside it.
///
/// ```text
/// ╭─ T-Rex Runner ──────────────────┬─ Run ───────╮
/// │      ┌ field (≤ 120x25) ┐       │             │
/// │      └──────────────────┘       │  [info]     │
/// │ status line / controls line     │             │
/// ╰─────────────────────────────────┴─────────────╯
/// ```
pub fn runner_layout(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    info_panel_width: u16,
) -> RunnerLayout {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    split_runner_area(inner, info_panel_width)
}

fn split_runner_area(inner: Rect, info_panel_width: u16) -> RunnerLayout {
    let info_width = if inner.width >= MIN_FIELD_WIDTH + info_panel_width {
        info_panel_width
    } else {
        0
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(MIN_FIELD_WIDTH), Constraint::Length(info_width)])
        .split(inner);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(MIN_FIELD_HEIGHT), Constraint::Length(STATUS_HEIGHT)])
        .split(columns[0]);

    RunnerLayout {
        pane: rows[0],
        field: fit_field(rows[0]),
        status_bar: rows[1],
        info_panel: columns[1],
    }
}

/// Clamp `area` to the maximum field size and centre the result in it.
pub fn fit_field(area: Rect) -> Rect {
    let width = area.width.min(MAX_FIELD_WIDTH);
    let height = area.height.min(MAX_FIELD_HEIGHT);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Row `row` of the field, cut to the `visible` columns of the reveal.
pub fn field_row(field: Rect, row: u16, visible: u16) -> Rect {
    Rect::new(field.x, field.y + row, visible.min(field.width), 1)
}

/// Status message, then `key action` pairs separated by bars.
pub fn status_lines<'a>(
    status: &'a str,
    status_color: Color,
    controls: &[(&'a str, &'a str)],
) -> Vec<Line<'a>> {
    let mut keys = Vec::new();
    for (i, (key, action)) in controls.iter().enumerate() {
        if i > 0 {
            keys.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        keys.push(Span::styled(
            *key,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        keys.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::Gray),
        ));
    }

    vec![
        Line::from(Span::styled(status, Style::default().fg(status_color))),
        Line::from(keys),
    ]
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    if area.height == 0 {
        return;
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Bordered side panel. Returns the inner area (empty if the panel is hidden).
pub fn render_info_panel_frame(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    if area.width == 0 {
        return area;
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Compact banner at the bottom of `area`. The play field stays visible
/// above it.
pub fn render_game_over_banner(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    hint: &str,
) {
    let banner_height: u16 = 4;
    let banner_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(banner_height),
        width: area.width,
        height: banner_height.min(area.height),
    };

    frame.render_widget(Clear, banner_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(banner_area);
    frame.render_widget(block, banner_area);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                title,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(message, Style::default().fg(Color::White)),
        ]),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Center a single line of text horizontally in `area` at row `y`.
pub fn centered_line(area: Rect, y: u16, len: u16) -> Rect {
    let width = len.min(area.width);
    Rect::new(area.x + area.width.saturating_sub(width) / 2, y, width, 1)
}
