use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::frame_view::FrameView;
use super::mode::TuiState;
use crate::shared::{DisplayState, HELP_LINES};

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &TuiState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // the gif
            Constraint::Length(1), // status line
        ])
        .split(area);

    if let Some(update) = &state.frame {
        frame.render_widget(FrameView::new(update.current()), sections[0]);
    }
    draw_status_line(frame, sections[1], state);

    if ts.show_info {
        draw_info(frame, sections[0], state);
    }
    if ts.show_help {
        draw_help(frame, sections[0]);
    }
}

fn draw_status_line(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let line = match &state.notice {
        Some(notice) => Line::styled(notice.as_str(), Style::default().fg(Color::LightRed)),
        None => {
            let status = &state.status;
            let name = state.source.as_deref().unwrap_or("-");
            Line::styled(
                format!(
                    "{name}  {:.1} bpm  frame {}/{}",
                    status.bpm,
                    status.current_frame.map_or(0, |i| i + 1),
                    status.frame_count
                ),
                Style::default().fg(Color::DarkGray),
            )
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_info(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let text = state.status.to_string();
    let height = text.lines().count() as u16 + 2;
    let width = text.lines().map(str::len).max().unwrap_or(0) as u16 + 2;
    let panel = Rect::new(area.x, area.y, width.min(area.width), height.min(area.height));
    draw_panel(frame, panel, "Info", Paragraph::new(text));
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, action)| {
            let pad = 12usize.saturating_sub(key.len());
            Line::from(format!("[{key}]{:pad$}{action}", ""))
        })
        .collect();
    let height = lines.len() as u16 + 2;
    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 2;
    let width = width.min(area.width);
    let panel = Rect::new(
        area.x + area.width - width,
        area.y,
        width,
        height.min(area.height),
    );
    draw_panel(frame, panel, "Help", Paragraph::new(lines));
}

fn draw_panel(frame: &mut Frame, panel: Rect, title: &str, body: Paragraph) {
    frame.render_widget(Clear, panel);
    frame.render_widget(
        body.block(Block::default().borders(Borders::ALL).title(title)),
        panel,
    );
}
