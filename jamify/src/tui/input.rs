use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use super::mode::TuiState;
use crate::shared::InputEvent;

// waits up to `timeout` for a key; overlay toggles are handled here and
// everything else becomes an event for the middle layer
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(key.code, ts)),
        Event::Resize(..) => Ok(vec![InputEvent::Resize]),
        _ => Ok(vec![]),
    }
}

pub fn handle_key(code: KeyCode, ts: &mut TuiState) -> Vec<InputEvent> {
    let event = match code {
        KeyCode::F(1) | KeyCode::Char('?') => {
            ts.show_help = !ts.show_help;
            InputEvent::Resize // nothing for the player, just redraw
        }
        KeyCode::F(2) | KeyCode::Char('i') => {
            ts.show_info = !ts.show_info;
            InputEvent::Resize
        }
        KeyCode::Char(' ') => InputEvent::Beat,
        KeyCode::Backspace | KeyCode::Char('c') => InputEvent::Reset,
        KeyCode::Up => InputEvent::Faster,
        KeyCode::Down => InputEvent::Slower,
        KeyCode::Left => InputEvent::OffsetDown,
        KeyCode::Right => InputEvent::OffsetUp,
        KeyCode::F(4) | KeyCode::Char('r') => InputEvent::ToggleReverse,
        KeyCode::F(5) => InputEvent::StartFrameDown,
        KeyCode::F(6) => InputEvent::StartFrameUp,
        KeyCode::F(7) => InputEvent::EndFrameDown,
        KeyCode::F(8) => InputEvent::EndFrameUp,
        KeyCode::PageUp => InputEvent::RenderDelayDown,
        KeyCode::PageDown => InputEvent::RenderDelayUp,
        KeyCode::F(9) | KeyCode::Char('n') => InputEvent::LoadNext,
        KeyCode::Esc | KeyCode::Char('q') => InputEvent::Quit,
        _ => return vec![],
    };
    vec![event]
}
