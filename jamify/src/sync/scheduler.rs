//! Maps elapsed time onto a frame index.
//!
//! The position is a pure function of the time since the last tap and the
//! current tempo, range and offset. Nothing accumulates between ticks, so an
//! edit to any of them shows up on the very next tick, at most one frame step
//! away from where the old settings would have been.
//!
//! Ping-pong playback runs the same linear ramp as forward playback over
//! `cycle_frame_count` steps and folds the steps past the end of the range
//! back down, which samples a triangle wave:
//!
//! ```text
//! range 0..=3, reverse    ramp 0 1 2 3 4 5
//!                         idx  0 1 2 3 2 1
//! ```

use std::time::Instant;

use crate::error::{JamifyError, Result};

use super::range::PlaybackRange;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub index: usize,
    pub frame_duration_ms: f64, // 0 for a static single frame
}

/// Where playback is after `elapsed_ms` of the current tap.
pub fn frame_position(
    elapsed_ms: f64,
    loop_duration_ms: f64,
    offset: i64,
    range: &PlaybackRange,
) -> Position {
    let start = range.start_frame();
    let cycle = range.cycle_frame_count();
    if cycle <= 1 {
        return Position { index: start, frame_duration_ms: 0.0 };
    }

    let frame_duration_ms = loop_duration_ms / cycle as f64;
    let raw = (elapsed_ms / frame_duration_ms).floor() as i64;
    let cycle = cycle as i64;
    // reduce both terms first so large ramps or offsets can't overflow
    let pos = (raw.rem_euclid(cycle) + offset.rem_euclid(cycle)).rem_euclid(cycle) as usize;

    let span = range.span();
    let index = if pos >= span {
        start + (cycle as usize - pos)
    } else {
        start + pos
    };
    Position { index, frame_duration_ms }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub index: usize,
    pub frame_changed: bool,
}

// Per-tick bookkeeping. The timing fields are diagnostics only.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    current: Option<usize>,
    frame_duration_ms: f64,
    render_duration_ms: f64,
    last_tick_elapsed_ms: f64,
    last_tick_at: Option<Instant>,
    tick_interval_ms: Option<f64>,
}

impl Scheduler {
    pub fn tick(
        &mut self,
        now: Instant,
        elapsed_ms: f64,
        loop_duration_ms: f64,
        offset: i64,
        range: &PlaybackRange,
    ) -> Result<Tick> {
        let position = frame_position(elapsed_ms, loop_duration_ms, offset, range);
        if !range.contains(position.index) {
            return Err(JamifyError::IndexOutOfRange {
                index: position.index,
                start: range.start_frame(),
                end: range.end_frame(),
            });
        }

        if let Some(last) = self.last_tick_at {
            let interval = now.saturating_duration_since(last);
            self.tick_interval_ms = Some(interval.as_secs_f64() * 1000.0);
        }
        self.last_tick_at = Some(now);
        self.last_tick_elapsed_ms = elapsed_ms;
        self.frame_duration_ms = position.frame_duration_ms;

        let frame_changed = self.current != Some(position.index);
        self.current = Some(position.index);
        Ok(Tick { index: position.index, frame_changed })
    }

    pub fn record_render(&mut self, started: Instant, finished: Instant) {
        let render = finished.saturating_duration_since(started);
        self.render_duration_ms = render.as_secs_f64() * 1000.0;
    }

    // forget the previous index so the next tick always reports a change
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn frame_duration_ms(&self) -> f64 {
        self.frame_duration_ms
    }

    pub fn render_duration_ms(&self) -> f64 {
        self.render_duration_ms
    }

    pub fn last_tick_elapsed_ms(&self) -> f64 {
        self.last_tick_elapsed_ms
    }

    pub fn tick_interval_ms(&self) -> Option<f64> {
        self.tick_interval_ms
    }
}
