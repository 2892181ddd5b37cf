//! Tap tempo: turns a stream of beats into a loop duration.
//!
//! The first tap only starts the stopwatch. Every tap after that records the
//! time since the previous tap and restarts the stopwatch, so the estimate is
//! the mean gap between consecutive taps. Nothing is filtered: one stray tap
//! skews the mean until the estimator is reset.

use std::collections::VecDeque;
use std::time::Instant;

use log::debug;

pub const DEFAULT_LOOP_DURATION_MS: f64 = 500.0;
pub const MIN_LOOP_DURATION_MS: f64 = 10.0;

#[derive(Clone, Debug)]
pub struct TempoEstimator {
    started_at: Option<Instant>, // stopwatch, None until the first tap
    samples: VecDeque<f64>,      // tap-to-tap gaps in ms, oldest first
    max_samples: Option<usize>,  // None keeps every sample since the last reset
    default_loop_ms: f64,
    loop_duration_ms: f64,
}

impl TempoEstimator {
    pub fn new(default_loop_ms: f64) -> Self {
        let default_loop_ms = floor_loop_ms(default_loop_ms);
        Self {
            started_at: None,
            samples: VecDeque::new(),
            max_samples: None,
            default_loop_ms,
            loop_duration_ms: default_loop_ms,
        }
    }

    /// Keep only the newest `max` samples. `None` or `Some(0)` means no cap.
    pub fn with_max_samples(mut self, max: Option<usize>) -> Self {
        self.max_samples = max.filter(|&n| n > 0);
        self
    }

    /// Returns the recorded gap, or `None` for the tap that starts the stopwatch.
    pub fn record_tap(&mut self, now: Instant) -> Option<f64> {
        let Some(started_at) = self.started_at else {
            self.started_at = Some(now);
            debug!("first tap, stopwatch started");
            return None;
        };

        let gap_ms = now.saturating_duration_since(started_at).as_secs_f64() * 1000.0;
        self.samples.push_back(gap_ms);
        if let Some(max) = self.max_samples {
            while self.samples.len() > max {
                self.samples.pop_front();
            }
        }
        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        self.loop_duration_ms = floor_loop_ms(mean);
        self.started_at = Some(now);

        debug!(
            "tap: gap {:.2} ms, loop {:.2} ms over {} samples",
            gap_ms,
            self.loop_duration_ms,
            self.samples.len()
        );
        Some(gap_ms)
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.samples.clear();
        self.loop_duration_ms = self.default_loop_ms;
    }

    pub fn loop_duration_ms(&self) -> f64 {
        self.loop_duration_ms
    }

    // manual tempo nudge; the next tap replaces it with the sample mean again
    pub fn nudge_loop_duration(&mut self, delta_ms: f64) -> f64 {
        self.loop_duration_ms = floor_loop_ms(self.loop_duration_ms + delta_ms);
        self.loop_duration_ms
    }

    pub fn elapsed_ms(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(started_at) => now.saturating_duration_since(started_at).as_secs_f64() * 1000.0,
            None => 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn bpm(&self) -> f64 {
        60_000.0 / self.loop_duration_ms
    }
}

impl Default for TempoEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_LOOP_DURATION_MS)
    }
}

// NaN falls through max() to the floor as well
fn floor_loop_ms(ms: f64) -> f64 {
    ms.max(MIN_LOOP_DURATION_MS)
}
