use std::fmt;

/// Point-in-time read-out of the player for the info overlay and for tests.
/// Frame numbers are zero-based here; `Display` shows them one-based.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusSnapshot {
    pub loop_duration_ms: f64,
    pub bpm: f64,
    pub sample_count: usize,
    pub tapping: bool, // stopwatch running
    pub frame_count: usize,
    pub playing_frame_count: usize,
    pub start_frame: usize,
    pub end_frame: usize,
    pub current_frame: Option<usize>,
    pub reverse: bool,
    pub offset: i64,
    pub frame_duration_ms: f64,
    pub render_delay_ms: f64,
    pub tick_interval_ms: Option<f64>,
    pub render_duration_ms: f64,
}

impl StatusSnapshot {
    pub fn frames_per_second(&self) -> Option<f64> {
        (self.frame_duration_ms > 0.0).then(|| 1000.0 / self.frame_duration_ms)
    }

    pub fn ticks_per_second(&self) -> Option<f64> {
        self.tick_interval_ms
            .filter(|&ms| ms > 0.0)
            .map(|ms| 1000.0 / ms)
    }
}

fn or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Beat duration:       {:.2} ms", self.loop_duration_ms)?;
        writeln!(f, "Beats per minute:    {:.2} bpm", self.bpm)?;
        writeln!(f, "Beat samples:        {}", self.sample_count)?;
        writeln!(f, "Frames in image:     {} f.", self.frame_count)?;
        writeln!(f, "Frames playing:      {} f.", self.playing_frame_count)?;
        writeln!(f, "Start frame:         {}", self.start_frame + 1)?;
        writeln!(f, "End frame:           {}", self.end_frame + 1)?;
        match self.current_frame {
            Some(index) => writeln!(f, "Current frame:       {}", index + 1)?,
            None => writeln!(f, "Current frame:       -")?,
        }
        writeln!(f, "{}", if self.reverse { "Reversing" } else { "Not reversing" })?;
        writeln!(f, "Frame offset:        {} f.", self.offset)?;
        writeln!(f, "Frame duration:      {:.2} ms", self.frame_duration_ms)?;
        writeln!(f, "Frames per second:   {} fps", or_dash(self.frames_per_second()))?;
        writeln!(f, "Render delay:        {:.2} ms", self.render_delay_ms)?;
        writeln!(f, "Actual render delay: {} ms", or_dash(self.tick_interval_ms))?;
        writeln!(f, "Renders per second:  {} fps", or_dash(self.ticks_per_second()))?;
        write!(f, "Render duration:     {:.2} ms", self.render_duration_ms)
    }
}
