// Key plan (see tui/input.rs):
//
//   F1 / ?           toggle help          (tui only)
//   F2 / i           toggle info          (tui only)
//   Space            Beat
//   Backspace / c    Reset
//   Up / Down        Faster / Slower      (loop duration -1 / +1 ms)
//   Left / Right     OffsetDown / OffsetUp
//   F4 / r           ToggleReverse
//   F5 / F6          StartFrameDown / StartFrameUp
//   F7 / F8          EndFrameDown / EndFrameUp
//   PgUp / PgDown    RenderDelayDown / RenderDelayUp
//   F9 / n           LoadNext
//   Esc / q          Quit
//
// The TUI only turns keys into these events and draws whatever DisplayState
// says; range checks and player calls all happen in middle.rs.

use image::RgbaImage;

use crate::sync::StatusSnapshot;
use crate::sync_api::FrameUpdate;

pub const HELP_LINES: [(&str, &str); 15] = [
    ("F1", "Toggle help"),
    ("F2", "Toggle info"),
    ("Space", "Beat"),
    ("Backspace", "Reset"),
    ("Up", "Increase speed"),
    ("Down", "Decrease speed"),
    ("Left", "Decrease offset"),
    ("Right", "Increase offset"),
    ("F4", "Toggle gif reverse"),
    ("F5 / F6", "Start frame -/+"),
    ("F7 / F8", "End frame -/+"),
    ("PgDown", "Decrease render speed"),
    ("PgUp", "Increase render speed"),
    ("F9", "Next .gif"),
    ("Esc", "Quit"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Beat,
    Reset,

    // tempo, one ms of loop duration per press
    Faster,
    Slower,

    // phase, one frame per press
    OffsetDown,
    OffsetUp,

    ToggleReverse,
    StartFrameDown,
    StartFrameUp,
    EndFrameDown,
    EndFrameUp,

    // tick delay, one ms per press
    RenderDelayDown,
    RenderDelayUp,

    LoadNext,
    Resize,
    Quit,
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub frame: Option<FrameUpdate<RgbaImage>>, // latest tick, None before anything loads
    pub status: StatusSnapshot,
    pub source: Option<String>, // file name of what's playing
    pub notice: Option<String>, // last thing that went wrong, shown on the bottom line
}
