// state local to the tui: which overlays are up. Toggled straight from the
// keyboard, never sent to the middle layer, saved with the settings on quit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TuiState {
    pub show_help: bool,
    pub show_info: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            show_help: true,
            show_info: false,
        }
    }
}
