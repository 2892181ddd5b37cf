// What survives between runs. Missing fields fall back to defaults so older
// settings files keep loading.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::sync::{DEFAULT_LOOP_DURATION_MS, DEFAULT_RENDER_DELAY, PlayerConfig};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render_delay_ms: f64,
    pub default_loop_ms: f64, // tempo before the first beats come in
    pub max_tap_samples: Option<usize>, // None averages every tap since the last reset
    pub last_gif: Option<PathBuf>,
    pub show_help: bool,
    pub show_info: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_delay_ms: DEFAULT_RENDER_DELAY.as_secs_f64() * 1000.0,
            default_loop_ms: DEFAULT_LOOP_DURATION_MS,
            max_tap_samples: None,
            last_gif: None,
            show_help: true,
            show_info: false,
        }
    }
}

impl Settings {
    // command line wins over whatever was saved
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ms) = cli.render_delay_ms {
            self.render_delay_ms = ms;
        }
        if let Some(ms) = cli.loop_ms {
            self.default_loop_ms = ms;
        }
        if let Some(max) = cli.max_taps {
            self.max_tap_samples = Some(max);
        }
    }

    // the player floors the delay; values no Duration can hold get the default
    pub fn player_config(&self) -> PlayerConfig {
        let render_delay = Duration::try_from_secs_f64(self.render_delay_ms.max(0.0) / 1000.0)
            .unwrap_or(DEFAULT_RENDER_DELAY);
        PlayerConfig {
            render_delay,
            default_loop_duration_ms: self.default_loop_ms,
            max_tap_samples: self.max_tap_samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{BeatSyncPlayer, MIN_RENDER_DELAY, ManualClock};
    use clap::Parser;
    use std::sync::Arc;

    #[test]
    fn partial_file_fills_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "render_delay_ms": 25.0 }"#).unwrap();
        assert_eq!(settings.render_delay_ms, 25.0);
        assert_eq!(settings.default_loop_ms, DEFAULT_LOOP_DURATION_MS);
        assert!(settings.show_help);
    }

    #[test]
    fn cli_overrides_only_what_it_sets() {
        let mut settings = Settings { default_loop_ms: 420.0, ..Settings::default() };
        let cli = Cli::parse_from(["jamify", "--render-delay-ms", "8", "--max-taps", "16"]);
        settings.apply_cli(&cli);
        assert_eq!(settings.render_delay_ms, 8.0);
        assert_eq!(settings.default_loop_ms, 420.0);
        assert_eq!(settings.max_tap_samples, Some(16));
    }

    #[test]
    fn negative_delay_becomes_the_player_floor() {
        let settings = Settings { render_delay_ms: -3.0, ..Settings::default() };
        let player: BeatSyncPlayer<u8> =
            BeatSyncPlayer::new(settings.player_config(), Arc::new(ManualClock::new()));
        assert_eq!(player.render_delay(), MIN_RENDER_DELAY);
    }

    #[test]
    fn unrepresentable_delay_falls_back_to_default() {
        for ms in [1e300, f64::INFINITY] {
            let settings = Settings { render_delay_ms: ms, ..Settings::default() };
            assert_eq!(settings.player_config().render_delay, DEFAULT_RENDER_DELAY);
        }
        let cli = Cli::parse_from(["jamify", "--render-delay-ms", "1e300"]);
        let mut settings = Settings::default();
        settings.apply_cli(&cli);
        assert_eq!(settings.player_config().render_delay, DEFAULT_RENDER_DELAY);
    }
}
