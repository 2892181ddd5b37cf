use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use log::{debug, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use jamify::cli::Cli;
use jamify::config::{Settings, persistence};
use jamify::middle::Middle;
use jamify::shared::InputEvent;
use jamify::sync::{BeatSyncPlayer, SystemClock};
use jamify::tui;

const DEFAULT_GIF: &str = "default.gif";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let work_dir = std::env::current_dir().context("no working directory")?;
    init_logging(&cli, &work_dir)?;

    let mut settings = match persistence::load_settings(&work_dir) {
        Ok(settings) => settings,
        Err(e) => {
            debug!("using default settings: {e}");
            Settings::default()
        }
    };
    settings.apply_cli(&cli);

    let playlist = resolve_playlist(&cli, &settings, &work_dir);
    if playlist.is_empty() {
        anyhow::bail!("no GIF given and no {DEFAULT_GIF} in {}", work_dir.display());
    }

    let player = BeatSyncPlayer::new(settings.player_config(), Arc::new(SystemClock));
    let mut middle = Middle::new(player, playlist);
    // load before touching the terminal so a bad file reports normally
    middle.load_first()?;

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // restores the terminal however we leave
    crossterm::execute!(std::io::stdout(), terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let ui_tick = Duration::from_millis(16); // ~60fps
    let mut tui_state = tui::mode::TuiState {
        show_help: settings.show_help,
        show_info: settings.show_info,
    };
    let mut needs_redraw = true;

    loop {
        // only redraw for a new frame, unless the info panel is counting along
        needs_redraw |= middle.poll() || tui_state.show_info;
        if needs_redraw {
            let ds = middle.display_state();
            term.draw(|frame| {
                tui::view::render(frame, frame.area(), &ds, &tui_state);
            })?;
            needs_redraw = false;
        }

        let events = tui::input::poll_input(ui_tick, &mut tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                settings.last_gif = middle.current_path().map(Path::to_path_buf);
                settings.render_delay_ms = middle.player().render_delay().as_secs_f64() * 1000.0;
                settings.show_help = tui_state.show_help;
                settings.show_info = tui_state.show_info;
                if let Err(e) = persistence::save_settings(&work_dir, &settings) {
                    warn!("could not save settings: {e}");
                }
                middle.shutdown();
                term.show_cursor()?;
                info!("bye");
                return Ok(());
            }
            middle.handle_input(event);
            needs_redraw = true;
        }
    }
}

// gifs from the command line, else the last one played, else ./default.gif
fn resolve_playlist(cli: &Cli, settings: &Settings, work_dir: &Path) -> Vec<PathBuf> {
    if !cli.gifs.is_empty() {
        return cli.gifs.clone();
    }
    if let Some(last) = settings.last_gif.as_ref().filter(|p| p.exists()) {
        return vec![last.clone()];
    }
    let fallback = work_dir.join(DEFAULT_GIF);
    if fallback.exists() {
        return vec![fallback];
    }
    Vec::new()
}

// The terminal belongs to the TUI, so logs always go to a file.
fn init_logging(cli: &Cli, work_dir: &Path) -> anyhow::Result<()> {
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| persistence::log_file_path(work_dir));
    persistence::ensure_parent(&log_path)?;
    let file = std::fs::File::create(&log_path)
        .with_context(|| format!("could not create log file {}", log_path.display()))?;

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    info!("jamify starting, logging to {}", log_path.display());
    debug!("command-line args: {cli:?}");
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
