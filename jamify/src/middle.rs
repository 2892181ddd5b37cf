// Sits between the TUI and the player: turns input events into player calls,
// keeps edits valid (start never past end, end never past the last frame)
// and remembers which GIF is playing.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;
use log::{debug, info, warn};

use crate::loader::gif_loader;
use crate::shared::{DisplayState, InputEvent};
use crate::sync::BeatSyncPlayer;
use crate::sync_api::{FrameSet, FrameUpdate};

const LOOP_STEP_MS: f64 = 1.0;
const RENDER_DELAY_STEP_MS: f64 = 1.0;

pub struct Middle {
    player: BeatSyncPlayer<RgbaImage>,
    playlist: Vec<PathBuf>,
    playing: Option<usize>, // index into playlist
    latest: Option<FrameUpdate<RgbaImage>>,
    notice: Option<String>,
}

impl Middle {
    pub fn new(player: BeatSyncPlayer<RgbaImage>, playlist: Vec<PathBuf>) -> Self {
        Self {
            player,
            playlist,
            playing: None,
            latest: None,
            notice: None,
        }
    }

    pub fn player(&self) -> &BeatSyncPlayer<RgbaImage> {
        &self.player
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.playing.map(|i| self.playlist[i].as_path())
    }

    // first playlist entry that decodes wins
    pub fn load_first(&mut self) -> anyhow::Result<()> {
        let mut last_err = None;
        for pos in 0..self.playlist.len() {
            match self.load_at(pos) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("{e:#}");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("nothing to play")))
    }

    // cycles through the playlist; on failure the current GIF keeps playing
    pub fn load_next(&mut self) -> anyhow::Result<()> {
        if self.playlist.is_empty() {
            anyhow::bail!("no GIFs to switch to");
        }
        let next = self.playing.map_or(0, |i| (i + 1) % self.playlist.len());
        self.load_at(next)
    }

    fn load_at(&mut self, pos: usize) -> anyhow::Result<()> {
        let path = &self.playlist[pos];
        let frames = gif_loader::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        self.start_frames(frames)?;
        self.playing = Some(pos);
        info!("now playing {}", self.playlist[pos].display());
        Ok(())
    }

    pub fn start_frames(&mut self, frames: FrameSet<RgbaImage>) -> anyhow::Result<()> {
        self.player.start(frames).context("failed to start playback")?;
        self.latest = None;
        self.notice = None;
        Ok(())
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        let player = &self.player;
        let range = player.range();
        let frame_count = player.frame_count();
        match event {
            InputEvent::Beat => player.beat(),
            InputEvent::Reset => player.clear(),
            InputEvent::Faster => {
                player.nudge_loop_duration(-LOOP_STEP_MS);
            }
            InputEvent::Slower => {
                player.nudge_loop_duration(LOOP_STEP_MS);
            }
            InputEvent::OffsetDown => {
                player.nudge_offset(-1);
            }
            InputEvent::OffsetUp => {
                player.nudge_offset(1);
            }
            InputEvent::ToggleReverse => {
                player.toggle_reverse();
            }
            InputEvent::StartFrameDown => {
                if range.start_frame() > 0 {
                    self.edit(player.set_start_frame(range.start_frame() - 1));
                }
            }
            InputEvent::StartFrameUp => {
                if range.start_frame() < range.end_frame() {
                    self.edit(player.set_start_frame(range.start_frame() + 1));
                }
            }
            InputEvent::EndFrameDown => {
                if range.end_frame() > range.start_frame() {
                    self.edit(player.set_end_frame(range.end_frame() - 1));
                }
            }
            InputEvent::EndFrameUp => {
                if range.end_frame() + 1 < frame_count {
                    self.edit(player.set_end_frame(range.end_frame() + 1));
                }
            }
            InputEvent::RenderDelayDown => {
                player.nudge_render_delay(-RENDER_DELAY_STEP_MS);
            }
            InputEvent::RenderDelayUp => {
                player.nudge_render_delay(RENDER_DELAY_STEP_MS);
            }
            InputEvent::LoadNext => {
                if let Err(e) = self.load_next() {
                    warn!("{e:#}");
                    self.notice = Some(format!("{e:#}"));
                }
            }
            InputEvent::Resize | InputEvent::Quit => {}
        }
    }

    // the checks above should make these unreachable, but don't die over it
    fn edit(&self, result: crate::error::Result<bool>) {
        if let Err(e) = result {
            debug!("range edit refused: {e}");
        }
    }

    /// Pulls the newest frame update. Returns true when it shows a different
    /// frame than the one drawn last, including the first frame after a load.
    pub fn poll(&mut self) -> bool {
        let Some(update) = self.player.poll_frame_update() else {
            return false;
        };
        let changed = update.frame_changed()
            || self.latest.as_ref().is_none_or(|drawn| drawn.index() != update.index());
        self.latest = Some(update);
        changed
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            frame: self.latest.clone(),
            status: self.player.status(),
            source: self
                .current_path()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            notice: self.notice.clone(),
        }
    }

    pub fn shutdown(&mut self) {
        self.player.dispose();
    }
}
