//! The beat-sync player: owns the frames, the tempo, the range and a single
//! background tick thread.
//!
//! Everything the tick reads lives in one [`SyncState`] behind one mutex, so
//! a tick always sees a consistent combination of range, offset and tempo.
//! The lock is never held while sleeping or while publishing. Updates go out
//! through a small bounded channel with `try_send`; a slow consumer loses
//! stale updates instead of stalling the tick, but never the fact that the
//! frame changed while it was away.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, error, info, trace, warn};
use parking_lot::Mutex;

use crate::error::{JamifyError, Result};
use crate::sync_api::{FrameSet, FrameUpdate, PlayerState};

use super::clock::Clock;
use super::range::PlaybackRange;
use super::scheduler::Scheduler;
use super::status::StatusSnapshot;
use super::tempo::{DEFAULT_LOOP_DURATION_MS, TempoEstimator};

pub const DEFAULT_RENDER_DELAY: Duration = Duration::from_micros(16_667); // ~60 Hz
pub const MIN_RENDER_DELAY: Duration = Duration::from_millis(1);

// a tick loop that keeps failing stops itself instead of spinning
const MAX_CONSECUTIVE_FAULTS: u32 = 8;
// a couple of updates of slack for the consumer; older ones get replaced
const UPDATE_QUEUE_LEN: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub render_delay: Duration,
    pub default_loop_duration_ms: f64,
    pub max_tap_samples: Option<usize>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            render_delay: DEFAULT_RENDER_DELAY,
            default_loop_duration_ms: DEFAULT_LOOP_DURATION_MS,
            max_tap_samples: None,
        }
    }
}

struct SyncState<F> {
    frames: Option<FrameSet<F>>,
    tempo: TempoEstimator,
    range: PlaybackRange,
    offset: i64,
    render_delay: Duration,
    scheduler: Scheduler,
}

impl<F> SyncState<F> {
    fn frame_count(&self) -> usize {
        self.frames.as_ref().map_or(0, FrameSet::len)
    }

    fn clear(&mut self) {
        self.tempo.reset();
        self.offset = 0;
        self.range = PlaybackRange::full(self.frame_count());
    }
}

struct Shared<F> {
    state: Mutex<SyncState<F>>,
    running: AtomicBool,
    clock: Arc<dyn Clock>,
}

// the tick thread plus the sender whose drop wakes it from its sleep
struct Worker {
    handle: JoinHandle<()>,
    stop_tx: Sender<()>,
}

pub struct BeatSyncPlayer<F: Send + Sync + 'static> {
    shared: Arc<Shared<F>>,
    worker: Option<Worker>,
    lifecycle: PlayerState,
    update_tx: Sender<FrameUpdate<F>>,
    update_rx: Receiver<FrameUpdate<F>>,
}

impl<F: Send + Sync + 'static> BeatSyncPlayer<F> {
    pub fn new(config: PlayerConfig, clock: Arc<dyn Clock>) -> Self {
        let tempo = TempoEstimator::new(config.default_loop_duration_ms)
            .with_max_samples(config.max_tap_samples);
        let state = SyncState {
            frames: None,
            tempo,
            range: PlaybackRange::full(0),
            offset: 0,
            render_delay: config.render_delay.max(MIN_RENDER_DELAY),
            scheduler: Scheduler::default(),
        };
        let (update_tx, update_rx) = crossbeam_channel::bounded(UPDATE_QUEUE_LEN);

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                running: AtomicBool::new(false),
                clock,
            }),
            worker: None,
            lifecycle: PlayerState::Idle,
            update_tx,
            update_rx,
        }
    }

    /// Swaps in a new animation and (re)starts the tick thread. An empty set
    /// is rejected and leaves the player exactly as it was.
    pub fn start(&mut self, frames: FrameSet<F>) -> Result<()> {
        if self.lifecycle == PlayerState::Disposed {
            return Err(JamifyError::Disposed);
        }
        if frames.is_empty() {
            return Err(JamifyError::EmptyFrameSet);
        }

        self.halt();
        {
            let mut st = self.shared.state.lock();
            st.frames = Some(frames);
            st.scheduler.reset();
        }
        self.clear();
        self.lifecycle = PlayerState::Loaded;

        self.shared.running.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let tx = self.update_tx.clone();
        let rx = self.update_rx.clone();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let spawned = thread::Builder::new()
            .name("jamify-tick".into())
            .spawn(move || tick_loop(shared, stop_rx, tx, rx));
        match spawned {
            Ok(handle) => {
                self.worker = Some(Worker { handle, stop_tx });
                self.lifecycle = PlayerState::Running;
                info!("playback started with {} frames", self.frame_count());
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::Release);
                Err(JamifyError::Spawn(e))
            }
        }
    }

    /// Resets tempo, offset and range (full span, forward). Fine in any state.
    pub fn clear(&self) {
        self.shared.state.lock().clear();
        debug!("player cleared");
    }

    /// Clears, stops the tick thread and waits for it to exit. Once this
    /// returns no further update is published or left in the queue.
    pub fn stop(&mut self) {
        if self.worker.is_none() {
            return;
        }
        self.clear();
        self.halt();
        if self.lifecycle == PlayerState::Running {
            self.lifecycle = PlayerState::Loaded;
        }
        info!("playback stopped");
    }

    pub fn dispose(&mut self) {
        if self.lifecycle == PlayerState::Disposed {
            return;
        }
        self.stop();
        self.lifecycle = PlayerState::Disposed;
        debug!("player disposed");
    }

    // join the tick thread and drop anything it left behind
    fn halt(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(Worker { handle, stop_tx }) = self.worker.take() {
            drop(stop_tx);
            if handle.join().is_err() {
                error!("tick thread panicked");
            }
        }
        while self.update_rx.try_recv().is_ok() {}
    }

    pub fn state(&self) -> PlayerState {
        // the loop may have shut itself down after repeated faults
        if self.lifecycle == PlayerState::Running && !self.is_running() {
            return PlayerState::Loaded;
        }
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Records a tap. Ignored unless the tick thread is running.
    pub fn beat(&self) {
        if !self.is_running() {
            debug!("beat ignored, player not running");
            return;
        }
        let now = self.shared.clock.now();
        self.shared.state.lock().tempo.record_tap(now);
    }

    pub fn set_start_frame(&self, start: usize) -> Result<bool> {
        let mut st = self.shared.state.lock();
        let end = st.range.end_frame();
        if start > end {
            return Err(JamifyError::InvalidRange { start, end, frame_count: st.frame_count() });
        }
        Ok(st.range.set_start_frame(start))
    }

    pub fn set_end_frame(&self, end: usize) -> Result<bool> {
        let mut st = self.shared.state.lock();
        let start = st.range.start_frame();
        let frame_count = st.frame_count();
        if end < start || end >= frame_count {
            return Err(JamifyError::InvalidRange { start, end, frame_count });
        }
        Ok(st.range.set_end_frame(end))
    }

    pub fn set_reverse(&self, reverse: bool) -> bool {
        self.shared.state.lock().range.set_reverse(reverse)
    }

    // returns the new direction
    pub fn toggle_reverse(&self) -> bool {
        let mut st = self.shared.state.lock();
        let reverse = !st.range.reverse();
        st.range.set_reverse(reverse);
        reverse
    }

    pub fn range(&self) -> PlaybackRange {
        self.shared.state.lock().range
    }

    /// Stores the offset wrapped into `0..frame_count`.
    pub fn set_offset(&self, offset: i64) -> i64 {
        let mut st = self.shared.state.lock();
        let frame_count = st.frame_count().max(1) as i64;
        st.offset = offset.rem_euclid(frame_count);
        st.offset
    }

    pub fn nudge_offset(&self, delta: i64) -> i64 {
        let mut st = self.shared.state.lock();
        let frame_count = st.frame_count().max(1) as i64;
        st.offset = (st.offset + delta).rem_euclid(frame_count);
        st.offset
    }

    pub fn offset(&self) -> i64 {
        self.shared.state.lock().offset
    }

    pub fn nudge_loop_duration(&self, delta_ms: f64) -> f64 {
        self.shared.state.lock().tempo.nudge_loop_duration(delta_ms)
    }

    pub fn loop_duration_ms(&self) -> f64 {
        self.shared.state.lock().tempo.loop_duration_ms()
    }

    /// Picked up from the next sleep on. Floored at [`MIN_RENDER_DELAY`].
    pub fn set_render_delay(&self, delay: Duration) -> Duration {
        let mut st = self.shared.state.lock();
        st.render_delay = delay.max(MIN_RENDER_DELAY);
        st.render_delay
    }

    pub fn nudge_render_delay(&self, delta_ms: f64) -> Duration {
        let current = self.render_delay().as_secs_f64() * 1000.0;
        let ms = (current + delta_ms).max(0.0);
        self.set_render_delay(Duration::from_secs_f64(ms / 1000.0))
    }

    pub fn render_delay(&self) -> Duration {
        self.shared.state.lock().render_delay
    }

    pub fn frame_count(&self) -> usize {
        self.shared.state.lock().frame_count()
    }

    pub fn status(&self) -> StatusSnapshot {
        let st = self.shared.state.lock();
        StatusSnapshot {
            loop_duration_ms: st.tempo.loop_duration_ms(),
            bpm: st.tempo.bpm(),
            sample_count: st.tempo.sample_count(),
            tapping: st.tempo.is_running(),
            frame_count: st.frame_count(),
            playing_frame_count: st.range.cycle_frame_count(),
            start_frame: st.range.start_frame(),
            end_frame: st.range.end_frame(),
            current_frame: st.scheduler.current_index(),
            reverse: st.range.reverse(),
            offset: st.offset,
            frame_duration_ms: st.scheduler.frame_duration_ms(),
            render_delay_ms: st.render_delay.as_secs_f64() * 1000.0,
            tick_interval_ms: st.scheduler.tick_interval_ms(),
            render_duration_ms: st.scheduler.render_duration_ms(),
        }
    }

    /// Runs one scheduling step on the calling thread and returns its update
    /// without publishing it. `None` until something is loaded.
    pub fn tick_now(&self) -> Result<Option<FrameUpdate<F>>> {
        tick(&self.shared)
    }

    pub fn updates(&self) -> Receiver<FrameUpdate<F>> {
        self.update_rx.clone()
    }

    /// Newest pending update. Updates it skips over still count: if any of
    /// them changed frame, so does the one returned.
    pub fn poll_frame_update(&self) -> Option<FrameUpdate<F>> {
        self.update_rx.try_iter().reduce(|older, mut newer| {
            newer.absorb(&older);
            newer
        })
    }
}

impl<F: Send + Sync + 'static> Drop for BeatSyncPlayer<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn tick<F>(shared: &Shared<F>) -> Result<Option<FrameUpdate<F>>> {
    let started = shared.clock.now();
    let mut guard = shared.state.lock();
    let st = &mut *guard;
    let Some(frames) = st.frames.clone() else {
        return Ok(None);
    };

    let elapsed_ms = st.tempo.elapsed_ms(started);
    let loop_ms = st.tempo.loop_duration_ms();
    let tick = st.scheduler.tick(started, elapsed_ms, loop_ms, st.offset, &st.range)?;
    if tick.index >= frames.len() {
        return Err(JamifyError::IndexOutOfRange {
            index: tick.index,
            start: 0,
            end: frames.len() - 1,
        });
    }
    st.scheduler.record_render(started, shared.clock.now());
    Ok(Some(FrameUpdate::new(tick.frame_changed, tick.index, frames)))
}

fn publish<F>(tx: &Sender<FrameUpdate<F>>, rx: &Receiver<FrameUpdate<F>>, update: FrameUpdate<F>) {
    match tx.try_send(update) {
        Ok(()) => {}
        Err(TrySendError::Full(mut update)) => {
            // consumer is behind: replace the oldest pending update
            if let Ok(evicted) = rx.try_recv() {
                update.absorb(&evicted);
            }
            if tx.try_send(update).is_err() {
                trace!("frame update dropped");
            }
        }
        Err(TrySendError::Disconnected(_)) => trace!("no one listening for frame updates"),
    }
}

fn tick_loop<F>(
    shared: Arc<Shared<F>>,
    stop_rx: Receiver<()>,
    tx: Sender<FrameUpdate<F>>,
    rx: Receiver<FrameUpdate<F>>,
) {
    debug!("tick loop started");
    let mut faults = 0u32;
    while shared.running.load(Ordering::Acquire) {
        let delay = shared.state.lock().render_delay;
        // sleep, waking early when the player drops its end of stop_rx
        match stop_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        if !shared.running.load(Ordering::Acquire) {
            break;
        }

        match tick(&shared) {
            Ok(Some(update)) => {
                faults = 0;
                publish(&tx, &rx, update);
            }
            Ok(None) => {}
            Err(e) => {
                faults += 1;
                warn!("tick failed ({faults} in a row): {e}");
                if faults >= MAX_CONSECUTIVE_FAULTS {
                    error!("tick loop giving up after {faults} consecutive faults");
                    shared.running.store(false, Ordering::Release);
                    break;
                }
            }
        }
    }
    debug!("tick loop exited");
}
