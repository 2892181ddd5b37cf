// Beat-synchronized frame scheduling. Works on frame indices and time only;
// decoding and drawing live in `loader` and `tui`.

mod clock;
mod player;
mod range;
mod scheduler;
mod status;
mod tempo;

pub use clock::{Clock, ManualClock, SystemClock};
pub use player::{BeatSyncPlayer, DEFAULT_RENDER_DELAY, MIN_RENDER_DELAY, PlayerConfig};
pub use range::PlaybackRange;
pub use scheduler::{Position, Scheduler, Tick, frame_position};
pub use status::StatusSnapshot;
pub use tempo::{DEFAULT_LOOP_DURATION_MS, MIN_LOOP_DURATION_MS, TempoEstimator};
