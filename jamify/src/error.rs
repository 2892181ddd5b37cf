use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JamifyError>;

#[derive(Debug, Error)]
pub enum JamifyError {
    #[error("could not access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode animation: {0}")]
    Decode(#[from] image::ImageError),

    #[error("animation has no frames")]
    EmptyFrameSet,

    // start > end, or end past the last frame
    #[error("invalid playback range {start}..={end} for {frame_count} frames")]
    InvalidRange {
        start: usize,
        end: usize,
        frame_count: usize,
    },

    #[error("player has been disposed")]
    Disposed,

    #[error("scheduled frame {index} is outside {start}..={end}")]
    IndexOutOfRange { index: usize, start: usize, end: usize },

    #[error("could not spawn tick thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("malformed settings: {0}")]
    Settings(#[from] serde_json::Error),
}
