// What the player hands across the boundary: the loaded frames, and one
// update per tick saying which of them is current.

use std::fmt;
use std::sync::Arc;

/// An ordered, immutable set of frames. Cloning shares the frames.
pub struct FrameSet<F> {
    frames: Arc<[F]>,
}

impl<F> FrameSet<F> {
    pub fn new(frames: Vec<F>) -> Self {
        Self { frames: frames.into() }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&F> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F> {
        self.frames.iter()
    }

    // same underlying allocation, i.e. the same loaded animation
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.frames, &other.frames)
    }
}

impl<F> Clone for FrameSet<F> {
    fn clone(&self) -> Self {
        Self { frames: Arc::clone(&self.frames) }
    }
}

impl<F> From<Vec<F>> for FrameSet<F> {
    fn from(frames: Vec<F>) -> Self {
        Self::new(frames)
    }
}

impl<F> fmt::Debug for FrameSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSet").field("len", &self.len()).finish()
    }
}

/// Published once per tick. `frame_changed` is false when the tick landed on
/// the same index as the previous one, so a renderer can skip the redraw.
pub struct FrameUpdate<F> {
    frame_changed: bool,
    index: usize,
    frames: FrameSet<F>,
}

impl<F> FrameUpdate<F> {
    // index is checked against the set by the tick before an update is built
    pub(crate) fn new(frame_changed: bool, index: usize, frames: FrameSet<F>) -> Self {
        debug_assert!(index < frames.len());
        Self { frame_changed, index, frames }
    }

    pub fn frame_changed(&self) -> bool {
        self.frame_changed
    }

    // folds in an older update this one supersedes, so a change is not lost
    pub(crate) fn absorb(&mut self, older: &FrameUpdate<F>) {
        self.frame_changed |= older.frame_changed;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &F {
        &self.frames.frames[self.index]
    }

    pub fn frames(&self) -> &FrameSet<F> {
        &self.frames
    }
}

impl<F> Clone for FrameUpdate<F> {
    fn clone(&self) -> Self {
        Self {
            frame_changed: self.frame_changed,
            index: self.index,
            frames: self.frames.clone(),
        }
    }
}

impl<F> fmt::Debug for FrameUpdate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameUpdate")
            .field("frame_changed", &self.frame_changed)
            .field("index", &self.index)
            .field("frames", &self.frames)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Idle,    // nothing loaded yet
    Loaded,  // frames loaded, tick thread not running
    Running,
    Disposed,
}
