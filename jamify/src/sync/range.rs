// Which frames play, and in which direction. A plain value holder: ordering
// of start and end is checked by whoever edits it, not here.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackRange {
    start_frame: usize,
    end_frame: usize,
    reverse: bool, // ping-pong: forward to end, then back towards start
    cycle_frame_count: usize,
}

impl PlaybackRange {
    pub fn new(start_frame: usize, end_frame: usize, reverse: bool) -> Self {
        let mut range = Self {
            start_frame,
            end_frame,
            reverse,
            cycle_frame_count: 0,
        };
        range.sync();
        range
    }

    // every frame of an animation, played forward
    pub fn full(frame_count: usize) -> Self {
        Self::new(0, frame_count.saturating_sub(1), false)
    }

    pub fn start_frame(&self) -> usize {
        self.start_frame
    }

    pub fn end_frame(&self) -> usize {
        self.end_frame
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Frames in the range, ignoring direction.
    pub fn span(&self) -> usize {
        (self.end_frame + 1).saturating_sub(self.start_frame)
    }

    /// Scheduling steps in one cycle. Ping-pong visits the interior frames
    /// twice and the endpoints once; a single frame never ping-pongs.
    pub fn cycle_frame_count(&self) -> usize {
        self.cycle_frame_count
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_frame..=self.end_frame).contains(&index)
    }

    // setters return whether anything changed
    pub fn set_start_frame(&mut self, start_frame: usize) -> bool {
        if self.start_frame == start_frame {
            return false;
        }
        self.start_frame = start_frame;
        self.sync();
        true
    }

    pub fn set_end_frame(&mut self, end_frame: usize) -> bool {
        if self.end_frame == end_frame {
            return false;
        }
        self.end_frame = end_frame;
        self.sync();
        true
    }

    pub fn set_reverse(&mut self, reverse: bool) -> bool {
        if self.reverse == reverse {
            return false;
        }
        self.reverse = reverse;
        self.sync();
        true
    }

    fn sync(&mut self) {
        let count = self.span();
        self.cycle_frame_count = if self.reverse && count > 1 {
            count * 2 - 2
        } else {
            count
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_cycle_is_span() {
        let range = PlaybackRange::new(2, 6, false);
        assert_eq!(range.span(), 5);
        assert_eq!(range.cycle_frame_count(), 5);
    }

    #[test]
    fn reverse_cycle_doubles_minus_two() {
        assert_eq!(PlaybackRange::new(0, 3, true).cycle_frame_count(), 6);
        assert_eq!(PlaybackRange::new(4, 5, true).cycle_frame_count(), 2);
    }

    #[test]
    fn single_frame_never_ping_pongs() {
        assert_eq!(PlaybackRange::new(3, 3, true).cycle_frame_count(), 1);
    }

    #[test]
    fn setters_recompute_only_on_change() {
        let mut range = PlaybackRange::full(10);
        assert_eq!(range.cycle_frame_count(), 10);
        assert!(!range.set_start_frame(0));
        assert!(range.set_reverse(true));
        assert_eq!(range.cycle_frame_count(), 18);
        assert!(range.set_end_frame(4));
        assert_eq!(range.cycle_frame_count(), 8);
        assert!(!range.set_reverse(true));
        assert!(range.set_start_frame(4));
        assert_eq!(range.cycle_frame_count(), 1);
    }

    #[test]
    fn full_range_of_empty_set_is_a_single_slot() {
        let range = PlaybackRange::full(0);
        assert_eq!((range.start_frame(), range.end_frame()), (0, 0));
    }
}
