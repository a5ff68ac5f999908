/// Fixed-rate tick deadline, in milliseconds on the caller's monotonic clock.
///
/// A late tick never leaves a backlog behind: if the next deadline has
/// already passed it is pulled forward to `now`, so a stalled terminal costs
/// at most one extra tick instead of a burst of catch-up moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameClock {
    frame_ms: u64,
    next_frame: u64,
}

impl FrameClock {
    pub fn new(frame_ms: u64, now: u64) -> Self {
        FrameClock { frame_ms, next_frame: now }
    }

    /// Returns `true` when a tick is due, and schedules the one after it.
    pub fn poll(&mut self, now: u64) -> bool {
        if now < self.next_frame {
            return false;
        }

        self.next_frame += self.frame_ms;
        if self.next_frame < now {
            self.next_frame = now;
        }
        true
    }

    /// How long input polling may block before the next tick is due.
    pub fn timeout(&self, now: u64) -> u64 {
        self.next_frame.saturating_sub(now)
    }
}
