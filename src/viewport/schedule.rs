//! Explicit scheduling primitives driven by host time and rendering-frame boundaries.
//!
//! Both primitives hold at most one pending callback. Re-arming replaces the pending one instead
//! of enqueueing another.

use std::time::Duration;

use crate::foundation::core::TimestampMs;

/// Trailing-edge debounce: only the last notification inside the window fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<TimestampMs>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a notification at `now`, discarding any pending one.
    pub fn notify(&mut self, now: TimestampMs) {
        self.deadline = Some(now.saturating_add(self.window));
    }

    /// Returns `true` exactly once when the quiet window has elapsed.
    pub fn poll(&mut self, now: TimestampMs) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<TimestampMs> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Waits for a fixed number of rendering-frame boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameBoundaryWait {
    remaining: Option<u32>,
}

impl FrameBoundaryWait {
    /// Start waiting for `frames` boundaries, replacing any pending wait.
    ///
    /// Returns `true` when `frames` is zero and the wait is already over.
    pub fn arm(&mut self, frames: u32) -> bool {
        if frames == 0 {
            self.remaining = None;
            return true;
        }
        self.remaining = Some(frames);
        false
    }

    /// Count one frame boundary. Returns `true` when the wait completes.
    pub fn on_frame(&mut self) -> bool {
        match self.remaining {
            Some(1) => {
                self.remaining = None;
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/schedule.rs"]
mod tests;
