use std::time::Duration;

use crate::foundation::core::TimestampMs;
use crate::viewport::metrics::ViewportMetrics;
use crate::viewport::orientation::OrientationClass;
use crate::viewport::schedule::{Debouncer, FrameBoundaryWait};

/// Outcome of one settled measurement pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportDecision {
    /// Geometry is unavailable; nothing can be measured yet.
    Deferred,
    /// The viewport moved to another orientation class with its own frame set.
    Reload {
        orientation: OrientationClass,
        metrics: ViewportMetrics,
    },
    /// Same frame set; resize the surface and repaint.
    Resize { metrics: ViewportMetrics },
}

/// Turns raw resize notifications into settled measurement passes.
///
/// A notification starts (or restarts) the debounce window. When the window closes, the binder
/// waits `settle_frames` rendering-frame boundaries before the host should measure, so transient
/// layout changes have been applied.
#[derive(Clone, Copy, Debug)]
pub struct ViewportBinder {
    debounce: Debouncer,
    settle: FrameBoundaryWait,
    settle_frames: u32,
    subscribed: bool,
}

impl ViewportBinder {
    pub fn new(debounce: Duration, settle_frames: u32) -> Self {
        Self {
            debounce: Debouncer::new(debounce),
            settle: FrameBoundaryWait::default(),
            settle_frames,
            subscribed: false,
        }
    }

    pub fn subscribe(&mut self) {
        self.subscribed = true;
    }

    /// Stop reacting to notifications and drop anything pending.
    pub fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.cancel_pending();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn cancel_pending(&mut self) {
        self.debounce.cancel();
        self.settle.cancel();
    }

    /// Whether a debounce window or settle wait is outstanding.
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending() || self.settle.is_pending()
    }

    /// Record a resize notification. Any settle wait in progress is abandoned.
    pub fn on_resize_notified(&mut self, now: TimestampMs) -> bool {
        if !self.subscribed {
            return false;
        }
        self.settle.cancel();
        self.debounce.notify(now);
        true
    }

    /// Advance host time. Returns `true` when a measurement pass is due immediately.
    pub fn on_time(&mut self, now: TimestampMs) -> bool {
        if !self.subscribed || !self.debounce.poll(now) {
            return false;
        }
        self.settle.arm(self.settle_frames)
    }

    /// Count a rendering-frame boundary. Returns `true` when a measurement pass is due.
    pub fn on_animation_frame(&mut self) -> bool {
        self.subscribed && self.settle.on_frame()
    }

    /// Decide what a measurement means for the current frame set.
    pub fn assess(
        metrics: Option<ViewportMetrics>,
        current: OrientationClass,
        responsive: bool,
    ) -> ViewportDecision {
        let Some(metrics) = metrics else {
            return ViewportDecision::Deferred;
        };
        let measured = OrientationClass::classify(&metrics);
        if responsive && measured != current {
            ViewportDecision::Reload {
                orientation: measured,
                metrics,
            }
        } else {
            ViewportDecision::Resize { metrics }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/binder.rs"]
mod tests;
