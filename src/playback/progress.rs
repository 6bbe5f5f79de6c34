use std::time::Duration;

use crate::foundation::core::{SessionId, TimestampMs};
use crate::foundation::error::{ReelError, ReelResult};

/// Geometry of the viewport region pinned while a session scrubs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinRegion {
    /// Height of the pinned surface in CSS pixels.
    pub pinned_height_px: f64,
    /// Scroll distance over which progress runs from start to end.
    pub scroll_distance_px: f64,
}

/// Everything a progress source needs to drive one session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrubBinding {
    pub session: SessionId,
    /// Progress runs over `[0, range_end]`, i.e. `[0, frame_count - 1]`.
    pub range_end: f64,
    pub pin: PinRegion,
}

/// One progress value emitted for a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressUpdate {
    pub session: SessionId,
    pub value: f64,
}

/// External source of scrub progress.
///
/// After `attach`, the source emits progress for that session (the host forwards each value to
/// [`crate::PlaybackController::on_progress`]). `release` must unpin the region and stop every
/// further emission for the session before returning.
pub trait ProgressSource {
    fn attach(&mut self, binding: ScrubBinding) -> ReelResult<()>;

    /// Recompute pinned geometry after a layout change.
    fn refresh(&mut self, session: SessionId, pin: PinRegion);

    fn release(&mut self, session: SessionId);
}

#[derive(Clone, Copy, Debug)]
struct ActiveScrub {
    session: SessionId,
    range_end: f64,
    pin: PinRegion,
    offset_px: f64,
    target: f64,
    value: f64,
    last_tick: Option<TimestampMs>,
}

impl ActiveScrub {
    fn retarget(&mut self) {
        let distance = self.pin.scroll_distance_px;
        let t = if distance > 0.0 {
            (self.offset_px / distance).clamp(0.0, 1.0)
        } else if self.offset_px > 0.0 {
            1.0
        } else {
            0.0
        };
        self.target = t * self.range_end;
    }
}

/// Scroll-offset progress source.
///
/// Maps the scroll offset inside the pinned region linearly onto the session's range. With a
/// non-zero `scrub` lag the emitted value eases toward the target over time instead of jumping.
#[derive(Clone, Debug)]
pub struct ScrollProgress {
    scrub: Duration,
    active: Option<ActiveScrub>,
}

impl ScrollProgress {
    pub fn new(scrub: Duration) -> Self {
        Self {
            scrub,
            active: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<SessionId> {
        self.active.map(|a| a.session)
    }

    pub fn pin(&self) -> Option<PinRegion> {
        self.active.map(|a| a.pin)
    }

    /// Report the scroll offset relative to the top of the pinned region.
    ///
    /// Without scrub lag the new value is emitted immediately; otherwise it is approached by
    /// subsequent [`Self::tick`] calls.
    pub fn scroll_to(&mut self, offset_px: f64, now: TimestampMs) -> Option<ProgressUpdate> {
        let scrub = self.scrub;
        let active = self.active.as_mut()?;
        active.offset_px = if offset_px.is_finite() { offset_px } else { 0.0 };
        active.retarget();
        if scrub.is_zero() {
            active.value = active.target;
            active.last_tick = Some(now);
            return Some(ProgressUpdate {
                session: active.session,
                value: active.value,
            });
        }
        if active.last_tick.is_none() {
            active.last_tick = Some(now);
        }
        None
    }

    /// Advance the scrub lag to `now`, emitting when the value moved.
    pub fn tick(&mut self, now: TimestampMs) -> Option<ProgressUpdate> {
        let scrub = self.scrub;
        let active = self.active.as_mut()?;
        let last = active.last_tick.replace(now).unwrap_or(now);
        if active.value == active.target {
            return None;
        }
        let alpha = if scrub.is_zero() {
            1.0
        } else {
            (now.since(last).as_secs_f64() / scrub.as_secs_f64()).min(1.0)
        };
        if alpha <= 0.0 {
            return None;
        }
        active.value += (active.target - active.value) * alpha;
        if (active.target - active.value).abs() < 1e-3 {
            active.value = active.target;
        }
        Some(ProgressUpdate {
            session: active.session,
            value: active.value,
        })
    }
}

impl ProgressSource for ScrollProgress {
    fn attach(&mut self, binding: ScrubBinding) -> ReelResult<()> {
        if let Some(active) = self.active {
            return Err(ReelError::precondition(format!(
                "progress source already drives session {}",
                active.session.0
            )));
        }
        if !binding.range_end.is_finite() || binding.range_end < 0.0 {
            return Err(ReelError::validation("progress range must be finite and >= 0"));
        }
        let mut active = ActiveScrub {
            session: binding.session,
            range_end: binding.range_end,
            pin: binding.pin,
            offset_px: 0.0,
            target: 0.0,
            value: 0.0,
            last_tick: None,
        };
        active.retarget();
        self.active = Some(active);
        Ok(())
    }

    fn refresh(&mut self, session: SessionId, pin: PinRegion) {
        if let Some(active) = self.active.as_mut()
            && active.session == session
        {
            active.pin = pin;
            active.retarget();
        }
    }

    fn release(&mut self, session: SessionId) {
        if self.active.is_some_and(|a| a.session == session) {
            self.active = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/progress.rs"]
mod tests;
