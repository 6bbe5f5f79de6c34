use crate::foundation::core::{FrameCount, FrameIndex, SessionId};
use crate::foundation::error::ReelResult;
use crate::playback::mapper::map_to_frame_index;
use crate::playback::progress::{PinRegion, ProgressSource, ScrubBinding};

/// Scrub position of a bound session, kept within `[0, frame_count - 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressState {
    value: f64,
}

impl ProgressState {
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// One live binding between a progress source and the render surface.
///
/// Holding a `Session` means the source has the region pinned. The only way to end it is
/// [`Session::release`], which consumes the session so it cannot be released twice.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    frame_count: FrameCount,
    pin: PinRegion,
    progress: ProgressState,
}

impl Session {
    /// Attach `source` to a new session and request an initial geometry refresh.
    pub(crate) fn bind(
        id: SessionId,
        frame_count: FrameCount,
        pin: PinRegion,
        source: &mut dyn ProgressSource,
    ) -> ReelResult<Self> {
        source.attach(ScrubBinding {
            session: id,
            range_end: f64::from(frame_count.last().0),
            pin,
        })?;
        source.refresh(id, pin);
        tracing::debug!(session = id.0, frames = frame_count.get(), "session bound");
        Ok(Self {
            id,
            frame_count,
            pin,
            progress: ProgressState::default(),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn pin(&self) -> PinRegion {
        self.pin
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn frame_index(&self) -> FrameIndex {
        map_to_frame_index(self.progress.value, self.frame_count)
    }

    /// Record a progress value from the source and return the frame to paint.
    pub(crate) fn apply_progress(&mut self, value: f64) -> FrameIndex {
        let end = f64::from(self.frame_count.last().0);
        self.progress.value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, end)
        };
        self.frame_index()
    }

    pub(crate) fn refresh(&mut self, pin: PinRegion, source: &mut dyn ProgressSource) {
        self.pin = pin;
        source.refresh(self.id, pin);
    }

    /// Unpin the region and detach the source.
    pub(crate) fn release(self, source: &mut dyn ProgressSource) {
        source.release(self.id);
        tracing::debug!(session = self.id.0, "session released");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
