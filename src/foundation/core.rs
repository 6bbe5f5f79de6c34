use std::num::NonZeroU32;
use std::time::Duration;

use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Size};

/// Zero-based index of a frame inside a frame set.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Position of this frame as a slot offset.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Number of frames in a frame set. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FrameCount(NonZeroU32);

impl FrameCount {
    pub fn new(count: u32) -> ReelResult<Self> {
        NonZeroU32::new(count)
            .map(Self)
            .ok_or_else(|| ReelError::validation("frame_count must be >= 1"))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Highest valid frame index (`count - 1`).
    pub fn last(self) -> FrameIndex {
        FrameIndex(self.0.get() - 1)
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        f.0 < self.0.get()
    }

    /// Decimal width of the highest index, used to zero-pad asset names.
    pub fn pad_width(self) -> usize {
        self.last().0.checked_ilog10().map_or(1, |l| l as usize + 1)
    }

    pub fn indices(self) -> impl Iterator<Item = FrameIndex> {
        (0..self.0.get()).map(FrameIndex)
    }
}

impl TryFrom<u32> for FrameCount {
    type Error = ReelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameCount> for u32 {
    fn from(value: FrameCount) -> Self {
        value.get()
    }
}

/// Backing-buffer size of a raster surface, in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Host-supplied monotonic time in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampMs(pub u64);

impl TimestampMs {
    pub fn saturating_add(self, d: Duration) -> Self {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ms))
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: TimestampMs) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Identity of one bound scroll session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

/// Identity of one frame-set load. Bumped whenever the frame store is replaced or torn down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadGeneration(pub u64);

impl LoadGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
