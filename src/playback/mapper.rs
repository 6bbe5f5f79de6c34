use crate::foundation::core::{FrameCount, FrameIndex};

/// Map a progress value onto a frame: `clamp(floor(progress), 0, count - 1)`.
///
/// This is the only place out-of-range progress is corrected. NaN maps to the first frame.
pub fn map_to_frame_index(progress: f64, frame_count: FrameCount) -> FrameIndex {
    let last = frame_count.last().0;
    if progress.is_nan() {
        return FrameIndex(0);
    }
    let floored = progress.floor().clamp(0.0, f64::from(last));
    FrameIndex(floored as u32)
}
