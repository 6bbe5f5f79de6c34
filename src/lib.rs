//! Scrollreel plays a pre-rendered image sequence under scroll control.
//!
//! A continuous progress value (usually a scroll offset inside a pinned region) is mapped to a
//! frame index and the matching decoded frame is painted into a raster surface. The engine is
//! event driven and single threaded:
//!
//! - Build a [`ReelConfig`] (or an [`AssetCatalog`] by hand)
//! - Create a [`PlaybackController`] over a [`FrameLoader`], [`ProgressSource`],
//!   [`RenderSurface`] and [`Viewport`]
//! - Forward load completions, progress values, resize notifications and time to it
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod playback;
pub mod render;
pub mod viewport;

pub use crate::assets::decode::PreparedFrame;
pub use crate::assets::loader::{FrameLoader, FsFrameLoader, LoadCompletion, LoadTicket};
pub use crate::assets::locator::{AssetCatalog, AssetLocator, FrameSet, NameTemplate};
pub use crate::assets::store::{FrameStore, LoadPolicy, Readiness, SlotUpdate};
pub use crate::config::{CatalogConfig, FrameSetDesc, ReelConfig};
pub use crate::foundation::core::{
    FrameCount, FrameIndex, LoadGeneration, PixelSize, SessionId, TimestampMs,
};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::playback::controller::{
    Collaborators, PlaybackController, PlaybackEvent, PlaybackOptions, PlaybackState,
};
pub use crate::playback::mapper::map_to_frame_index;
pub use crate::playback::progress::{PinRegion, ProgressSource, ProgressUpdate, ScrollProgress};
pub use crate::render::renderer::SurfaceRenderer;
pub use crate::render::surface::{CpuSurface, FrameRGBA, RenderSurface};
pub use crate::viewport::metrics::{StaticViewport, Viewport, ViewportMetrics};
pub use crate::viewport::orientation::OrientationClass;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
