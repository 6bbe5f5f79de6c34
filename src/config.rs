use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::assets::locator::AssetCatalog;
use crate::assets::store::LoadPolicy;
use crate::foundation::error::{ReelError, ReelResult};

/// Aspect ratio of the stock wide frame sets.
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;
/// Quiet window before a burst of resize notifications is handled.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;
/// Rendering-frame boundaries to wait before trusting a layout measurement.
pub const DEFAULT_SETTLE_FRAMES: u32 = 2;
/// Scroll distance over which the pinned surface plays the whole sequence.
pub const DEFAULT_SCROLL_DISTANCE_PX: f64 = 2000.0;
/// Time the scrubbed value takes to catch up with the scroll position.
pub const DEFAULT_SCRUB_SECS: f64 = 1.0;

fn default_aspect_ratio() -> f64 {
    DEFAULT_ASPECT_RATIO
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_settle_frames() -> u32 {
    DEFAULT_SETTLE_FRAMES
}

fn default_scroll_distance_px() -> f64 {
    DEFAULT_SCROLL_DISTANCE_PX
}

fn default_scrub_secs() -> f64 {
    DEFAULT_SCRUB_SECS
}

/// On-disk description of one frame sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSetDesc {
    /// Locator prefix, e.g. `frames/row_webTest7_`.
    pub prefix: String,
    /// File extension without the dot.
    pub extension: String,
    pub frame_count: u32,
    /// Width / height of the frames.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
}

/// Frame sets of a deployment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CatalogConfig {
    /// One set for every viewport shape.
    Fixed { set: FrameSetDesc },
    /// Separate sets for wide and tall viewports.
    Responsive {
        wide: FrameSetDesc,
        tall: FrameSetDesc,
    },
}

/// Deployment configuration, usually loaded from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReelConfig {
    pub catalog: CatalogConfig,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_settle_frames")]
    pub settle_frames: u32,
    #[serde(default = "default_scroll_distance_px")]
    pub scroll_distance_px: f64,
    #[serde(default = "default_scrub_secs")]
    pub scrub_secs: f64,
    /// Cap on concurrent frame requests; absent requests every frame at once.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::Fixed {
                set: FrameSetDesc {
                    prefix: "frames/row_webTest7_".to_string(),
                    extension: "jpg".to_string(),
                    frame_count: 396,
                    aspect_ratio: DEFAULT_ASPECT_RATIO,
                },
            },
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            settle_frames: DEFAULT_SETTLE_FRAMES,
            scroll_distance_px: DEFAULT_SCROLL_DISTANCE_PX,
            scrub_secs: DEFAULT_SCRUB_SECS,
            max_in_flight: None,
        }
    }
}

impl ReelConfig {
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_path(path: &Path) -> ReelResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ReelError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    /// Check every field; also builds the catalog to validate the frame sets.
    pub fn validate(&self) -> ReelResult<()> {
        self.catalog()?;
        if !self.scroll_distance_px.is_finite() || self.scroll_distance_px <= 0.0 {
            return Err(ReelError::validation(
                "scroll_distance_px must be finite and > 0",
            ));
        }
        if !self.scrub_secs.is_finite() || self.scrub_secs < 0.0 {
            return Err(ReelError::validation("scrub_secs must be finite and >= 0"));
        }
        if self.max_in_flight == Some(0) {
            return Err(ReelError::validation("max_in_flight must be >= 1 when set"));
        }
        Ok(())
    }

    pub fn catalog(&self) -> ReelResult<AssetCatalog> {
        AssetCatalog::from_config(&self.catalog)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn scrub(&self) -> Duration {
        Duration::try_from_secs_f64(self.scrub_secs).unwrap_or(Duration::ZERO)
    }

    pub fn load_policy(&self) -> LoadPolicy {
        LoadPolicy {
            max_in_flight: self.max_in_flight.and_then(NonZeroUsize::new),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
