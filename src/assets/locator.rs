use std::fmt;

use crate::config::{CatalogConfig, FrameSetDesc};
use crate::foundation::core::{FrameCount, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::viewport::orientation::OrientationClass;

/// Addressable source of one frame image, relative to the host's asset root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetLocator(String);

impl AssetLocator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `prefix + zero-padded index + "." + extension`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameTemplate {
    prefix: String,
    extension: String,
}

impl NameTemplate {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> ReelResult<Self> {
        let prefix = prefix.into();
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_string();
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ReelError::validation(
                "frame extension must be a non-empty file extension",
            ));
        }
        // The rendered name must be a valid relative path regardless of the index.
        normalize_rel_path(&format!("{prefix}0.{extension}"))?;
        Ok(Self { prefix, extension })
    }

    pub fn render(&self, index: FrameIndex, pad_width: usize) -> AssetLocator {
        AssetLocator(format!(
            "{}{:0width$}.{}",
            self.prefix,
            index.0,
            self.extension,
            width = pad_width
        ))
    }
}

/// Immutable descriptor of one orientation's frame sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSet {
    orientation: OrientationClass,
    frame_count: FrameCount,
    template: NameTemplate,
    aspect_ratio: f64,
}

impl FrameSet {
    pub fn new(
        orientation: OrientationClass,
        frame_count: FrameCount,
        template: NameTemplate,
        aspect_ratio: f64,
    ) -> ReelResult<Self> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(ReelError::validation(
                "frame set aspect_ratio must be finite and > 0",
            ));
        }
        Ok(Self {
            orientation,
            frame_count,
            template,
            aspect_ratio,
        })
    }

    pub fn from_desc(orientation: OrientationClass, desc: &FrameSetDesc) -> ReelResult<Self> {
        Self::new(
            orientation,
            FrameCount::new(desc.frame_count)?,
            NameTemplate::new(desc.prefix.clone(), desc.extension.clone())?,
            desc.aspect_ratio,
        )
    }

    pub fn orientation(&self) -> OrientationClass {
        self.orientation
    }

    pub fn frame_count(&self) -> FrameCount {
        self.frame_count
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Locator for `index`. Callers clamp indices beforehand; an out-of-range index is a bug.
    pub fn locate(&self, index: FrameIndex) -> AssetLocator {
        debug_assert!(
            self.frame_count.contains(index),
            "frame index {} out of range for {} frames",
            index.0,
            self.frame_count.get()
        );
        self.template.render(index, self.frame_count.pad_width())
    }

    pub fn locators(&self) -> impl Iterator<Item = (FrameIndex, AssetLocator)> + '_ {
        self.frame_count.indices().map(|i| (i, self.locate(i)))
    }
}

/// The deployment's frame sets, keyed by orientation class.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetCatalog {
    /// One orientation-agnostic frame set.
    Fixed(FrameSet),
    /// Separate, unrelated frame sets for wide and tall viewports.
    Responsive { wide: FrameSet, tall: FrameSet },
}

impl AssetCatalog {
    pub fn from_config(cfg: &CatalogConfig) -> ReelResult<Self> {
        match cfg {
            CatalogConfig::Fixed { set } => {
                Ok(Self::Fixed(FrameSet::from_desc(OrientationClass::Any, set)?))
            }
            CatalogConfig::Responsive { wide, tall } => Ok(Self::Responsive {
                wide: FrameSet::from_desc(OrientationClass::Wide, wide)?,
                tall: FrameSet::from_desc(OrientationClass::Tall, tall)?,
            }),
        }
    }

    /// Whether an orientation change selects different assets.
    pub fn is_responsive(&self) -> bool {
        matches!(self, Self::Responsive { .. })
    }

    /// Frame set to use for a viewport of the given class.
    pub fn select(&self, class: OrientationClass) -> &FrameSet {
        match self {
            Self::Fixed(set) => set,
            Self::Responsive { wide, tall } => match class {
                OrientationClass::Tall => tall,
                OrientationClass::Wide | OrientationClass::Any => wide,
            },
        }
    }

    pub fn locate(&self, class: OrientationClass, index: FrameIndex) -> AssetLocator {
        self.select(class).locate(index)
    }

    pub fn frame_sets(&self) -> Vec<&FrameSet> {
        match self {
            Self::Fixed(set) => vec![set],
            Self::Responsive { wide, tall } => vec![wide, tall],
        }
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/locator.rs"]
mod tests;
