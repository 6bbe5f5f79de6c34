use crate::viewport::metrics::ViewportMetrics;

/// Coarse viewport shape bucket selecting which frame set to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationClass {
    /// Width >= height.
    Wide,
    /// Height > width.
    Tall,
    /// Orientation-agnostic frame set.
    Any,
}

impl OrientationClass {
    /// Classify a viewport. Square viewports count as wide.
    pub fn classify(metrics: &ViewportMetrics) -> Self {
        if metrics.size.height > metrics.size.width {
            Self::Tall
        } else {
            Self::Wide
        }
    }
}
