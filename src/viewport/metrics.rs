use crate::foundation::core::{PixelSize, Size};
use crate::foundation::error::{ReelError, ReelResult};

/// Measured viewport geometry in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub size: Size,
    /// Physical pixels per CSS pixel.
    pub device_pixel_ratio: f64,
}

impl ViewportMetrics {
    pub fn new(size: Size, device_pixel_ratio: f64) -> ReelResult<Self> {
        if !size.width.is_finite()
            || !size.height.is_finite()
            || size.width < 0.0
            || size.height < 0.0
        {
            return Err(ReelError::geometry("viewport size must be finite and >= 0"));
        }
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(ReelError::geometry(
                "device pixel ratio must be finite and > 0",
            ));
        }
        Ok(Self {
            size,
            device_pixel_ratio,
        })
    }
}

/// The render surface's layout box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutBox {
    /// Size in CSS pixels.
    pub size: Size,
    pub device_pixel_ratio: f64,
}

impl LayoutBox {
    /// Full viewport width, height derived from `aspect_ratio` (width / height).
    pub fn fit_width(metrics: &ViewportMetrics, aspect_ratio: f64) -> Self {
        let width = metrics.size.width;
        let height = if aspect_ratio > 0.0 {
            width / aspect_ratio
        } else {
            0.0
        };
        Self {
            size: Size::new(width, height),
            device_pixel_ratio: metrics.device_pixel_ratio,
        }
    }

    /// Backing-buffer size: the box in physical pixels, rounded.
    pub fn pixel_size(&self) -> PixelSize {
        let to_px = |css: f64| {
            let px = (css * self.device_pixel_ratio).round();
            if px.is_finite() && px > 0.0 {
                px.min(f64::from(u32::MAX)) as u32
            } else {
                0
            }
        };
        PixelSize::new(to_px(self.size.width), to_px(self.size.height))
    }
}

/// Host viewport queries.
pub trait Viewport {
    /// Current viewport geometry, or `None` while the surface is not mounted.
    fn metrics(&self) -> Option<ViewportMetrics>;
}

/// Headless viewport whose geometry is set explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StaticViewport {
    metrics: Option<ViewportMetrics>,
}

impl StaticViewport {
    pub fn new(metrics: Option<ViewportMetrics>) -> Self {
        Self { metrics }
    }

    pub fn set(&mut self, metrics: Option<ViewportMetrics>) {
        self.metrics = metrics;
    }
}

impl Viewport for StaticViewport {
    fn metrics(&self) -> Option<ViewportMetrics> {
        self.metrics
    }
}
