use crate::assets::store::FrameStore;
use crate::foundation::core::{FrameIndex, PixelSize};
use crate::foundation::error::ReelResult;
use crate::render::surface::RenderSurface;
use crate::viewport::metrics::{LayoutBox, ViewportMetrics};

/// Geometry of the render surface as last measured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceState {
    pub pixel_size: PixelSize,
    /// Width / height of the frame set the surface is currently laid out for.
    pub aspect_ratio: f64,
}

/// What a render call painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The frame was loaded and drawn.
    Drawn(FrameIndex),
    /// The slot was unloaded or failed; the surface was left cleared.
    Blank(FrameIndex),
}

/// Sole writer of the surface's pixels.
#[derive(Debug)]
pub struct SurfaceRenderer<S> {
    surface: S,
    state: SurfaceState,
    renders: u64,
}

impl<S: RenderSurface> SurfaceRenderer<S> {
    pub fn new(surface: S, aspect_ratio: f64) -> Self {
        let pixel_size = surface.pixel_size();
        Self {
            surface,
            state: SurfaceState {
                pixel_size,
                aspect_ratio,
            },
            renders: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Number of render passes so far.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.state.aspect_ratio = aspect_ratio;
    }

    /// Layout box the surface occupies in a viewport, using the current aspect ratio.
    pub fn layout_for(&self, metrics: &ViewportMetrics) -> LayoutBox {
        LayoutBox::fit_width(metrics, self.state.aspect_ratio)
    }

    /// Clear the surface, then paint `frame` if its slot is loaded.
    ///
    /// `frame` must already be clamped into the store's range.
    pub fn render(&mut self, store: &FrameStore, frame: FrameIndex) -> ReelResult<RenderOutcome> {
        self.renders += 1;
        self.surface.clear();
        match store.frame(frame) {
            Some(image) => {
                self.surface.draw_image_fill(image)?;
                Ok(RenderOutcome::Drawn(frame))
            }
            None => Ok(RenderOutcome::Blank(frame)),
        }
    }

    /// Match the backing buffer to `size`. Prior contents are gone; follow with [`Self::render`].
    pub fn resize(&mut self, size: PixelSize) -> ReelResult<()> {
        self.surface.set_pixel_size(size)?;
        self.state.pixel_size = size;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
