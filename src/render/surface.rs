use std::sync::Arc;

use crate::assets::decode::PreparedFrame;
use crate::foundation::core::{Affine, PixelSize, Size};
use crate::foundation::error::{ReelError, ReelResult};

/// A read-back of a surface's pixels.
///
/// Frames are **premultiplied alpha**; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at (`x`, `y`), if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Copy of the pixels with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 {
                    px[..3].fill(0);
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }
}

/// Raster surface the renderer paints into.
///
/// Resizing discards the previous contents; callers repaint afterwards.
pub trait RenderSurface {
    fn pixel_size(&self) -> PixelSize;

    fn set_pixel_size(&mut self, size: PixelSize) -> ReelResult<()>;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Draw `image` stretched to exactly cover the surface.
    fn draw_image_fill(&mut self, image: &PreparedFrame) -> ReelResult<()>;
}

/// Affine mapping an image's pixel rectangle onto a surface, stretching both axes independently.
pub fn fill_transform(image: Size, surface: Size) -> Affine {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Affine::scale(0.0);
    }
    Affine::scale_non_uniform(surface.width / image.width, surface.height / image.height)
}

/// Last converted frame. Holding `source` pins its buffer so the pointer identity stays unique.
#[derive(Clone)]
struct CachedPaint {
    source: Arc<Vec<u8>>,
    width: u32,
    height: u32,
    paint: vello_cpu::Image,
}

impl CachedPaint {
    fn matches(&self, image: &PreparedFrame) -> bool {
        Arc::ptr_eq(&self.source, &image.rgba8_premul)
            && self.width == image.width
            && self.height == image.height
    }
}

/// CPU raster surface powered by `vello_cpu`.
pub struct CpuSurface {
    size: PixelSize,
    pixmap: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    paint: Option<CachedPaint>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("size", &self.size)
            .field("has_pixmap", &self.pixmap.is_some())
            .finish()
    }
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSurface {
    /// An unsized surface; the first resize allocates the backing buffer.
    pub fn new() -> Self {
        Self {
            size: PixelSize::default(),
            pixmap: None,
            ctx: None,
            paint: None,
        }
    }

    /// Read back the current pixels. An empty surface yields an empty frame.
    pub fn snapshot(&self) -> FrameRGBA {
        let data = match &self.pixmap {
            Some(p) => p.data_as_u8_slice().to_vec(),
            None => Vec::new(),
        };
        FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data,
            premultiplied: true,
        }
    }

    fn paint_for(&mut self, image: &PreparedFrame) -> ReelResult<vello_cpu::Image> {
        if let Some(cached) = &self.paint
            && cached.matches(image)
        {
            return Ok(cached.paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.paint = Some(CachedPaint {
            source: Arc::clone(&image.rgba8_premul),
            width: image.width,
            height: image.height,
            paint: paint.clone(),
        });
        Ok(paint)
    }
}

impl RenderSurface for CpuSurface {
    fn pixel_size(&self) -> PixelSize {
        self.size
    }

    fn set_pixel_size(&mut self, size: PixelSize) -> ReelResult<()> {
        if size.is_empty() {
            self.size = size;
            self.pixmap = None;
            return Ok(());
        }
        let (w, h) = to_u16_dims(size)?;
        self.size = size;
        self.pixmap = Some(vello_cpu::Pixmap::new(w, h));
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(p) = self.pixmap.as_mut() {
            p.data_as_u8_slice_mut().fill(0);
        }
    }

    fn draw_image_fill(&mut self, image: &PreparedFrame) -> ReelResult<()> {
        if self.pixmap.is_none() {
            return Ok(());
        }
        let paint = self.paint_for(image)?;
        let (width, height) = to_u16_dims(self.size)?;
        let tr = fill_transform(
            Size::new(f64::from(image.width), f64::from(image.height)),
            Size::new(f64::from(self.size.width), f64::from(self.size.height)),
        );

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        ctx.flush();
        if let Some(dst) = self.pixmap.as_mut() {
            ctx.render_to_pixmap(dst);
        }
        self.ctx = Some(ctx);
        Ok(())
    }
}

fn to_u16_dims(size: PixelSize) -> ReelResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| ReelError::geometry("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| ReelError::geometry("surface height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let (w, h) = to_u16_dims(PixelSize::new(width, height))?;
    if bytes.len() != PixelSize::new(width, height).byte_len() {
        return Err(ReelError::asset("frame byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; frame bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
