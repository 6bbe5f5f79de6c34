use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded frame image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedFrame {
    /// Wrap already-premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ReelResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(ReelError::asset(format!(
                "frame buffer of {} bytes does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_frame(bytes: &[u8]) -> ReelResult<PreparedFrame> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode frame image from memory")
        .map_err(|e| ReelError::asset(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PreparedFrame::from_premul(width, height, rgba8_premul)
}

/// Read and decode one frame file.
pub fn load_frame_file(path: &Path) -> ReelResult<PreparedFrame> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read frame bytes from '{}'", path.display()))
        .map_err(|e| ReelError::asset(format!("{e:#}")))?;
    decode_frame(&bytes)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
