use crate::foundation::core::{Canvas, Rgb, unit_to_u8};
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::Value;
use glam::DVec2;
use std::path::Path;

/// Shaded result for one pixel, in straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Linear color.
    pub color: Rgb,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Sample {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        color: Rgb::BLACK,
        alpha: 0.0,
    };

    /// Sample with explicit opacity.
    pub fn new(color: Rgb, alpha: f64) -> Self {
        Self { color, alpha }
    }

    /// Fully opaque sample.
    pub fn opaque(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }

    /// Composite over an opaque background, returning an opaque sample.
    pub fn over(self, background: Rgb) -> Self {
        let a = self.alpha.clamp(0.0, 1.0);
        let c = self.color;
        Self::opaque(Rgb::new(
            c.r * a + background.r * (1.0 - a),
            c.g * a + background.g * (1.0 - a),
            c.b * a + background.b * (1.0 - a),
        ))
    }

    /// Quantize to straight-alpha RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        let [r, g, b] = self.color.to_rgb8();
        [r, g, b, unit_to_u8(self.alpha)]
    }
}

/// Where a pixel sits, in the coordinate systems shaders need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSample {
    /// Pixel column.
    pub x: u32,
    /// Pixel row, 0 at the top.
    pub y: u32,
    /// Pixel center in `[0, 1]^2` with `v` pointing up.
    pub uv: DVec2,
    /// Centered, aspect-corrected coordinate: `(uv - 0.5) * (width / height, 1)`.
    pub screen: DVec2,
    /// Seconds since the start of the sequence.
    pub time: f64,
}

impl PixelSample {
    /// Coordinates of pixel `(x, y)` on `canvas` at `time`.
    pub fn new(canvas: Canvas, x: u32, y: u32, time: f64) -> Self {
        let w = f64::from(canvas.width.max(1));
        let h = f64::from(canvas.height.max(1));
        let uv = DVec2::new((f64::from(x) + 0.5) / w, 1.0 - (f64::from(y) + 0.5) / h);
        let screen = (uv - 0.5) * DVec2::new(canvas.aspect(), 1.0);
        Self {
            x,
            y,
            uv,
            screen,
            time,
        }
    }
}

/// Per-pixel color source driven by the render pipeline.
///
/// `scratch` is owned by the calling worker and reused across pixels; shaders that evaluate graphs
/// hand it to [`BoundGraph`](crate::graph::BoundGraph) evaluation.
pub trait FieldShader: Sync {
    /// Shade one pixel.
    fn shade(&self, pixel: &PixelSample, scratch: &mut Vec<Value>) -> Sample;
}

impl<S: FieldShader + ?Sized> FieldShader for Box<S> {
    fn shade(&self, pixel: &PixelSample, scratch: &mut Vec<Value>) -> Sample {
        (**self).shade(pixel, scratch)
    }
}

/// A rendered RGBA8 frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, top row first.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha. Frames built here are straight alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Quantize row-major samples covering `canvas`.
    pub fn from_samples(canvas: Canvas, samples: &[Sample]) -> ProcfieldResult<Self> {
        if samples.len() != canvas.pixel_count() {
            return Err(ProcfieldError::validation(format!(
                "expected {} samples for a {}x{} frame, got {}",
                canvas.pixel_count(),
                canvas.width,
                canvas.height,
                samples.len()
            )));
        }
        let mut data = Vec::with_capacity(samples.len() * 4);
        for s in samples {
            data.extend_from_slice(&s.to_rgba8());
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: false,
        })
    }

    /// RGBA bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Write the frame as a PNG file.
    pub fn save_png(&self, path: &Path) -> ProcfieldResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| anyhow::anyhow!("write png '{}': {e}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
