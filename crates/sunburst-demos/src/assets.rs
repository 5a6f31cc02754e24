use std::path::Path;

use anyhow::{Context, Result};
use sunburst_engine::render::DecodedImage;

/// Decoded RGBA8 image owned by the demo.
#[derive(Debug, Clone)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RgbaImage {
    /// Borrowed view for `Renderer::load_texture`.
    pub fn as_decoded(&self) -> DecodedImage<'_> {
        DecodedImage {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

/// Decodes a PNG file to tightly packed RGBA8, top row first.
pub fn load_png(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .into_rgba8();

    let (width, height) = img.dimensions();
    log::debug!("loaded {} ({width}x{height})", path.display());
    Ok(RgbaImage {
        pixels: img.into_raw(),
        width,
        height,
    })
}

/// Procedural stand-in sprite: yellow and black stripes in a transparent
/// circle, with a darker top row so orientation is visible.
pub fn striped_bee(size: u32) -> RgbaImage {
    let size = size.max(2);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);

    let radius = size as f32 * 0.5;
    let stripe = (size / 4).max(1);

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            let inside = dx * dx + dy * dy <= radius * radius;

            let rgba = if !inside {
                [0, 0, 0, 0]
            } else if y == 0 {
                [90, 60, 0, 255]
            } else if (y / stripe) % 2 == 0 {
                [250, 200, 20, 255]
            } else {
                [25, 20, 10, 255]
            };
            pixels.extend_from_slice(&rgba);
        }
    }

    RgbaImage { pixels, width: size, height: size }
}
