//! GPU-resident sprite textures.
//!
//! Textures are caller-owned: the renderer never destroys one on its own. A
//! zeroed [`Texture`] (no id) is valid everywhere and draws nothing.

use super::backend::{GpuBackend, RenderError, TextureDesc, TextureId};

const BYTES_PER_PIXEL: usize = 4;

/// Decoded RGBA8 image handed over by an image loader.
#[derive(Debug, Copy, Clone)]
pub struct DecodedImage<'a> {
    /// Row-major, top row first, tightly packed RGBA8.
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
}

/// A texture handle plus its size in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Texture {
    id: Option<TextureId>,
    width: i32,
    height: i32,
}

impl Texture {
    /// Uploads `pixels` as a single-level RGBA8 texture.
    pub fn create<B: GpuBackend + ?Sized>(
        backend: &mut B,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Texture, RenderError> {
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(RenderError::InvalidTextureSize { width, height });
        };
        if w == 0 || h == 0 {
            return Err(RenderError::InvalidTextureSize { width, height });
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(RenderError::InvalidTextureSize { width, height })?;
        if pixels.len() != expected {
            return Err(RenderError::PixelDataMismatch { expected, actual: pixels.len() });
        }

        let id = backend.create_texture(&TextureDesc { width, height }, pixels)?;
        log::debug!("texture {} created ({width}x{height})", id.get());

        Ok(Texture { id: Some(id), width: w, height: h })
    }

    /// Releases the GPU texture and zeroes the handle. No-op on a zeroed texture.
    pub fn destroy<B: GpuBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(id) = self.id.take() {
            backend.destroy_texture(id);
        }
        self.width = 0;
        self.height = 0;
    }

    #[inline]
    pub fn id(&self) -> Option<TextureId> {
        self.id
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }
}
