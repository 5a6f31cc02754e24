//! GPU backend seam.
//!
//! The batched renderer talks to the GPU only through [`GpuBackend`] and to the
//! window/context only through [`DrawSurface`]. `device::Gpu` implements both on
//! top of wgpu; tests use a recording double.

use std::fmt;
use std::num::NonZeroU32;

use crate::coords::{Color, DrawableSize};

use super::pipeline::PipelineDesc;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            #[inline]
            pub const fn new(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn get(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gpu_handle!(
    /// Handle to a linked GPU program (render pipeline).
    ProgramId
);
gpu_handle!(
    /// Handle to a GPU buffer.
    BufferId
);
gpu_handle!(
    /// Handle to a GPU-resident 2D texture.
    TextureId
);

/// What a buffer is bound as when drawing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Upload parameters for an RGBA8 texture.
///
/// Textures are always single-level, nearest-filtered and clamp-to-edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
}

/// One indexed draw of a streamed batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub program: ProgramId,
    pub vertex_buffer: BufferId,
    pub index_buffer: BufferId,
    /// Number of `u32` indices to draw, starting at index 0.
    pub index_count: u32,
    /// Texture bound at the pipeline's sampler binding, if any.
    pub texture: Option<TextureId>,
}

/// Failure to create a GPU resource.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Shader compilation or pipeline linking failed; carries the full message.
    ProgramCreation { label: &'static str, message: String },
    /// Buffer allocation failed.
    BufferCreation { message: String },
    /// Texture dimensions were zero or exceed the device limits.
    InvalidTextureSize { width: u32, height: u32 },
    /// Pixel buffer length does not match `width * height * 4`.
    PixelDataMismatch { expected: usize, actual: usize },
    /// Texture upload failed on the device.
    TextureCreation { message: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ProgramCreation { label, message } => {
                write!(f, "failed to build program '{label}':\n{message}")
            }
            RenderError::BufferCreation { message } => {
                write!(f, "failed to create buffer: {message}")
            }
            RenderError::InvalidTextureSize { width, height } => {
                write!(f, "invalid texture size {width}x{height}")
            }
            RenderError::PixelDataMismatch { expected, actual } => {
                write!(f, "RGBA8 pixel buffer has {actual} bytes, expected {expected}")
            }
            RenderError::TextureCreation { message } => {
                write!(f, "failed to create texture: {message}")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// GPU operations required by the batched renderer.
///
/// All methods run on the thread that owns the GPU context. Methods taking a
/// handle that is unknown to the backend are no-ops.
pub trait GpuBackend {
    /// Compiles and links the program described by `desc`.
    fn create_program(&mut self, desc: &PipelineDesc) -> Result<ProgramId, RenderError>;

    fn destroy_program(&mut self, id: ProgramId);

    /// Creates an empty buffer; storage is allocated by [`orphan_buffer`](Self::orphan_buffer).
    fn create_buffer(&mut self, kind: BufferKind, label: &'static str) -> Result<BufferId, RenderError>;

    fn destroy_buffer(&mut self, id: BufferId);

    /// Replaces the storage of `id` with fresh storage of `size` bytes.
    ///
    /// Draws already recorded against the old storage keep reading it.
    fn orphan_buffer(&mut self, id: BufferId, size: u64);

    /// Writes `data` into the current storage of `id` at `offset`.
    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]);

    /// Uploads tightly packed row-major RGBA8 pixels.
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<TextureId, RenderError>;

    fn destroy_texture(&mut self, id: TextureId);

    /// Prepares the render target for a 2D frame covering `size` pixels.
    fn begin_frame(&mut self, size: DrawableSize);

    /// Clears the whole render target.
    fn clear(&mut self, color: Color);

    fn draw(&mut self, call: &DrawCall);
}

/// Window/context collaborator: reports the drawable size and presents frames.
pub trait DrawSurface {
    /// Pixel size of the current render target.
    fn drawable_size(&self) -> DrawableSize;

    /// Presents the back buffer.
    fn present(&mut self);
}
