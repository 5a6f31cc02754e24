//! Batched 2D rendering.
//!
//! Client code queues solid rectangles and textured sprites in pixel space
//! (top-left origin, +Y down) between `begin_2d` and `end_2d`. Geometry is
//! converted to NDC on the CPU and accumulated into one batch per pipeline;
//! each flush uploads a batch and issues a single indexed draw.
//!
//! The renderer talks to the GPU only through [`GpuBackend`] and
//! [`DrawSurface`]. `device::Gpu` is the wgpu implementation.

mod backend;
mod batch;
mod pipeline;
mod renderer;
mod texture;
mod vertex;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{
    BufferId, BufferKind, DrawCall, DrawSurface, GpuBackend, ProgramId, RenderError, TextureDesc,
    TextureId,
};
pub use batch::{pixel_rect_to_ndc, CapacityError, NdcRect, QuadBatch, DEFAULT_QUAD_CAPACITY};
pub use pipeline::{Pipeline, PipelineDesc, PipelineKind, PipelineRegistry};
pub use renderer::{FrameState, FrameStats, Renderer, RendererConfig};
pub use texture::{DecodedImage, Texture};
pub use vertex::{SolidVertex, TexturedVertex, INDICES_PER_QUAD, VERTICES_PER_QUAD};
