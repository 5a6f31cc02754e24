//! wgpu device layer.
//!
//! - creates the Instance/Adapter/Device/Queue and configures the window surface
//! - acquires one surface texture per 2D frame and presents it
//! - implements `render::GpuBackend` and `render::DrawSurface` for [`Gpu`]

mod backend;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
