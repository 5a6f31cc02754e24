/// The surface texture and encoder of the 2D frame in progress.
///
/// Held by `Gpu` from `begin_frame` until `present`. Holding the surface
/// texture blocks acquisition of the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
