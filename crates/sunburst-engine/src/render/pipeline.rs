//! Pipeline registry: the solid-rectangle and textured-sprite programs plus the
//! buffers each one streams through.
//!
//! Program creation failures are logged and leave the pipeline disabled; every
//! later draw through a disabled pipeline is dropped.

use super::backend::{BufferId, BufferKind, DrawCall, GpuBackend, ProgramId, TextureId};
use super::vertex::{
    build_quad_indices, straight_alpha_blend, SolidVertex, TexturedVertex, INDICES_PER_QUAD,
};

/// Draw kinds with a dedicated pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Solid,
    Textured,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 2] = [PipelineKind::Solid, PipelineKind::Textured];
}

/// Everything a backend needs to build one program.
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    pub kind: PipelineKind,
    pub label: &'static str,
    /// WGSL module with `vs_main` / `fs_main` entry points.
    pub wgsl: &'static str,
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
    pub blend: wgpu::BlendState,
    /// Bind group 0 slot of the sampled texture; the sampler sits at the next slot.
    pub texture_binding: Option<u32>,
}

impl PipelineDesc {
    pub fn solid() -> Self {
        Self {
            kind: PipelineKind::Solid,
            label: "sunburst solid rect",
            wgsl: include_str!("shaders/solid.wgsl"),
            vertex_layout: SolidVertex::layout(),
            blend: straight_alpha_blend(),
            texture_binding: None,
        }
    }

    pub fn textured() -> Self {
        Self {
            kind: PipelineKind::Textured,
            label: "sunburst textured sprite",
            wgsl: include_str!("shaders/textured.wgsl"),
            vertex_layout: TexturedVertex::layout(),
            blend: straight_alpha_blend(),
            texture_binding: Some(0),
        }
    }

    pub fn for_kind(kind: PipelineKind) -> Self {
        match kind {
            PipelineKind::Solid => Self::solid(),
            PipelineKind::Textured => Self::textured(),
        }
    }
}

/// One program with its streaming vertex buffer and quad index buffer.
#[derive(Debug)]
pub struct Pipeline {
    kind: PipelineKind,
    program: Option<ProgramId>,
    vertex_buffer: Option<BufferId>,
    index_buffer: Option<BufferId>,
    /// Quads covered by the index data last uploaded.
    index_capacity: usize,
}

impl Pipeline {
    fn create<B: GpuBackend + ?Sized>(backend: &mut B, desc: &PipelineDesc, initial_quads: usize) -> Self {
        let program = match backend.create_program(desc) {
            Ok(id) => Some(id),
            Err(e) => {
                log::error!("{e}");
                log::error!("{:?} pipeline disabled; its draws will be dropped", desc.kind);
                None
            }
        };

        let vertex_buffer = create_buffer(backend, BufferKind::Vertex, "sunburst batch vbo");
        let index_buffer = create_buffer(backend, BufferKind::Index, "sunburst quad ibo");

        let mut pipeline = Self {
            kind: desc.kind,
            program,
            vertex_buffer,
            index_buffer,
            index_capacity: 0,
        };
        if pipeline.is_functional() {
            pipeline.ensure_indices(backend, initial_quads);
        }
        pipeline
    }

    #[inline]
    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    #[inline]
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    /// `false` when any GPU object failed to build or the pipeline was destroyed.
    #[inline]
    pub fn is_functional(&self) -> bool {
        self.program.is_some() && self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    /// Quads the uploaded index buffer can address.
    #[inline]
    pub fn index_capacity(&self) -> usize {
        self.index_capacity
    }

    /// Re-uploads quad indices when `quads` exceeds what was last uploaded.
    fn ensure_indices<B: GpuBackend + ?Sized>(&mut self, backend: &mut B, quads: usize) {
        if quads <= self.index_capacity {
            return;
        }
        let Some(ibo) = self.index_buffer else { return };

        let indices = build_quad_indices(quads);
        let bytes: &[u8] = bytemuck::cast_slice(&indices);
        backend.orphan_buffer(ibo, bytes.len() as u64);
        backend.write_buffer(ibo, 0, bytes);
        self.index_capacity = quads;
    }

    /// Uploads `vertex_bytes` (orphan, then write) and issues one indexed draw.
    ///
    /// `batch_capacity` is the owning batch's capacity in quads; the index
    /// buffer follows it. Returns `false` if nothing was submitted.
    pub(crate) fn submit<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        vertex_bytes: &[u8],
        quads: usize,
        batch_capacity: usize,
        texture: Option<TextureId>,
    ) -> bool {
        if quads == 0 {
            return false;
        }
        let (Some(program), Some(vbo), Some(ibo)) = (self.program, self.vertex_buffer, self.index_buffer)
        else {
            return false;
        };

        self.ensure_indices(backend, batch_capacity.max(quads));

        backend.orphan_buffer(vbo, vertex_bytes.len() as u64);
        backend.write_buffer(vbo, 0, vertex_bytes);
        backend.draw(&DrawCall {
            program,
            vertex_buffer: vbo,
            index_buffer: ibo,
            index_count: (quads * INDICES_PER_QUAD) as u32,
            texture,
        });
        true
    }

    fn destroy<B: GpuBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(id) = self.program.take() {
            backend.destroy_program(id);
        }
        if let Some(id) = self.vertex_buffer.take() {
            backend.destroy_buffer(id);
        }
        if let Some(id) = self.index_buffer.take() {
            backend.destroy_buffer(id);
        }
        self.index_capacity = 0;
    }
}

fn create_buffer<B: GpuBackend + ?Sized>(
    backend: &mut B,
    kind: BufferKind,
    label: &'static str,
) -> Option<BufferId> {
    match backend.create_buffer(kind, label) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("{e}");
            None
        }
    }
}

/// Owns exactly one [`Pipeline`] per [`PipelineKind`].
#[derive(Debug)]
pub struct PipelineRegistry {
    solid: Pipeline,
    textured: Pipeline,
}

impl PipelineRegistry {
    /// Builds both pipelines with index data for `initial_quads` quads.
    pub fn create<B: GpuBackend + ?Sized>(backend: &mut B, initial_quads: usize) -> Self {
        let solid = Pipeline::create(backend, &PipelineDesc::solid(), initial_quads);
        let textured = Pipeline::create(backend, &PipelineDesc::textured(), initial_quads);
        log::debug!(
            "pipelines ready (solid: {}, textured: {})",
            solid.is_functional(),
            textured.is_functional()
        );
        Self { solid, textured }
    }

    #[inline]
    pub fn get(&self, kind: PipelineKind) -> &Pipeline {
        match kind {
            PipelineKind::Solid => &self.solid,
            PipelineKind::Textured => &self.textured,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, kind: PipelineKind) -> &mut Pipeline {
        match kind {
            PipelineKind::Solid => &mut self.solid,
            PipelineKind::Textured => &mut self.textured,
        }
    }

    /// Releases both programs and their buffers. Calling it again does nothing.
    pub fn destroy<B: GpuBackend + ?Sized>(&mut self, backend: &mut B) {
        self.solid.destroy(backend);
        self.textured.destroy(backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{GpuCall, RecordingBackend};

    #[test]
    fn descriptors_bind_texture_only_for_sprites() {
        assert_eq!(PipelineDesc::solid().texture_binding, None);
        assert_eq!(PipelineDesc::textured().texture_binding, Some(0));
        assert!(PipelineDesc::solid().wgsl.contains("vs_main"));
        assert!(PipelineDesc::textured().wgsl.contains("textureSample"));
    }

    #[test]
    fn create_builds_two_programs_and_uploads_indices() {
        let mut gpu = RecordingBackend::new();
        let registry = PipelineRegistry::create(&mut gpu, 16);

        for kind in PipelineKind::ALL {
            let p = registry.get(kind);
            assert_eq!(p.kind(), kind);
            assert!(p.is_functional());
            assert_eq!(p.index_capacity(), 16);
        }
        assert_eq!(gpu.count(|c| matches!(c, GpuCall::CreateProgram(_))), 2);
        assert_eq!(gpu.count(|c| matches!(c, GpuCall::CreateBuffer(_))), 4);
        assert_eq!(gpu.count(|c| matches!(c, GpuCall::WriteBuffer { len: 384, .. })), 2);
    }

    #[test]
    fn failed_program_disables_only_that_pipeline() {
        let mut gpu = RecordingBackend::new();
        gpu.fail_program(PipelineKind::Textured);
        let registry = PipelineRegistry::create(&mut gpu, 8);

        assert!(registry.get(PipelineKind::Solid).is_functional());
        assert!(!registry.get(PipelineKind::Textured).is_functional());
        assert!(registry.get(PipelineKind::Textured).program().is_none());
    }

    #[test]
    fn submit_regrows_indices_then_draws() {
        let mut gpu = RecordingBackend::new();
        let mut registry = PipelineRegistry::create(&mut gpu, 4);
        gpu.clear_log();

        let bytes = [0u8; 8 * 4 * 24];
        let p = registry.get_mut(PipelineKind::Solid);
        assert!(p.submit(&mut gpu, &bytes, 8, 8, None));
        assert_eq!(p.index_capacity(), 8);

        // indices: orphan + write, vertices: orphan + write, draw
        assert_eq!(gpu.calls().len(), 5);
        assert_eq!(gpu.draws().len(), 1);
        assert_eq!(gpu.draws()[0].index_count, 48);
    }

    #[test]
    fn submit_on_disabled_pipeline_is_a_no_op() {
        let mut gpu = RecordingBackend::new();
        gpu.fail_program(PipelineKind::Solid);
        let mut registry = PipelineRegistry::create(&mut gpu, 4);
        gpu.clear_log();

        let p = registry.get_mut(PipelineKind::Solid);
        assert!(!p.submit(&mut gpu, &[0u8; 96], 1, 4, None));
        assert!(gpu.calls().is_empty());
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut gpu = RecordingBackend::new();
        let mut registry = PipelineRegistry::create(&mut gpu, 4);
        gpu.clear_log();

        registry.destroy(&mut gpu);
        let first = gpu.calls().len();
        assert_eq!(first, 6);

        registry.destroy(&mut gpu);
        assert_eq!(gpu.calls().len(), first);
        assert!(!registry.get(PipelineKind::Solid).is_functional());
    }
}
