//! Recording backend used by renderer unit tests.

use std::collections::HashMap;
use std::num::NonZeroU32;

use crate::coords::{Color, DrawableSize};

use super::backend::{
    BufferId, BufferKind, DrawCall, DrawSurface, GpuBackend, ProgramId, RenderError, TextureDesc,
    TextureId,
};
use super::pipeline::{PipelineDesc, PipelineKind};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GpuCall {
    CreateProgram(PipelineKind),
    DestroyProgram(ProgramId),
    CreateBuffer(BufferKind),
    DestroyBuffer(BufferId),
    OrphanBuffer { id: BufferId, size: u64 },
    WriteBuffer { id: BufferId, offset: u64, len: usize },
    CreateTexture { width: u32, height: u32 },
    DestroyTexture(TextureId),
    BeginFrame(DrawableSize),
    Clear(Color),
    Draw(DrawCall),
}

/// Counts every backend call and keeps buffer contents so tests can inspect
/// exactly what reached a draw.
#[derive(Debug)]
pub(crate) struct RecordingBackend {
    calls: Vec<GpuCall>,
    next_id: u32,
    failing_programs: Vec<PipelineKind>,
    buffers: HashMap<BufferId, Vec<u8>>,
    /// Vertex buffer contents captured at each draw, in draw order.
    drawn_vertices: Vec<Vec<u8>>,
    pub(crate) size: DrawableSize,
    pub(crate) presents: usize,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_id: 0,
            failing_programs: Vec::new(),
            buffers: HashMap::new(),
            drawn_vertices: Vec::new(),
            size: DrawableSize::new(800, 600),
            presents: 0,
        }
    }

    pub(crate) fn with_size(width: i32, height: i32) -> Self {
        Self { size: DrawableSize::new(width, height), ..Self::new() }
    }

    /// Makes `create_program` fail for `kind`.
    pub(crate) fn fail_program(&mut self, kind: PipelineKind) {
        self.failing_programs.push(kind);
    }

    pub(crate) fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    pub(crate) fn clear_log(&mut self) {
        self.calls.clear();
        self.drawn_vertices.clear();
    }

    pub(crate) fn count(&self, pred: impl Fn(&GpuCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn draws(&self) -> Vec<DrawCall> {
        self.calls
            .iter()
            .filter_map(|c| if let GpuCall::Draw(d) = c { Some(*d) } else { None })
            .collect()
    }

    /// Vertex data bound by the `index`-th draw, reinterpreted as `V`.
    pub(crate) fn drawn_vertices<V: bytemuck::Pod>(&self, index: usize) -> Vec<V> {
        self.drawn_vertices[index]
            .chunks_exact(std::mem::size_of::<V>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    fn next_raw(&mut self) -> NonZeroU32 {
        self.next_id += 1;
        NonZeroU32::new(self.next_id).unwrap()
    }
}

impl GpuBackend for RecordingBackend {
    fn create_program(&mut self, desc: &PipelineDesc) -> Result<ProgramId, RenderError> {
        self.calls.push(GpuCall::CreateProgram(desc.kind));
        if self.failing_programs.contains(&desc.kind) {
            return Err(RenderError::ProgramCreation {
                label: desc.label,
                message: "error: injected compile failure".to_string(),
            });
        }
        Ok(ProgramId::new(self.next_raw()))
    }

    fn destroy_program(&mut self, id: ProgramId) {
        self.calls.push(GpuCall::DestroyProgram(id));
    }

    fn create_buffer(&mut self, kind: BufferKind, _label: &'static str) -> Result<BufferId, RenderError> {
        self.calls.push(GpuCall::CreateBuffer(kind));
        let id = BufferId::new(self.next_raw());
        self.buffers.insert(id, Vec::new());
        Ok(id)
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        self.calls.push(GpuCall::DestroyBuffer(id));
        self.buffers.remove(&id);
    }

    fn orphan_buffer(&mut self, id: BufferId, size: u64) {
        self.calls.push(GpuCall::OrphanBuffer { id, size });
        if let Some(storage) = self.buffers.get_mut(&id) {
            *storage = vec![0; size as usize];
        }
    }

    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) {
        self.calls.push(GpuCall::WriteBuffer { id, offset, len: data.len() });
        if let Some(storage) = self.buffers.get_mut(&id) {
            let start = offset as usize;
            storage[start..start + data.len()].copy_from_slice(data);
        }
    }

    fn create_texture(&mut self, desc: &TextureDesc, _pixels: &[u8]) -> Result<TextureId, RenderError> {
        self.calls.push(GpuCall::CreateTexture { width: desc.width, height: desc.height });
        Ok(TextureId::new(self.next_raw()))
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.calls.push(GpuCall::DestroyTexture(id));
    }

    fn begin_frame(&mut self, size: DrawableSize) {
        self.calls.push(GpuCall::BeginFrame(size));
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(GpuCall::Clear(color));
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(GpuCall::Draw(*call));
        let vertices = self.buffers.get(&call.vertex_buffer).cloned().unwrap_or_default();
        self.drawn_vertices.push(vertices);
    }
}

impl DrawSurface for RecordingBackend {
    fn drawable_size(&self) -> DrawableSize {
        self.size
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}
