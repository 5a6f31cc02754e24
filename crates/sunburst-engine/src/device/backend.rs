//! `render::GpuBackend` on top of wgpu.
//!
//! Every draw records its own render pass into the frame encoder with
//! `LoadOp::Load`, so draws composite in submission order. `queue.write_buffer`
//! calls all land before the frame's command buffer executes; a buffer that a
//! recorded draw still reads is therefore never rewritten in place. Orphaning
//! such a buffer swaps in a fresh `wgpu::Buffer` and the recorded pass keeps
//! the old one alive.

use std::collections::HashMap;
use std::num::NonZeroU32;

use crate::coords::{Color, DrawableSize};
use crate::render::{
    BufferId, BufferKind, DrawCall, DrawSurface, GpuBackend, PipelineDesc, ProgramId,
    RenderError, TextureDesc, TextureId,
};

use super::surface;
use super::Gpu;

/// Streamed buffer: storage is (re)allocated by `orphan_buffer`.
struct StreamBuffer {
    kind: BufferKind,
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    /// Referenced by a draw recorded in the current frame.
    in_use: bool,
}

struct SpriteTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Handle-indexed GPU objects created through the backend.
pub(crate) struct ResourceTable {
    next_id: NonZeroU32,
    programs: HashMap<ProgramId, wgpu::RenderPipeline>,
    buffers: HashMap<BufferId, StreamBuffer>,
    textures: HashMap<TextureId, SpriteTexture>,
}

impl Default for ResourceTable {
    fn default() -> Self {
        Self {
            next_id: NonZeroU32::MIN,
            programs: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
        }
    }
}

impl ResourceTable {
    fn alloc(&mut self) -> NonZeroU32 {
        let id = self.next_id;
        self.next_id = id.checked_add(1).unwrap_or(NonZeroU32::MIN);
        id
    }

    /// Storage written from the next frame on is no longer read by old draws.
    pub(crate) fn end_frame(&mut self) {
        for buffer in self.buffers.values_mut() {
            buffer.in_use = false;
        }
    }
}

fn buffer_usage(kind: BufferKind) -> wgpu::BufferUsages {
    let bind = match kind {
        BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
        BufferKind::Index => wgpu::BufferUsages::INDEX,
    };
    bind | wgpu::BufferUsages::COPY_DST
}

/// Rounds up to `COPY_BUFFER_ALIGNMENT`; zero-sized buffers become one word.
fn aligned_size(size: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    size.max(align).div_ceil(align) * align
}

fn compile_errors(info: &wgpu::CompilationInfo) -> Option<String> {
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();

    if errors.is_empty() { None } else { Some(errors.join("\n")) }
}

impl GpuBackend for Gpu<'_> {
    fn create_program(&mut self, desc: &PipelineDesc) -> Result<ProgramId, RenderError> {
        let shader = self.device().create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.wgsl.into()),
        });

        let info = pollster::block_on(shader.get_compilation_info());
        if let Some(message) = compile_errors(&info) {
            return Err(RenderError::ProgramCreation { label: desc.label, message });
        }

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = match desc.texture_binding {
            None => Vec::new(),
            Some(0) => vec![&self.texture_layout],
            Some(slot) => {
                return Err(RenderError::ProgramCreation {
                    label: desc.label,
                    message: format!("sampled texture must use binding 0, not {slot}"),
                });
            }
        };

        let layout = self.device().create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = self.device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[desc.vertex_layout.clone()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format(),
                    blend: Some(desc.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let id = ProgramId::new(self.resources.alloc());
        self.resources.programs.insert(id, pipeline);
        log::debug!("program '{}' linked as {}", desc.label, id.get());
        Ok(id)
    }

    fn destroy_program(&mut self, id: ProgramId) {
        self.resources.programs.remove(&id);
    }

    fn create_buffer(&mut self, kind: BufferKind, label: &'static str) -> Result<BufferId, RenderError> {
        let id = BufferId::new(self.resources.alloc());
        self.resources.buffers.insert(
            id,
            StreamBuffer {
                kind,
                label,
                buffer: None,
                in_use: false,
            },
        );
        Ok(id)
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        self.resources.buffers.remove(&id);
    }

    fn orphan_buffer(&mut self, id: BufferId, size: u64) {
        let size = aligned_size(size);
        let Some(entry) = self.resources.buffers.get_mut(&id) else { return };

        let reusable = !entry.in_use && entry.buffer.as_ref().is_some_and(|b| b.size() >= size);
        if reusable {
            return;
        }

        entry.buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(entry.label),
            size,
            usage: buffer_usage(entry.kind),
            mapped_at_creation: false,
        }));
        entry.in_use = false;
    }

    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) {
        let Some(buffer) = self.resources.buffers.get(&id).and_then(|e| e.buffer.as_ref()) else {
            log::warn!("write to unallocated buffer {}", id.get());
            return;
        };
        if offset + data.len() as u64 > buffer.size() {
            log::warn!(
                "write of {} bytes at {offset} overflows buffer {} ({} bytes)",
                data.len(),
                id.get(),
                buffer.size()
            );
            return;
        }
        self.queue.write_buffer(buffer, offset, data);
    }

    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<TextureId, RenderError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if desc.width == 0 || desc.height == 0 || desc.width > max || desc.height > max {
            return Err(RenderError::InvalidTextureSize { width: desc.width, height: desc.height });
        }

        let size = wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sunburst sprite texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: surface::sprite_texture_format(self.config.format),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(desc.width * 4),
                rows_per_image: Some(desc.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sunburst sprite bind group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let id = TextureId::new(self.resources.alloc());
        self.resources.textures.insert(
            id,
            SpriteTexture {
                _texture: texture,
                bind_group,
            },
        );
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.resources.textures.remove(&id);
    }

    fn begin_frame(&mut self, size: DrawableSize) {
        if let Some(stale) = self.frame.take() {
            log::warn!("previous frame was never presented; presenting it now");
            self.submit(stale);
        }

        self.viewport = size;
        self.frame = self.acquire_frame();
    }

    fn clear(&mut self, color: Color) {
        let Some(frame) = self.frame.as_mut() else { return };

        let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sunburst clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn draw(&mut self, call: &DrawCall) {
        let Some(frame) = self.frame.as_mut() else { return };
        let resources = &mut self.resources;

        let Some(pipeline) = resources.programs.get(&call.program) else { return };
        let bind_group = match call.texture {
            Some(id) => match resources.textures.get(&id) {
                Some(t) => Some(&t.bind_group),
                None => {
                    log::warn!("draw references destroyed texture {}", id.get());
                    return;
                }
            },
            None => None,
        };
        let (Some(vbo), Some(ibo)) = (
            resources.buffers.get(&call.vertex_buffer).and_then(|b| b.buffer.as_ref()),
            resources.buffers.get(&call.index_buffer).and_then(|b| b.buffer.as_ref()),
        ) else {
            return;
        };

        // The viewport must lie inside the surface texture.
        let width = (self.viewport.width.max(0) as u32).min(self.config.width);
        let height = (self.viewport.height.max(0) as u32).min(self.config.height);
        if width == 0 || height == 0 {
            return;
        }

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sunburst batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            pass.set_pipeline(pipeline);
            if let Some(bind_group) = bind_group {
                pass.set_bind_group(0, bind_group, &[]);
            }
            pass.set_vertex_buffer(0, vbo.slice(..));
            pass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..call.index_count, 0, 0..1);
        }

        for id in [call.vertex_buffer, call.index_buffer] {
            if let Some(entry) = resources.buffers.get_mut(&id) {
                entry.in_use = true;
            }
        }
    }
}

impl DrawSurface for Gpu<'_> {
    fn drawable_size(&self) -> DrawableSize {
        DrawableSize::from(self.size())
    }

    fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.submit(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sizes_are_copy_aligned() {
        assert_eq!(aligned_size(0), 4);
        assert_eq!(aligned_size(4), 4);
        assert_eq!(aligned_size(6), 8);
        assert_eq!(aligned_size(96), 96);
    }

    #[test]
    fn usage_matches_binding_kind() {
        assert!(buffer_usage(BufferKind::Index).contains(wgpu::BufferUsages::INDEX));
        assert!(buffer_usage(BufferKind::Vertex).contains(wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST));
    }

    #[test]
    fn ids_are_unique_and_non_zero() {
        let mut table = ResourceTable::default();
        let a = table.alloc();
        let b = table.alloc();
        assert_ne!(a, b);
        assert_eq!(a.get(), 1);
    }
}
