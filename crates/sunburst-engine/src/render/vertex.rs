//! Vertex formats and quad index layout shared by both pipelines.

use bytemuck::{Pod, Zeroable};

/// Vertices per indexed quad.
pub const VERTICES_PER_QUAD: usize = 4;

/// Indices per quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Shader location of the NDC position in every pipeline.
pub const ATTR_POS: u32 = 0;

/// Shader location of the secondary attribute (color or uv).
pub const ATTR_SECONDARY: u32 = 1;

// ── blend ─────────────────────────────────────────────────────────────────

/// `src * a + dst * (1 - a)` on color, same on alpha.
pub(crate) fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── solid vertex ──────────────────────────────────────────────────────────

/// Vertex of the solid-rectangle pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SolidVertex {
    pub pos: [f32; 2],   // NDC
    pub color: [f32; 4], // straight alpha, unclamped
}

impl SolidVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        ATTR_POS => Float32x2,
        ATTR_SECONDARY => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SolidVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── textured vertex ───────────────────────────────────────────────────────

/// Vertex of the textured-sprite pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub pos: [f32; 2], // NDC
    pub uv: [f32; 2],  // 0..1
}

impl TexturedVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        ATTR_POS => Float32x2,
        ATTR_SECONDARY => Float32x2
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── indices ───────────────────────────────────────────────────────────────

/// Builds the index list for `quad_count` quads laid out as
/// (left-top, left-bottom, right-top, right-bottom).
pub fn build_quad_indices(quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quad_count * INDICES_PER_QUAD);
    for quad in 0..quad_count {
        let base = (quad * VERTICES_PER_QUAD) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_strides_match_attribute_sizes() {
        assert_eq!(SolidVertex::layout().array_stride, 24);
        assert_eq!(TexturedVertex::layout().array_stride, 16);
    }

    #[test]
    fn position_shares_location_zero() {
        assert_eq!(SolidVertex::layout().attributes[0].shader_location, ATTR_POS);
        assert_eq!(TexturedVertex::layout().attributes[0].shader_location, ATTR_POS);
        assert_eq!(TexturedVertex::layout().attributes[1].offset, 8);
    }

    #[test]
    fn quad_indices_offset_per_quad() {
        let idx = build_quad_indices(2);
        assert_eq!(idx, vec![0, 1, 2, 2, 1, 3, 4, 5, 6, 6, 5, 7]);
    }

    #[test]
    fn zero_quads_builds_no_indices() {
        assert!(build_quad_indices(0).is_empty());
    }
}
