//! CPU-side geometry batches.
//!
//! A batch is an append-only list of indexed quads (4 vertices each) for one
//! pipeline. Storage grows by doubling and is never released while the
//! renderer lives; `reset` only rewinds the count.

use std::fmt;

use crate::coords::DrawableSize;

use super::vertex::{SolidVertex, TexturedVertex, VERTICES_PER_QUAD};

/// Initial batch capacity when none is configured.
pub const DEFAULT_QUAD_CAPACITY: usize = 2048;

// ── pixel → NDC ───────────────────────────────────────────────────────────

/// Quad edges in normalized device coordinates (+Y up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NdcRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Converts a top-left-origin pixel rectangle to NDC edges.
///
/// Negative extents are normalized before the transform. Returns `None` for a
/// zero width or height, or when `size` is not drawable.
///
/// Edges are computed in `i64`, so any `i32` input is accepted; rectangles
/// far outside the surface simply land outside [-1, 1].
pub fn pixel_rect_to_ndc(x: i32, y: i32, w: i32, h: i32, size: DrawableSize) -> Option<NdcRect> {
    if w == 0 || h == 0 || !size.is_drawable() {
        return None;
    }
    let (mut x, mut y, mut w, mut h) = (i64::from(x), i64::from(y), i64::from(w), i64::from(h));
    if w < 0 {
        x += w;
        w = -w;
    }
    if h < 0 {
        y += h;
        h = -h;
    }

    let fb_w = size.width as f32;
    let fb_h = size.height as f32;

    Some(NdcRect {
        left: 2.0 * (x as f32 / fb_w) - 1.0,
        right: 2.0 * ((x + w) as f32 / fb_w) - 1.0,
        top: 1.0 - 2.0 * (y as f32 / fb_h),
        bottom: 1.0 - 2.0 * ((y + h) as f32 / fb_h),
    })
}

impl NdcRect {
    /// Corner order matches `vertex::build_quad_indices`: LT, LB, RT, RB.
    #[inline]
    pub fn corners(self) -> [[f32; 2]; 4] {
        [
            [self.left, self.top],
            [self.left, self.bottom],
            [self.right, self.top],
            [self.right, self.bottom],
        ]
    }

    pub fn solid_quad(self, color: [f32; 4]) -> [SolidVertex; 4] {
        self.corners().map(|pos| SolidVertex { pos, color })
    }

    /// Textured quad covering the full texture.
    ///
    /// Without `flip_y`, v = 0 sits on the bottom edge (lower-left UV origin);
    /// with `flip_y`, v = 0 sits on the top edge so top-down image rows appear
    /// upright.
    pub fn textured_quad(self, flip_y: bool) -> [TexturedVertex; 4] {
        let (v_top, v_bottom) = if flip_y { (0.0, 1.0) } else { (1.0, 0.0) };
        let uvs = [[0.0, v_top], [0.0, v_bottom], [1.0, v_top], [1.0, v_bottom]];
        let corners = self.corners();
        [0, 1, 2, 3].map(|i| TexturedVertex { pos: corners[i], uv: uvs[i] })
    }
}

// ── capacity ──────────────────────────────────────────────────────────────

/// The batch could not grow to hold the requested quads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CapacityError {
    pub capacity: usize,
    pub required: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not grow quad batch from {} to {} quads",
            self.capacity, self.required
        )
    }
}

impl std::error::Error for CapacityError {}

// ── batch ─────────────────────────────────────────────────────────────────

/// Growable array of indexed quads for one pipeline.
#[derive(Debug, Clone)]
pub struct QuadBatch<V> {
    vertices: Vec<V>,
    capacity_quads: usize,
}

impl<V: Copy> QuadBatch<V> {
    /// Creates a batch able to hold `capacity_quads` quads (`0` selects
    /// [`DEFAULT_QUAD_CAPACITY`]).
    pub fn with_capacity(capacity_quads: usize) -> Self {
        let capacity_quads = if capacity_quads == 0 { DEFAULT_QUAD_CAPACITY } else { capacity_quads };
        Self {
            vertices: Vec::with_capacity(capacity_quads * VERTICES_PER_QUAD),
            capacity_quads,
        }
    }

    /// Quads currently queued.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Quads the batch can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity_quads
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Grows storage so at least `required` quads fit, doubling the current
    /// capacity until it does. Queued vertices are preserved.
    ///
    /// Returns `Ok(true)` if the capacity changed.
    pub fn reserve_quads(&mut self, required: usize) -> Result<bool, CapacityError> {
        if required <= self.capacity_quads {
            return Ok(false);
        }

        let err = CapacityError { capacity: self.capacity_quads, required };

        let mut new_cap = self.capacity_quads.max(1);
        while new_cap < required {
            new_cap = new_cap.checked_shl(1).filter(|&c| c > new_cap).ok_or(err)?;
        }

        let new_len = new_cap.checked_mul(VERTICES_PER_QUAD).ok_or(err)?;
        self.vertices
            .try_reserve_exact(new_len - self.vertices.len())
            .map_err(|_| err)?;

        self.capacity_quads = new_cap;
        Ok(true)
    }

    /// Appends one quad, growing if needed.
    ///
    /// On failure nothing is queued.
    pub fn push_quad(&mut self, quad: [V; 4]) -> Result<(), CapacityError> {
        self.reserve_quads(self.len() + 1)?;
        self.vertices.extend_from_slice(&quad);
        Ok(())
    }

    /// Rewinds to empty; capacity is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.vertices.clear();
    }
}

impl<V: Copy> Default for QuadBatch<V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUAD_CAPACITY)
    }
}

impl<V: bytemuck::Pod> QuadBatch<V> {
    /// Queued vertices as raw bytes for upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
