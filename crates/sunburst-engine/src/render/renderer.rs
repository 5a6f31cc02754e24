use crate::coords::{Color, DrawableSize};

use super::backend::{DrawSurface, GpuBackend, RenderError, TextureId};
use super::batch::{pixel_rect_to_ndc, QuadBatch, DEFAULT_QUAD_CAPACITY};
use super::pipeline::{PipelineKind, PipelineRegistry};
use super::texture::{DecodedImage, Texture};
use super::vertex::{SolidVertex, TexturedVertex};

/// Renderer construction parameters.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Quads each batch holds before its first growth.
    pub initial_quad_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            initial_quad_capacity: DEFAULT_QUAD_CAPACITY,
        }
    }
}

/// Frame lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    /// No frame open; draws are ignored.
    Idle,
    /// Between `begin_2d` and `end_2d`.
    Open,
    /// Inside a flush.
    Flushing,
}

/// Counters for the current (or last) frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub rects: u32,
    pub sprites: u32,
    pub draw_calls: u32,
    /// Textured batches flushed early because the sprite texture changed.
    pub texture_switches: u32,
    /// Draws lost to batch allocation failure or a disabled pipeline.
    pub dropped: u32,
}

/// Batched immediate-mode 2D renderer.
///
/// Queues solid rectangles and textured sprites as indexed quads in two CPU
/// batches and submits each batch with one draw call.
///
/// Ordering within one flush is: all queued rectangles, then all queued
/// sprites. A sprite whose texture differs from the pending sprite batch
/// flushes that batch first; rectangles are never flushed by a texture change.
/// Call [`flush_2d`](Self::flush_2d) between a rectangle and a sprite that must
/// stack in submission order.
pub struct Renderer<B: GpuBackend> {
    backend: B,
    pipelines: PipelineRegistry,

    solid: QuadBatch<SolidVertex>,
    textured: QuadBatch<TexturedVertex>,
    /// Texture of the quads queued in `textured`.
    batch_texture: Option<TextureId>,

    drawable: DrawableSize,
    state: FrameState,
    stats: FrameStats,

    warned_misuse: bool,
    shut_down: bool,
}

impl<B: GpuBackend> Renderer<B> {
    /// Builds both pipelines on `backend`. The GPU context must be current.
    ///
    /// Pipelines that fail to build are logged and left disabled.
    pub fn new(mut backend: B, config: RendererConfig) -> Self {
        let capacity = if config.initial_quad_capacity == 0 {
            DEFAULT_QUAD_CAPACITY
        } else {
            config.initial_quad_capacity
        };

        let pipelines = PipelineRegistry::create(&mut backend, capacity);
        log::info!("2D renderer initialized ({capacity} quads per batch)");

        Self {
            backend,
            pipelines,
            solid: QuadBatch::with_capacity(capacity),
            textured: QuadBatch::with_capacity(capacity),
            batch_texture: None,
            drawable: DrawableSize::unset(),
            state: FrameState::Idle,
            stats: FrameStats::default(),
            warned_misuse: false,
            shut_down: false,
        }
    }

    /// Releases pipelines and buffers. Also runs on drop; later calls do nothing.
    ///
    /// Queued, unflushed draws are discarded.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        if self.state != FrameState::Idle {
            log::warn!("renderer shut down with an open frame; pending draws discarded");
        }

        self.reset_batches();
        self.state = FrameState::Idle;
        self.pipelines.destroy(&mut self.backend);
        self.shut_down = true;
        log::debug!("2D renderer shut down");
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Opens a frame with an explicit drawable size.
    ///
    /// A zero or negative size opens the frame but drops every draw in it.
    pub fn begin_2d_with_size(&mut self, width: i32, height: i32) {
        if self.shut_down {
            self.warn_misuse("begin_2d after shutdown");
            return;
        }
        if self.state == FrameState::Open {
            log::warn!("begin_2d called with a frame already open; flushing it");
            self.flush_2d();
        }

        self.drawable = DrawableSize::new(width, height);
        self.reset_batches();
        self.stats = FrameStats::default();
        self.state = FrameState::Open;

        if self.drawable.is_drawable() {
            self.backend.begin_frame(self.drawable);
        } else {
            log::trace!("drawable size {width}x{height}; frame draws nothing");
        }
    }

    /// Queues a solid rectangle. `w`/`h` may be negative (flipped).
    pub fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if !self.require_open("draw_rectangle") {
            return;
        }
        if !self.pipelines.get(PipelineKind::Solid).is_functional() {
            self.stats.dropped += 1;
            return;
        }
        let Some(ndc) = pixel_rect_to_ndc(x, y, w, h, self.drawable) else { return };

        match self.solid.push_quad(ndc.solid_quad(color.to_array())) {
            Ok(()) => self.stats.rects += 1,
            Err(e) => {
                log::warn!("dropping rectangle: {e}");
                self.stats.dropped += 1;
            }
        }
    }

    /// Queues `texture` stretched over the rectangle.
    ///
    /// A non-positive `w` or `h` draws the texture at its native size. A zeroed
    /// texture draws nothing.
    pub fn draw_texture(&mut self, texture: &Texture, x: i32, y: i32, w: i32, h: i32, flip_y: bool) {
        if !self.require_open("draw_texture") {
            return;
        }
        let Some(id) = texture.id() else { return };
        if !self.pipelines.get(PipelineKind::Textured).is_functional() {
            self.stats.dropped += 1;
            return;
        }

        let (w, h) = if w <= 0 || h <= 0 { (texture.width(), texture.height()) } else { (w, h) };
        let Some(ndc) = pixel_rect_to_ndc(x, y, w, h, self.drawable) else { return };

        if self.batch_texture != Some(id) && !self.textured.is_empty() {
            self.flush_textured();
            self.stats.texture_switches += 1;
        }
        self.batch_texture = Some(id);

        match self.textured.push_quad(ndc.textured_quad(flip_y)) {
            Ok(()) => self.stats.sprites += 1,
            Err(e) => {
                log::warn!("dropping sprite: {e}");
                self.stats.dropped += 1;
            }
        }
    }

    /// Flushes pending work and clears the whole render target to `color`.
    pub fn clear_background(&mut self, color: Color) {
        if !self.require_open("clear_background") {
            return;
        }
        self.flush_2d();
        if self.drawable.is_drawable() {
            self.backend.clear(color);
        }
    }

    /// Uploads and draws every non-empty batch: rectangles first, then sprites.
    pub fn flush_2d(&mut self) {
        let resume = match self.state {
            FrameState::Idle => {
                self.warn_misuse("flush_2d");
                return;
            }
            state => state,
        };

        self.state = FrameState::Flushing;
        self.flush_solid();
        self.flush_textured();
        self.state = resume;
    }

    fn flush_solid(&mut self) {
        if self.solid.is_empty() {
            return;
        }
        let pipeline = self.pipelines.get_mut(PipelineKind::Solid);
        if pipeline.submit(
            &mut self.backend,
            self.solid.as_bytes(),
            self.solid.len(),
            self.solid.capacity(),
            None,
        ) {
            self.stats.draw_calls += 1;
        }
        self.solid.reset();
    }

    fn flush_textured(&mut self) {
        if self.textured.is_empty() {
            return;
        }
        let pipeline = self.pipelines.get_mut(PipelineKind::Textured);
        if pipeline.submit(
            &mut self.backend,
            self.textured.as_bytes(),
            self.textured.len(),
            self.textured.capacity(),
            self.batch_texture,
        ) {
            self.stats.draw_calls += 1;
        }
        self.textured.reset();
        self.batch_texture = None;
    }

    fn reset_batches(&mut self) {
        self.solid.reset();
        self.textured.reset();
        self.batch_texture = None;
    }

    fn require_open(&mut self, op: &str) -> bool {
        if self.state == FrameState::Open {
            return true;
        }
        self.warn_misuse(op);
        false
    }

    fn warn_misuse(&mut self, op: &str) {
        if !self.warned_misuse {
            log::warn!("{op} called outside an open 2D frame; ignored");
            self.warned_misuse = true;
        }
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Uploads decoded RGBA8 pixels.
    pub fn create_texture(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Texture, RenderError> {
        Texture::create(&mut self.backend, pixels, width, height)
    }

    /// Uploads the output of an image decoder.
    ///
    /// A failed decode (`None`) or upload yields a zeroed texture, which draws
    /// nothing.
    pub fn load_texture(&mut self, image: Option<DecodedImage<'_>>) -> Texture {
        let Some(image) = image else {
            log::warn!("image decode failed; using an empty texture");
            return Texture::default();
        };
        match self.create_texture(image.pixels, image.width, image.height) {
            Ok(texture) => texture,
            Err(e) => {
                log::error!("{e}");
                Texture::default()
            }
        }
    }

    /// Releases `texture` and zeroes it. Safe on a zeroed texture.
    pub fn destroy_texture(&mut self, texture: &mut Texture) {
        texture.destroy(&mut self.backend);
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Drawable size cached by the last `begin_2d`.
    #[inline]
    pub fn drawable_size(&self) -> DrawableSize {
        self.drawable
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    #[inline]
    pub fn solid_batch(&self) -> &QuadBatch<SolidVertex> {
        &self.solid
    }

    #[inline]
    pub fn textured_batch(&self) -> &QuadBatch<TexturedVertex> {
        &self.textured
    }

    #[inline]
    pub fn pipelines(&self) -> &PipelineRegistry {
        &self.pipelines
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: GpuBackend + DrawSurface> Renderer<B> {
    /// Opens a frame sized to the surface's current drawable size.
    pub fn begin_2d(&mut self) {
        let size = self.backend.drawable_size();
        self.begin_2d_with_size(size.width, size.height);
    }

    /// Flushes, presents, and closes the frame.
    pub fn end_2d(&mut self) {
        if self.state == FrameState::Idle {
            self.warn_misuse("end_2d");
            return;
        }

        self.flush_2d();
        self.backend.present();
        self.state = FrameState::Idle;

        log::trace!("frame done: {:?}", self.stats);
    }
}

impl<B: GpuBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{GpuCall, RecordingBackend};
    use crate::render::vertex::INDICES_PER_QUAD;

    const RED: Color = Color::RED;

    fn renderer(width: i32, height: i32) -> Renderer<RecordingBackend> {
        Renderer::new(RecordingBackend::with_size(width, height), RendererConfig::default())
    }

    fn texture(r: &mut Renderer<RecordingBackend>, w: u32, h: u32) -> Texture {
        r.create_texture(&vec![255u8; (w * h * 4) as usize], w, h).unwrap()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn begin_reads_surface_size_and_opens_frame() {
        let mut r = renderer(1024, 768);
        assert_eq!(r.state(), FrameState::Idle);

        r.begin_2d();
        assert_eq!(r.state(), FrameState::Open);
        assert_eq!(r.drawable_size(), DrawableSize::new(1024, 768));
        assert!(r.backend().calls().contains(&GpuCall::BeginFrame(DrawableSize::new(1024, 768))));
    }

    #[test]
    fn explicit_size_overrides_surface() {
        let mut r = renderer(1024, 768);
        r.begin_2d_with_size(320, 200);
        assert_eq!(r.drawable_size(), DrawableSize::new(320, 200));
    }

    #[test]
    fn end_flushes_presents_and_goes_idle() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.draw_rectangle(10, 10, 20, 20, RED);
        r.end_2d();

        assert_eq!(r.state(), FrameState::Idle);
        assert_eq!(r.backend().presents, 1);
        assert_eq!(r.backend().draws().len(), 1);
        assert!(r.solid_batch().is_empty());
    }

    #[test]
    fn begin_resets_batches_from_previous_frame() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.draw_rectangle(0, 0, 5, 5, RED);
        r.begin_2d();

        assert_eq!(r.state(), FrameState::Open);
        assert!(r.solid_batch().is_empty());
        // The frame left open was flushed, not silently discarded.
        assert_eq!(r.backend().draws().len(), 1);
    }

    #[test]
    fn shutdown_is_idempotent_and_runs_on_drop() {
        let mut r = renderer(800, 600);
        r.shutdown();
        let destroys = |r: &Renderer<RecordingBackend>| {
            r.backend()
                .count(|c| matches!(c, GpuCall::DestroyProgram(_) | GpuCall::DestroyBuffer(_)))
        };
        assert_eq!(destroys(&r), 6);

        r.shutdown();
        assert_eq!(destroys(&r), 6);
        assert!(!r.pipelines().get(PipelineKind::Solid).is_functional());

        r.begin_2d();
        assert_eq!(r.state(), FrameState::Idle);
    }

    // ── flush ─────────────────────────────────────────────────────────────

    #[test]
    fn flushing_empty_batches_issues_no_gpu_calls() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.backend_mut().clear_log();

        r.flush_2d();
        r.flush_2d();
        assert!(r.backend().calls().is_empty());
        assert_eq!(r.stats().draw_calls, 0);
    }

    #[test]
    fn full_screen_rect_is_one_draw_over_full_ndc() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.backend_mut().clear_log();

        r.draw_rectangle(0, 0, 800, 600, RED);
        r.flush_2d();

        let draws = r.backend().draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].index_count, INDICES_PER_QUAD as u32);
        assert_eq!(draws[0].texture, None);
        assert_eq!(Some(draws[0].program), r.pipelines().get(PipelineKind::Solid).program());

        let verts: Vec<SolidVertex> = r.backend().drawn_vertices(0);
        let positions: Vec<[f32; 2]> = verts.iter().map(|v| v.pos).collect();
        assert_eq!(positions, vec![[-1.0, 1.0], [-1.0, -1.0], [1.0, 1.0], [1.0, -1.0]]);
        assert!(verts.iter().all(|v| v.color == RED.to_array()));
    }

    #[test]
    fn flush_orphans_before_writing_vertices() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.draw_rectangle(0, 0, 8, 8, RED);
        r.backend_mut().clear_log();
        r.flush_2d();

        let calls = r.backend().calls();
        assert!(matches!(calls[0], GpuCall::OrphanBuffer { size: 96, .. }));
        assert!(matches!(calls[1], GpuCall::WriteBuffer { offset: 0, len: 96, .. }));
        assert!(matches!(calls[2], GpuCall::Draw(_)));
    }

    #[test]
    fn colors_reach_the_gpu_unclamped() {
        let mut r = renderer(100, 100);
        r.begin_2d();
        r.draw_rectangle(0, 0, 10, 10, Color::new(2.0, -0.5, 1.0, 1.5));
        r.flush_2d();

        let verts: Vec<SolidVertex> = r.backend().drawn_vertices(0);
        assert_eq!(verts[0].color, [2.0, -0.5, 1.0, 1.5]);
    }

    #[test]
    fn rectangles_flush_before_sprites() {
        let mut r = renderer(800, 600);
        let tex = texture(&mut r, 4, 4);
        r.begin_2d();
        r.backend_mut().clear_log();

        r.draw_texture(&tex, 0, 0, 10, 10, false);
        r.draw_rectangle(0, 0, 10, 10, RED);
        r.flush_2d();

        let draws = r.backend().draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].texture, None);
        assert_eq!(draws[1].texture, tex.id());
    }

    // ── pipeline switch ───────────────────────────────────────────────────

    #[test]
    fn alternating_textures_are_not_coalesced() {
        let mut r = renderer(800, 600);
        let a = texture(&mut r, 8, 8);
        let b = texture(&mut r, 8, 8);
        r.begin_2d();
        r.backend_mut().clear_log();

        r.draw_texture(&a, 0, 0, 8, 8, false);
        r.draw_texture(&b, 10, 0, 8, 8, false);
        r.draw_texture(&a, 20, 0, 8, 8, false);
        r.flush_2d();

        let textures: Vec<_> = r.backend().draws().iter().map(|d| d.texture).collect();
        assert_eq!(textures, vec![a.id(), b.id(), a.id()]);
        assert_eq!(r.stats().texture_switches, 2);
        assert_eq!(r.stats().draw_calls, 3);
    }

    #[test]
    fn same_texture_batches_into_one_draw() {
        let mut r = renderer(800, 600);
        let a = texture(&mut r, 8, 8);
        r.begin_2d();
        r.backend_mut().clear_log();

        for i in 0..100 {
            r.draw_texture(&a, i, i, 8, 8, true);
        }
        r.flush_2d();

        let draws = r.backend().draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].index_count, 600);
    }

    #[test]
    fn texture_switch_leaves_rectangles_pending() {
        let mut r = renderer(800, 600);
        let a = texture(&mut r, 8, 8);
        let b = texture(&mut r, 8, 8);
        r.begin_2d();
        r.backend_mut().clear_log();

        r.draw_rectangle(0, 0, 10, 10, RED);
        r.draw_texture(&a, 0, 0, 8, 8, false);
        r.draw_texture(&b, 0, 0, 8, 8, false);

        let draws = r.backend().draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].texture, a.id());
        assert_eq!(r.solid_batch().len(), 1);
        assert_eq!(r.textured_batch().len(), 1);
    }

    // ── degenerate input ──────────────────────────────────────────────────

    #[test]
    fn zero_width_rectangle_is_dropped() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.draw_rectangle(5, 5, 0, 40, RED);
        r.draw_rectangle(5, 5, 40, 0, RED);
        assert_eq!(r.solid_batch().len(), 0);
        assert_eq!(r.stats().dropped, 0);
    }

    #[test]
    fn zeroed_texture_is_dropped() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.draw_texture(&Texture::default(), 0, 0, 32, 32, false);
        assert_eq!(r.textured_batch().len(), 0);
    }

    #[test]
    fn unset_drawable_size_drops_everything() {
        let mut r = renderer(0, 0);
        let tex = texture(&mut r, 2, 2);
        r.begin_2d();
        r.draw_rectangle(0, 0, 10, 10, RED);
        r.draw_texture(&tex, 0, 0, 10, 10, false);
        r.end_2d();

        assert!(r.backend().draws().is_empty());
        assert_eq!(r.backend().count(|c| matches!(c, GpuCall::BeginFrame(_))), 0);
    }

    #[test]
    fn non_positive_sprite_size_uses_native_size() {
        let mut r = renderer(64, 64);
        let tex = texture(&mut r, 32, 16);
        r.begin_2d();
        r.draw_texture(&tex, 0, 0, 0, -5, true);
        r.flush_2d();

        let verts: Vec<TexturedVertex> = r.backend().drawn_vertices(0);
        assert_eq!(verts[3].pos, [0.0, 0.5]);
        assert_eq!(verts[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn extreme_integer_rectangles_are_queued_without_panicking() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.draw_rectangle(i32::MAX - 5, 0, 10, 10, RED);
        r.draw_rectangle(0, 0, i32::MIN, 10, RED);
        r.draw_rectangle(i32::MIN, i32::MIN, i32::MIN, i32::MIN, RED);
        assert_eq!(r.solid_batch().len(), 3);
        r.end_2d();

        assert_eq!(r.backend().draws().len(), 1);
        assert_eq!(r.stats().dropped, 0);
    }

    #[test]
    fn flipped_rectangle_is_normalized() {
        let mut r = renderer(100, 100);
        r.begin_2d();
        r.draw_rectangle(100, 100, -100, -100, RED);
        r.flush_2d();

        let verts: Vec<SolidVertex> = r.backend().drawn_vertices(0);
        assert_eq!(verts[0].pos, [-1.0, 1.0]);
        assert_eq!(verts[3].pos, [1.0, -1.0]);
    }

    // ── misuse ────────────────────────────────────────────────────────────

    #[test]
    fn draws_outside_a_frame_are_ignored() {
        let mut r = renderer(800, 600);
        let tex = texture(&mut r, 2, 2);
        r.backend_mut().clear_log();

        r.draw_rectangle(0, 0, 10, 10, RED);
        r.draw_texture(&tex, 0, 0, 10, 10, false);
        r.clear_background(RED);
        r.flush_2d();
        r.end_2d();

        assert!(r.solid_batch().is_empty());
        assert!(r.textured_batch().is_empty());
        assert!(r.backend().calls().is_empty());
        assert_eq!(r.backend().presents, 0);
        assert_eq!(r.state(), FrameState::Idle);
    }

    #[test]
    fn draws_after_end_are_ignored() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.end_2d();
        r.draw_rectangle(0, 0, 10, 10, RED);
        assert!(r.solid_batch().is_empty());
    }

    // ── growth ────────────────────────────────────────────────────────────

    #[test]
    fn batch_grows_past_initial_capacity_without_drops() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        for i in 0..2049 {
            r.draw_rectangle(i % 800, i % 600, 1, 1, RED);
        }
        assert!(r.solid_batch().capacity() >= 4096);
        assert_eq!(r.solid_batch().len(), 2049);
        assert_eq!(r.stats().dropped, 0);

        r.backend_mut().clear_log();
        r.flush_2d();

        let draws = r.backend().draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].index_count, 2049 * 6);
        // Index data regrown to the new batch capacity before the draw.
        assert!(r.backend().calls().contains(&GpuCall::WriteBuffer {
            id: draws[0].index_buffer,
            offset: 0,
            len: 4096 * 6 * 4,
        }));
        assert_eq!(r.pipelines().get(PipelineKind::Solid).index_capacity(), 4096);
    }

    #[test]
    fn capacity_survives_frames() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        for _ in 0..3000 {
            r.draw_rectangle(0, 0, 1, 1, RED);
        }
        r.end_2d();
        r.begin_2d();
        assert_eq!(r.solid_batch().capacity(), 4096);
        assert!(r.solid_batch().is_empty());
    }

    // ── failure semantics ─────────────────────────────────────────────────

    #[test]
    fn failed_pipeline_turns_its_draws_into_no_ops() {
        let mut backend = RecordingBackend::with_size(800, 600);
        backend.fail_program(PipelineKind::Solid);
        let mut r = Renderer::new(backend, RendererConfig::default());
        let tex = texture(&mut r, 4, 4);

        r.begin_2d();
        r.draw_rectangle(0, 0, 10, 10, RED);
        r.draw_texture(&tex, 0, 0, 10, 10, false);
        assert_eq!(r.solid_batch().len(), 0);
        assert_eq!(r.textured_batch().len(), 1);
        r.end_2d();

        let draws = r.backend().draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].texture, tex.id());
        assert_eq!(r.stats().dropped, 1);
    }

    #[test]
    fn load_texture_without_image_is_zeroed() {
        let mut r = renderer(800, 600);
        let tex = r.load_texture(None);
        assert_eq!(tex, Texture::default());

        let bad = r.load_texture(Some(DecodedImage { pixels: &[1, 2, 3], width: 1, height: 1 }));
        assert!(!bad.is_valid());

        let good = r.load_texture(Some(DecodedImage { pixels: &[0; 16], width: 2, height: 2 }));
        assert_eq!((good.width(), good.height()), (2, 2));
    }

    #[test]
    fn clear_flushes_pending_work_first() {
        let mut r = renderer(800, 600);
        r.begin_2d();
        r.draw_rectangle(0, 0, 10, 10, RED);
        r.backend_mut().clear_log();
        r.clear_background(Color::BLACK);

        let calls = r.backend().calls();
        assert!(matches!(calls.last(), Some(GpuCall::Clear(c)) if *c == Color::BLACK));
        assert_eq!(r.backend().draws().len(), 1);
    }
}
