use winit::window::{Window, WindowId};

use crate::coords::{Color, DrawableSize};
use crate::device::Gpu;
use crate::render::Renderer;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Window handle and metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Window size in physical pixels.
    pub fn drawable_size(&self) -> DrawableSize {
        DrawableSize::from(self.window.inner_size())
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub renderer: &'a mut Renderer<Gpu<'w>>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// The wgpu context behind the renderer (vsync, resize, device access).
    pub fn gpu(&mut self) -> &mut Gpu<'w> {
        self.renderer.backend_mut()
    }

    /// Runs one complete 2D frame: begin, optional clear, `draw`, end.
    pub fn draw_2d<F>(&mut self, clear: Option<Color>, draw: F)
    where
        F: FnOnce(&mut Renderer<Gpu<'w>>),
    {
        self.renderer.begin_2d();
        if let Some(color) = clear {
            self.renderer.clear_background(color);
        }
        draw(&mut *self.renderer);
        self.renderer.end_2d();
    }
}
