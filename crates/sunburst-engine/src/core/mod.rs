//! Contracts between the window runtime and client game loops.
//!
//! The runtime owns the window, the GPU and the renderer; applications see
//! them only through the per-frame [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
