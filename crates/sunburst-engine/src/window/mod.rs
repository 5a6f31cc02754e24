//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and wires them to the GPU layer and
//! the 2D renderer.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
