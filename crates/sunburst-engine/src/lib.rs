//! Sunburst engine crate.
//!
//! A batched immediate-mode 2D renderer (`render`) plus the platform pieces
//! that host it: a wgpu device layer, a winit window runtime, logging and
//! frame timing.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
