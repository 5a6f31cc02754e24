//! Coordinate and geometry types shared by the renderer and client code.
//!
//! Canonical CPU space:
//! - Physical pixels of the drawable surface
//! - Origin top-left
//! - +X right, +Y down
//!
//! The renderer converts to NDC on the CPU when quads are queued.

mod color;
mod rect;
mod size;
mod vec2;

pub use color::Color;
pub use rect::Rect;
pub use size::DrawableSize;
pub use vec2::Vec2;
