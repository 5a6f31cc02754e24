//! Frame timing.
//!
//! - one `FrameClock` per window; `tick()` once per presented frame
//! - `FrameRateCounter` reports the average frame rate about once per second

mod frame_clock;
mod frame_rate;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_rate::FrameRateCounter;
