//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per redraw yields the timestamp
//! the animation is computed from.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
