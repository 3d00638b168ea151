//! Core engine-facing contracts.
//!
//! The interface between the runtime (platform loop) and the demo: the `App`
//! callbacks, the per-frame context, and the frame-loop state machine that
//! decides whether another frame gets scheduled.

mod app;
mod ctx;
mod frame_loop;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use frame_loop::{FrameLoop, FrameReport, FrameState};
