//! Handles passed to per-frame draw callbacks.
//!
//! Each scene owns its own GPU resources (pipeline, buffers, bind groups);
//! this module only exposes the device/queue and the frame's color target.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
