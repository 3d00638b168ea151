//! Spinner engine crate.
//!
//! Owns the platform + GPU runtime pieces the demo scenes run on: one window,
//! one device, and a redraw-driven frame loop.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
