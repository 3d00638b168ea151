//! GPU device + surface management.
//!
//! This module is responsible for:
//! - acquiring the adapter, device and queue (fatal on failure)
//! - creating & configuring the window surface
//! - handing out per-frame encoders and capturing validation errors

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::{Gpu, capture_validation};
pub use init::GpuInit;
