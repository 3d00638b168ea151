//! Reload-on-change over server-sent events.
//!
//! Meant for a static file server that pushes a `files-changed` event on its
//! `events` stream whenever something in the served directory changes. On
//! that event the stream is closed and the host reloads; stream errors are
//! logged and otherwise ignored.
//!
//! ```rust,ignore
//! let handle = spinner_reload::watch("http://localhost:8000/", move || {
//!     proxy.send_event(DemoEvent::Reload).ok();
//! })?;
//! ```

pub mod client;
pub mod sse;
pub mod watcher;

pub use client::{EVENTS_PATH, ReloadHandle, StreamHandle, events_url, watch};
pub use sse::{SseEvent, SseParser};
pub use watcher::{EventStream, FILES_CHANGED, Flow, Reload, ReloadWatcher, StreamEvent};
