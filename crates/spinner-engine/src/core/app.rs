use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    /// Keep going; from a frame callback this requests the next frame.
    Continue,
    /// Stop requesting frames but keep the window open.
    Halt,
    /// Close the window and leave the event loop.
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Payload of events posted through the runtime's `EventLoopProxy`.
    type UserEvent: 'static;

    /// Called once the device and surface exist, before the first frame.
    ///
    /// An error here is fatal: the runtime stops and returns it.
    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()>;

    /// Called for events sent through the proxy.
    ///
    /// Returning `Continue` (re)starts the animation from timestamp zero.
    fn on_user_event(&mut self, event: Self::UserEvent, gpu: &Gpu<'_>) -> Result<AppControl> {
        let _ = (event, gpu);
        Ok(AppControl::Continue)
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per display refresh while the animation is running.
    ///
    /// An error ends the run; the runtime returns it from `Runtime::run`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;

    /// Called once when the event loop is shutting down.
    fn on_exit(&mut self) {}
}
