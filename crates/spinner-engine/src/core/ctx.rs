use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::frame_loop::FrameReport;

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires a frame, runs `draw`, submits and presents, all inside one
    /// validation error scope.
    ///
    /// Buffer writes `draw` makes through the queue belong to the same scope,
    /// so the report covers everything the frame did.
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> FrameReport
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let reason = err.to_string();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        FrameReport::Fatal(format!("surface error: {reason}"))
                    }
                    action => {
                        log::debug!(
                            "frame {} skipped: {reason} ({action:?})",
                            self.time.frame_index
                        );
                        FrameReport::Skipped
                    }
                };
            }
        };

        let gpu = &*self.gpu;
        let window = self.window;

        let ((), error) = gpu.capture_validation(|| {
            let rctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());

            // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
            {
                let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, clear);
                draw(&rctx, &mut target);
            }

            window.pre_present_notify();
            gpu.submit(frame);
        });

        match error {
            Some(e) => FrameReport::Invalid(e.to_string()),
            None => FrameReport::Presented,
        }
    }
}
