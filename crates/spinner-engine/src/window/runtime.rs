use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::{FrameClock, FrameTime};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "spinner".to_string(),
            initial_size: LogicalSize::new(512.0, 512.0),
        }
    }
}

/// Owns the winit event loop for a single window.
///
/// Frames are driven by redraw requests: the runtime asks for the next
/// redraw only after `App::on_frame` returned `Continue`, so a frame is never
/// recorded while the previous one is still being resolved.
pub struct Runtime<T: 'static> {
    event_loop: EventLoop<T>,
}

impl<T: 'static> Runtime<T> {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::<T>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        Ok(Self { event_loop })
    }

    /// Handle for posting `App::UserEvent`s from other threads.
    pub fn proxy(&self) -> EventLoopProxy<T> {
        self.event_loop.create_proxy()
    }

    /// Runs until the window closes or the app exits.
    ///
    /// Fatal setup errors (no adapter, no device, `App::on_start` failure)
    /// end the loop and are returned here.
    pub fn run<A>(self, config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App<UserEvent = T>,
    {
        let mut state = AppState::new(config, gpu_init, app);

        self.event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,

    /// Whether redraws are being requested.
    animating: bool,
    failure: Option<anyhow::Error>,
}

impl<A: App> AppState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            animating: false,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.animating = false;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
    }

    fn request_redraw(&self) {
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn apply_control(&mut self, event_loop: &ActiveEventLoop, control: AppControl) {
        match control {
            AppControl::Continue => {
                self.animating = true;
                self.request_redraw();
            }
            AppControl::Halt => {
                if self.animating {
                    log::info!("animation halted");
                }
                self.animating = false;
            }
            AppControl::Exit => {
                self.animating = false;
                event_loop.exit();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.animating {
            return;
        }

        let app = &mut self.app;
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let result = entry.with_mut(|fields| {
            let time: FrameTime = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                time,
            };
            app.on_frame(&mut ctx)
        });

        match result {
            Ok(control) => self.apply_control(event_loop, control),
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl<A: App> ApplicationHandler<A::UserEvent> for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        let entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => {
                self.fail(event_loop, e.context("GPU initialization failed"));
                return;
            }
        };

        let app = &mut self.app;
        let started = entry.with_gpu(|gpu| app.on_start(gpu));
        self.entry = Some(entry);

        match started {
            Ok(()) => self.apply_control(event_loop, AppControl::Continue),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: A::UserEvent) {
        let app = &mut self.app;
        let Some(entry) = self.entry.as_mut() else {
            log::debug!("user event before the window exists; dropped");
            return;
        };

        match entry.with_gpu(|gpu| app.on_user_event(event, gpu)) {
            Ok(AppControl::Continue) => {
                entry.with_clock_mut(|clock| clock.reset());
                self.apply_control(event_loop, AppControl::Continue);
            }
            Ok(control) => self.apply_control(event_loop, control),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.app.on_window_event(&event) == AppControl::Exit {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.animating = false;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
                if self.animating {
                    self.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.on_exit();
        // Drop the surface before the window it borrows.
        self.entry = None;
    }
}
