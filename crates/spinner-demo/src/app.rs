use anyhow::Result;

use spinner_engine::core::{App, AppControl, FrameCtx, FrameLoop};
use spinner_engine::device::Gpu;
use spinner_engine::window::EventLoopProxy;
use spinner_reload::ReloadHandle;

use crate::scene::{CLEAR_COLOR, Scene};
use crate::shader::SceneSource;

/// Events posted to the event loop from outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoEvent {
    /// The file server reported changed files.
    Reload,
}

/// Ties the scene, the frame loop and the optional reload watcher to the
/// runtime callbacks.
pub struct DemoApp {
    source: SceneSource,
    scene: Option<Scene>,
    frames: FrameLoop,

    reload_base: Option<String>,
    reload: Option<ReloadHandle>,
    proxy: EventLoopProxy<DemoEvent>,
}

impl DemoApp {
    pub fn new(
        source: SceneSource,
        reload_base: Option<String>,
        proxy: EventLoopProxy<DemoEvent>,
    ) -> Self {
        Self {
            source,
            scene: None,
            frames: FrameLoop::new(),
            reload_base,
            reload: None,
            proxy,
        }
    }

    /// Fetches the shader and builds every GPU resource of the scene.
    fn build_scene(&self, gpu: &Gpu<'_>) -> Result<Scene> {
        self.source
            .load(|variant, code| Scene::new(gpu.device(), gpu.surface_format(), variant, code))
    }

    /// Opens a fresh event stream, replacing (and closing) any previous one.
    fn watch_for_changes(&mut self) -> Result<()> {
        let Some(base) = self.reload_base.as_deref() else {
            return Ok(());
        };

        let proxy = self.proxy.clone();
        self.reload = Some(spinner_reload::watch(base, move || {
            if proxy.send_event(DemoEvent::Reload).is_err() {
                log::debug!("reload requested after the event loop closed");
            }
        })?);
        Ok(())
    }
}

impl App for DemoApp {
    type UserEvent = DemoEvent;

    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let scene = self.build_scene(gpu)?;
        settle_reload(&mut self.scene, &mut self.frames, Ok(scene));
        self.watch_for_changes()
    }

    fn on_user_event(&mut self, event: DemoEvent, gpu: &Gpu<'_>) -> Result<AppControl> {
        match event {
            DemoEvent::Reload => {
                log::info!("reloading {}", self.source.location);
                let built = self.build_scene(gpu);
                let control = settle_reload(&mut self.scene, &mut self.frames, built);
                // Re-armed either way, so fixing the file recovers the window.
                self.watch_for_changes()?;
                Ok(control)
            }
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(AppControl::Halt);
        };

        let timestamp_ms = ctx.time.elapsed_ms;
        self.frames.tick(|| {
            ctx.render(CLEAR_COLOR, |rctx, target| {
                scene.draw(rctx, target, timestamp_ms)
            })
        })
    }

    fn on_exit(&mut self) {
        if let Some(mut handle) = self.reload.take() {
            log::debug!("closing event stream {}", handle.url());
            handle.unload();
        }
        log::debug!("presented {} frame(s) since last load", self.frames.presented());
    }
}

/// Installs the outcome of a (re)build.
///
/// A failed build is logged and leaves no scene behind: the window stays open
/// with animation halted until the next successful reload.
fn settle_reload<S>(slot: &mut Option<S>, frames: &mut FrameLoop, built: Result<S>) -> AppControl {
    match built {
        Ok(scene) => {
            *slot = Some(scene);
            frames.restart();
            AppControl::Continue
        }
        Err(e) => {
            log::error!("reload failed: {e:#}");
            *slot = None;
            AppControl::Halt
        }
    }
}
