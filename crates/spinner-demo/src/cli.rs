use anyhow::Result;
use clap::Parser;

use spinner_engine::device::GpuInit;
use spinner_engine::logging::LoggingConfig;
use spinner_engine::window::{LogicalSize, RuntimeConfig};

use crate::scene::Variant;
use crate::shader::{SceneSource, ShaderLocation};

#[derive(Parser, Debug, Clone)]
#[command(name = "spinner")]
#[command(about = "Three triangles spinning on a ring, drawn with wgpu")]
pub struct Args {
    /// Scene to draw
    #[arg(long, value_enum, default_value_t = Variant::Rings)]
    pub variant: Variant,

    /// WGSL file path or http(s) URL (default: the built-in shader for the variant)
    #[arg(long, value_name = "PATH|URL")]
    pub shader: Option<String>,

    /// Base URL of a live-reloading file server; its `events` stream triggers reloads
    #[arg(long, value_name = "BASE_URL")]
    pub reload: Option<String>,

    /// Window title
    #[arg(long, default_value = "spinner")]
    pub title: String,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "512")]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "512")]
    pub height: f64,

    /// Wait for the display refresh between frames (the default)
    #[arg(long, overrides_with = "no_vsync")]
    pub vsync: bool,

    /// Present frames as fast as the device allows
    #[arg(long, overrides_with = "vsync")]
    pub no_vsync: bool,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Args {
    pub fn scene_source(&self) -> Result<SceneSource> {
        let location = match self.shader.as_deref() {
            Some(raw) => ShaderLocation::parse(raw)?,
            None => ShaderLocation::Builtin(self.variant),
        };
        Ok(SceneSource {
            variant: self.variant,
            location,
        })
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width.max(1.0), self.height.max(1.0)),
        }
    }

    /// `--vsync` and `--no-vsync` override each other; the last one given wins.
    pub fn vsync(&self) -> bool {
        self.vsync || !self.no_vsync
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit::default().with_vsync(self.vsync())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("spinner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        assert_eq!(args.variant, Variant::Rings);
        assert!(args.vsync());
        assert!(args.reload.is_none());

        let source = args.scene_source().unwrap();
        assert_eq!(source.location, ShaderLocation::Builtin(Variant::Rings));
        assert_eq!(args.gpu_init().present_mode, wgpu::PresentMode::Fifo);
    }

    #[test]
    fn shader_flag_overrides_builtin() {
        let args = parse(&["--variant", "ring", "--shader", "http://localhost:8000/triangle.wgsl"]);
        let source = args.scene_source().unwrap();
        assert_eq!(source.variant, Variant::Ring);
        assert!(matches!(source.location, ShaderLocation::Url(_)));
    }

    #[test]
    fn vsync_can_be_disabled() {
        let args = parse(&["--no-vsync"]);
        assert_eq!(args.gpu_init().present_mode, wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn last_vsync_flag_wins() {
        assert!(parse(&["--no-vsync", "--vsync"]).vsync());
        assert!(!parse(&["--vsync", "--no-vsync"]).vsync());
    }

    #[test]
    fn window_size_and_log_filter() {
        let args = parse(&["--width", "800", "--height", "600", "--log", "debug"]);
        let cfg = args.runtime_config();
        assert_eq!(cfg.initial_size, LogicalSize::new(800.0, 600.0));
        assert_eq!(args.logging_config().env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_variant_rejected() {
        assert!(Args::try_parse_from(["spinner", "--variant", "cube"]).is_err());
    }
}
