use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"info"` or `"spinner=debug,wgpu_core=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are no-ops.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
/// wgpu's own crates are noisy at `info`, so they are capped at `warn` unless
/// the filter mentions them.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = config
            .env_filter
            .or_else(|| std::env::var("RUST_LOG").ok());

        match filter {
            Some(filter) => {
                if !filter.contains("wgpu") {
                    quiet_wgpu(&mut builder);
                }
                builder.parse_filters(&filter);
            }
            None => {
                quiet_wgpu(&mut builder);
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

fn quiet_wgpu(builder: &mut env_logger::Builder) {
    for module in ["wgpu_core", "wgpu_hal", "naga"] {
        builder.filter_module(module, log::LevelFilter::Warn);
    }
}
