mod app;
mod cli;
mod scene;
mod shader;

use anyhow::Result;
use clap::Parser;

use spinner_engine::logging::init_logging;
use spinner_engine::window::Runtime;

use app::{DemoApp, DemoEvent};
use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.logging_config());

    let source = args.scene_source()?;
    log::info!("{} scene, shader from {}", source.variant, source.location);

    let runtime = Runtime::<DemoEvent>::new()?;
    let app = DemoApp::new(source, args.reload.clone(), runtime.proxy());

    runtime.run(args.runtime_config(), args.gpu_init(), app)
}
