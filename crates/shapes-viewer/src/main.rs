mod args;

use anyhow::{Context, Result};
use clap::Parser;
use shapes_engine::catalog::ShapeKind;
use shapes_engine::device::GpuInit;
use shapes_engine::logging::{init_logging, LoggingConfig};
use shapes_engine::scheduler::notice_channel;
use shapes_engine::session::{SessionConfig, ShapeSession};
use shapes_engine::window::{LogicalSize, Runtime, RuntimeConfig};

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    if args.list {
        for kind in ShapeKind::ALL {
            println!("{:<12} {}", kind.name(), kind.title());
        }
        return Ok(());
    }

    // Notices have no on-screen surface here; surface them in the log.
    let (notices, notice_rx) = notice_channel();
    std::thread::Builder::new()
        .name("notices".to_string())
        .spawn(move || {
            for notice in notice_rx {
                log::warn!("{notice}");
            }
        })
        .context("failed to start notice thread")?;

    let mut config = SessionConfig::new(args.shape_spec());
    config.texture_path = args.texture.clone();
    config.density = args.density();
    config.notices = notices;

    log::info!("starting viewer with {}", args.shape);

    Runtime::run(
        RuntimeConfig {
            title: args.shape.title().to_string(),
            initial_size: LogicalSize::new(f64::from(args.width), f64::from(args.height)),
        },
        GpuInit::default(),
        ShapeSession::new(config),
    )
}
