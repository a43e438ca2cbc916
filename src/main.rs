use anyhow::{Context, Result};
use clap::Parser;
use qpowerhal::core::config::path;
use qpowerhal::daemon::{config::DaemonConfig, run};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

#[derive(Parser)]
#[command(name = "qpowerhald")]
#[command(version, about = "Qualcomm power hint dispatch daemon")]
struct Args {
    /// Settings file (defaults to the vendor data dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log perf-lock requests instead of writing sysfs nodes.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let base_filter = EnvFilter::new("info");
    let (filter_layer, filter_handle) = reload::Layer::new(base_filter);
    let timer = tracing_subscriber::fmt::time::UtcTime::new(
        time::format_description::parse("[hour]:[minute]:[second]")
            .context("Invalid log time format")?,
    );

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_level(false)
                .with_timer(timer)
                .with_writer(std::io::stderr),
        )
        .init();

    let cfg = DaemonConfig::load(path::resolve(args.config), args.dry_run)?;
    if let Err(e) = run::set_log_filter(&filter_handle, &cfg.settings.daemon.log_level) {
        tracing::warn!("Keeping default log level: {:#}", e);
    }

    tracing::info!(
        "QPowerHAL v{} started (config={}, dry_run={}, hint tables={})",
        env!("CARGO_PKG_VERSION"),
        cfg.settings_path.display(),
        cfg.dry_run,
        cfg.settings.power_hints.count()
    );

    run::run_with_config(&cfg, filter_handle).await
}
