//! `edgeview-tui`: live terminal dashboard for edge-network health.
//!
//! Built on [ratatui](https://ratatui.rs) over the `edgeview-core` store. A
//! background data bridge streams every published snapshot into the TUI
//! action loop; key presses dispatch store intents.
//!
//! Logs are written to a file (default `/tmp/edgeview-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use edgeview_config::Config;
use edgeview_core::{MockDataSource, Store, TimeRange};

use crate::app::App;

/// Terminal dashboard for monitoring edge nodes, traffic, and regions.
#[derive(Parser, Debug)]
#[command(name = "edgeview-tui", version, about)]
struct Cli {
    /// Initial time range (1h, 6h, 24h, 7d, 30d). Defaults to the config value.
    #[arg(short, long, value_parser = parse_range)]
    range: Option<TimeRange>,

    /// Start with auto-refresh paused
    #[arg(long)]
    no_auto_refresh: bool,

    /// Multiplier for simulated data-source latency (0 = instant)
    #[arg(long)]
    latency_scale: Option<f64>,

    /// Probability that a simulated data-source call fails
    #[arg(long)]
    failure_rate: Option<f64>,

    /// Seed for reproducible simulated data
    #[arg(long)]
    seed: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/edgeview-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_range(raw: &str) -> Result<TimeRange, String> {
    raw.parse()
        .map_err(|_| format!("expected one of 1h, 6h, 24h, 7d, 30d, got {raw:?}"))
}

/// Set up file-based tracing. Never log to stdout/stderr while the TUI owns
/// the terminal. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("edgeview_tui={log_level},edgeview_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("edgeview-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file + environment, then flags.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = edgeview_config::load_config()?;
    if let Some(range) = cli.range {
        config.dashboard.time_range = range;
    }
    if cli.no_auto_refresh {
        config.dashboard.auto_refresh = false;
    }
    if let Some(scale) = cli.latency_scale {
        config.source.latency_scale = scale;
    }
    if let Some(rate) = cli.failure_rate {
        config.source.failure_rate = rate;
    }
    if let Some(seed) = cli.seed {
        config.source.seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so panics during init still restore the terminal.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = resolve_config(&cli)?;
    info!(
        range = %config.dashboard.time_range,
        auto_refresh = config.dashboard.auto_refresh,
        "starting edgeview-tui"
    );

    let store = Store::with_state(
        config.store_config(),
        MockDataSource::new(config.mock_config()),
        config.initial_state(),
    );
    let mut app = App::new(store, config.dashboard.time_range);
    app.run().await?;

    Ok(())
}
