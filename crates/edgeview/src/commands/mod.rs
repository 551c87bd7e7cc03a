//! Command dispatch: bridges CLI args -> store loads -> output formatting.

pub mod config_cmd;
pub mod metrics;
pub mod nodes;
pub mod regions;
pub mod summary;
pub mod traffic;
pub mod watch;

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use edgeview_core::{DashboardState, LoadKind, Store};

use crate::cli::{Command, OutputFormat};
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a data command to the appropriate handler.
pub async fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Summary => summary::handle(settings).await,
        Command::Nodes(args) => nodes::handle(args, settings).await,
        Command::Regions(args) => regions::handle(args, settings).await,
        Command::Traffic(args) => traffic::handle(args, settings).await,
        Command::Metrics => metrics::handle(settings).await,
        Command::Watch(args) => watch::handle(args, settings).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}

// ── Shared loading ───────────────────────────────────────────────────

/// Run a one-shot store (no timers) and load `kinds` at the resolved range.
pub(crate) async fn load(
    settings: &Settings,
    kinds: &[LoadKind],
) -> Result<Arc<DashboardState>, CliError> {
    let spinner = spinner(settings, kinds);
    let range = settings.range;
    tracing::debug!(?kinds, %range, "loading");

    let result = Store::oneshot(
        settings.config.store_config(),
        settings.source(),
        settings.config.initial_state(),
        |store| async move { store.fetch(kinds, range).await },
    )
    .await;

    spinner.finish_and_clear();
    Ok(result?)
}

/// Stderr spinner for interactive table output; hidden otherwise.
fn spinner(settings: &Settings, kinds: &[LoadKind]) -> ProgressBar {
    let interactive = !settings.quiet
        && settings.output == OutputFormat::Table
        && io::stderr().is_terminal();
    if !interactive {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    let what = kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    bar.set_message(format!("Loading {what}..."));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
