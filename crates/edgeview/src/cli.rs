//! Clap derive structures for the `edgeview` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This file
//! is also compiled by `build.rs` for man page generation, so it must only
//! depend on clap, clap_complete and humantime.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// edgeview -- edge-network health from the command line
#[derive(Debug, Parser)]
#[command(
    name = "edgeview",
    version,
    about = "Inspect edge-network health from the command line",
    long_about = "Query edge node status, aggregate metrics, traffic series and\n\
        regional breakdowns, or watch the live dashboard pipeline as it\n\
        refreshes.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Aggregation window (defaults to dashboard.time_range from config)
    #[arg(long, short = 'r', global = true)]
    pub range: Option<RangeArg>,

    /// Output format (defaults to defaults.output from config)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Multiplier applied to simulated source latency (0 = instant)
    #[arg(long, global = true, value_name = "FACTOR")]
    pub latency_scale: Option<f64>,

    /// Probability (0.0-1.0) that a simulated load fails
    #[arg(long, global = true, value_name = "RATE")]
    pub failure_rate: Option<f64>,

    /// Seed for reproducible simulated data
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangeArg {
    #[value(name = "1h")]
    OneHour,
    #[value(name = "6h")]
    SixHours,
    #[value(name = "24h")]
    TwentyFourHours,
    #[value(name = "7d")]
    SevenDays,
    #[value(name = "30d")]
    ThirtyDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Healthy,
    Warning,
    Error,
    Offline,
    /// Error or offline
    Unhealthy,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Headline numbers: requests, cache hit rate, errors, uptime, node health
    #[command(alias = "s")]
    Summary,

    /// List edge nodes
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// Regional traffic breakdown
    Regions(RegionsArgs),

    /// Traffic time series
    #[command(alias = "t")]
    Traffic(TrafficArgs),

    /// Aggregate metrics for the selected range
    #[command(alias = "m")]
    Metrics,

    /// Run the live dashboard pipeline and print each applied action
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    /// Only show nodes with this status
    #[arg(long, short = 's')]
    pub status: Option<StatusArg>,
}

#[derive(Debug, Args)]
pub struct RegionsArgs {
    /// Show every region instead of the busiest five
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct TrafficArgs {
    /// Show the full series instead of the most recent 24 points
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this long (e.g. "30s", "5m"); runs until Ctrl-C otherwise
    #[arg(long, short = 'd', value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,

    /// Disable the periodic refresh-all timer
    #[arg(long)]
    pub no_auto_refresh: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Display the resolved configuration (file + environment)
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
