//! Resolve the effective settings: config file + environment, then CLI flags.

use clap::ValueEnum;

use edgeview_config::Config;
use edgeview_core::{MockDataSource, NodeStatus, TimeRange};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat, RangeArg, StatusArg};
use crate::error::CliError;
use crate::output;

/// Everything a command needs after flags are layered over the config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub range: TimeRange,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Settings {
    /// Mock data source built from the resolved `[source]` section.
    pub fn source(&self) -> MockDataSource {
        MockDataSource::new(self.config.mock_config())
    }
}

/// Load the config file and apply global flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut config = edgeview_config::load_config()?;
    apply_overrides(&mut config, global);
    config.validate()?;

    let output = match global.output {
        Some(format) => format,
        None => parse_value(&config.defaults.output, "defaults.output")?,
    };
    let color_mode = match global.color {
        Some(mode) => mode,
        None => parse_value::<ColorMode>(&config.defaults.color, "defaults.color")?,
    };

    Ok(Settings {
        range: config.dashboard.time_range,
        output,
        color: output::should_color(color_mode),
        quiet: global.quiet,
        config,
    })
}

fn apply_overrides(config: &mut Config, global: &GlobalOpts) {
    if let Some(range) = global.range {
        config.dashboard.time_range = range.into();
    }
    if let Some(scale) = global.latency_scale {
        config.source.latency_scale = scale;
    }
    if let Some(rate) = global.failure_rate {
        config.source.failure_rate = rate;
    }
    if let Some(seed) = global.seed {
        config.source.seed = Some(seed);
    }
}

fn parse_value<T: ValueEnum>(raw: &str, field: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

// ── Flag → core type conversions ─────────────────────────────────────

impl From<RangeArg> for TimeRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::OneHour => Self::OneHour,
            RangeArg::SixHours => Self::SixHours,
            RangeArg::TwentyFourHours => Self::TwentyFourHours,
            RangeArg::SevenDays => Self::SevenDays,
            RangeArg::ThirtyDays => Self::ThirtyDays,
        }
    }
}

impl StatusArg {
    /// Whether a node with `status` passes this filter.
    pub fn matches(self, status: NodeStatus) -> bool {
        match self {
            StatusArg::Healthy => status == NodeStatus::Healthy,
            StatusArg::Warning => status == NodeStatus::Warning,
            StatusArg::Error => status == NodeStatus::Error,
            StatusArg::Offline => status == NodeStatus::Offline,
            StatusArg::Unhealthy => status.is_unhealthy(),
        }
    }
}
