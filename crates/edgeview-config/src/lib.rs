//! Shared configuration for the edgeview CLI and TUI.
//!
//! TOML file layered with environment overrides, and translation to the
//! runtime `edgeview_core::StoreConfig` / `MockConfig`. Both binaries depend
//! on this crate; the CLI applies its global flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgeview_core::{DashboardState, MockConfig, StoreConfig, TimeRange};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `EDGEVIEW_DASHBOARD__TIME_RANGE=1h`.
pub const ENV_PREFIX: &str = "EDGEVIEW_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Output defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,

    /// Dashboard behaviour: initial range and timers.
    #[serde(default)]
    pub dashboard: DashboardSettings,

    /// Mock data source tuning.
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Range selected at startup.
    pub time_range: TimeRange,

    /// Whether auto-refresh starts enabled.
    pub auto_refresh: bool,

    /// Auto-refresh period in seconds. 0 disables the timer.
    pub auto_refresh_secs: u64,

    /// Real-time status update period in seconds. 0 disables the feed.
    pub realtime_secs: u64,

    /// Delay before the first real-time update, in seconds.
    pub realtime_delay_secs: u64,

    /// Refresh-all reloads the selected range instead of 24h.
    pub refresh_uses_selected_range: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            time_range: TimeRange::default(),
            auto_refresh: true,
            auto_refresh_secs: 30,
            realtime_secs: 10,
            realtime_delay_secs: 5,
            refresh_uses_selected_range: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Multiplier on simulated latency. 0 answers instantly.
    pub latency_scale: f64,

    /// Probability (0.0–1.0) that a mock call fails.
    pub failure_rate: f64,

    /// Fixed RNG seed for reproducible data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            latency_scale: 1.0,
            failure_rate: 0.0,
            seed: None,
        }
    }
}

// ── Validation and translation ──────────────────────────────────────

/// Largest accepted `source.latency_scale`.
pub const MAX_LATENCY_SCALE: f64 = 1000.0;

impl Config {
    /// Reject values the runtime cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let latency = self.source.latency_scale;
        if !(0.0..=MAX_LATENCY_SCALE).contains(&latency) {
            return Err(ConfigError::Validation {
                field: "source.latency_scale".into(),
                reason: format!("must be between 0 and {MAX_LATENCY_SCALE}, got {latency}"),
            });
        }

        let rate = self.source.failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::Validation {
                field: "source.failure_rate".into(),
                reason: format!("must be between 0.0 and 1.0, got {rate}"),
            });
        }

        match self.defaults.output.as_str() {
            "table" | "json" | "json-compact" | "yaml" | "plain" => {}
            other => {
                return Err(ConfigError::Validation {
                    field: "defaults.output".into(),
                    reason: format!(
                        "expected table, json, json-compact, yaml, or plain, got '{other}'"
                    ),
                });
            }
        }

        match self.defaults.color.as_str() {
            "auto" | "always" | "never" => Ok(()),
            other => Err(ConfigError::Validation {
                field: "defaults.color".into(),
                reason: format!("expected auto, always, or never, got '{other}'"),
            }),
        }
    }

    /// Timer settings for the store.
    pub fn store_config(&self) -> StoreConfig {
        let d = &self.dashboard;
        StoreConfig {
            auto_refresh_interval: Duration::from_secs(d.auto_refresh_secs),
            realtime_interval: Duration::from_secs(d.realtime_secs),
            realtime_initial_delay: Duration::from_secs(d.realtime_delay_secs),
            refresh_uses_selected_range: d.refresh_uses_selected_range,
        }
    }

    /// Settings for the mock data source.
    pub fn mock_config(&self) -> MockConfig {
        MockConfig {
            latency_scale: self.source.latency_scale,
            failure_rate: self.source.failure_rate,
            seed: self.source.seed,
        }
    }

    /// The snapshot a store starts from: documented initial state with the
    /// configured range and auto-refresh setting.
    pub fn initial_state(&self) -> DashboardState {
        DashboardState {
            auto_refresh: self.dashboard.auto_refresh,
            selected_time_range: self.dashboard.time_range,
            ..DashboardState::initial()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "edgeview", "edgeview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("edgeview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing file is fine) layered with `EDGEVIEW_*`
/// environment variables, then validate.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
