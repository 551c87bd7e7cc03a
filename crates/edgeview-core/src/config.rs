// ── Runtime configuration ──
//
// These types describe how the store and the mock backend behave at
// runtime. They never touch disk: the CLI/TUI builds them from the
// config file and flags and hands them in.

use std::time::Duration;

/// Timer and fan-out settings for a [`Store`](crate::Store).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Auto-refresh period. `Duration::ZERO` disables the timer.
    pub auto_refresh_interval: Duration,
    /// Real-time status update period. `Duration::ZERO` disables the timer.
    pub realtime_interval: Duration,
    /// Delay before the first real-time update.
    pub realtime_initial_delay: Duration,
    /// When set, refresh-all loads the currently selected range instead of
    /// the fixed 24h window.
    pub refresh_uses_selected_range: bool,
}

impl StoreConfig {
    /// Same settings with both standing timers disabled.
    pub fn without_timers(mut self) -> Self {
        self.auto_refresh_interval = Duration::ZERO;
        self.realtime_interval = Duration::ZERO;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            auto_refresh_interval: Duration::from_secs(30),
            realtime_interval: Duration::from_secs(10),
            realtime_initial_delay: Duration::from_secs(5),
            refresh_uses_selected_range: false,
        }
    }
}

/// Behaviour knobs for [`MockDataSource`](crate::source::MockDataSource).
#[derive(Debug, Clone, PartialEq)]
pub struct MockConfig {
    /// Multiplier applied to the simulated latencies. 0 disables delays.
    pub latency_scale: f64,
    /// Probability in `[0, 1]` that any call fails.
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible output.
    pub seed: Option<u64>,
}

impl MockConfig {
    /// Instant, deterministic, never failing. Used by tests.
    pub fn instant(seed: u64) -> Self {
        Self {
            latency_scale: 0.0,
            failure_rate: 0.0,
            seed: Some(seed),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_scale: 1.0,
            failure_rate: 0.0,
            seed: None,
        }
    }
}
