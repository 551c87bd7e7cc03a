//! Human-readable number and age formatting helpers.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Compact count: `355_000` → `355.0K`, `2_485_000` → `2.5M`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_count(value: u64) -> String {
    if value >= 1_000_000_000 {
        format!("{:.1}B", value as f64 / 1_000_000_000.0)
    } else if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Bandwidth in megabytes, as the data source reports it: `4240` → `4.1 GB`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_megabytes(mb: u64) -> String {
    if mb >= 1024 * 1024 {
        format!("{:.1} TB", mb as f64 / (1024.0 * 1024.0))
    } else if mb >= 1024 {
        format!("{:.1} GB", mb as f64 / 1024.0)
    } else {
        format!("{mb} MB")
    }
}

/// Age of `then` relative to `now`, whole seconds: `"12s ago"`, `"2m 5s ago"`.
pub fn fmt_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0).unsigned_abs();
    if secs == 0 {
        return "just now".into();
    }
    format!("{} ago", humantime::format_duration(Duration::from_secs(secs)))
}
