// ── Aggregate metrics ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Network-wide aggregate snapshot for the selected time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_requests: u64,
    /// Milliseconds.
    pub avg_response_time: u32,
    /// Percent (0–100).
    pub cache_hit_rate: f64,
    /// Percent (0–100).
    pub error_rate: f64,
    pub bandwidth_used: u64,
    pub peak_rps: u64,
    /// Percent (0–100).
    pub uptime: f64,
    pub timestamp: DateTime<Utc>,
}

/// Partial metrics update. `None` fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_requests: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_hit_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_rps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MetricsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge onto `base`, returning the merged copy.
    pub fn apply_to(&self, base: &Metrics) -> Metrics {
        Metrics {
            total_requests: self.total_requests.unwrap_or(base.total_requests),
            avg_response_time: self.avg_response_time.unwrap_or(base.avg_response_time),
            cache_hit_rate: self.cache_hit_rate.unwrap_or(base.cache_hit_rate),
            error_rate: self.error_rate.unwrap_or(base.error_rate),
            bandwidth_used: self.bandwidth_used.unwrap_or(base.bandwidth_used),
            peak_rps: self.peak_rps.unwrap_or(base.peak_rps),
            uptime: self.uptime.unwrap_or(base.uptime),
            timestamp: self.timestamp.unwrap_or(base.timestamp),
        }
    }
}
