use serde::{Deserialize, Serialize};

/// Per-region traffic aggregate.
///
/// `percentage` is informational; the set is not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicStats {
    pub region: String,
    pub requests: u64,
    pub percentage: f64,
    /// Milliseconds.
    pub avg_response_time: u32,
}
