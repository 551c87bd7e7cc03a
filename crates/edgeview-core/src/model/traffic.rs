use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sample of the traffic time series. Series are ordered oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficPoint {
    pub timestamp: DateTime<Utc>,
    pub requests: u64,
    pub bandwidth: u64,
    pub errors: u64,
}
