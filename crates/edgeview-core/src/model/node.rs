// ── Edge node domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── NodeId ──────────────────────────────────────────────────────────

/// Opaque identifier of an edge node (PoP).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── NodeStatus ──────────────────────────────────────────────────────

/// Health of an edge node as reported by the data source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NodeStatus {
    Healthy,
    Warning,
    Error,
    Offline,
}

impl NodeStatus {
    pub const ALL: [NodeStatus; 4] = [Self::Healthy, Self::Warning, Self::Error, Self::Offline];

    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Error and offline nodes both count as unhealthy.
    pub fn is_unhealthy(self) -> bool {
        matches!(self, Self::Error | Self::Offline)
    }
}

// ── EdgeNode ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A single edge location serving traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeNode {
    pub id: NodeId,
    pub location: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub status: NodeStatus,
    /// Milliseconds.
    #[serde(rename = "responseTime")]
    pub response_time_ms: u32,
    pub request_count: u64,
    pub bandwidth_usage: u64,
    pub last_update: DateTime<Utc>,
    pub coordinates: Coordinates,
}

/// Real-time status change for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatusUpdate {
    pub node_id: NodeId,
    pub status: NodeStatus,
    #[serde(rename = "responseTime")]
    pub response_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens_round_trip_through_strum() {
        assert_eq!(NodeStatus::Warning.to_string(), "warning");
        assert_eq!("OFFLINE".parse::<NodeStatus>().ok(), Some(NodeStatus::Offline));
        assert!("degraded".parse::<NodeStatus>().is_err());
    }

    #[test]
    fn unhealthy_covers_error_and_offline() {
        let unhealthy: Vec<_> = NodeStatus::ALL
            .into_iter()
            .filter(|s| s.is_unhealthy())
            .collect();
        assert_eq!(unhealthy, vec![NodeStatus::Error, NodeStatus::Offline]);
    }

    #[test]
    fn node_serializes_with_dashboard_field_names() {
        let node = EdgeNode {
            id: NodeId::from("7"),
            location: "Paris".into(),
            country: "FR".into(),
            status: NodeStatus::Healthy,
            response_time_ms: 30,
            request_count: 10,
            bandwidth_usage: 5,
            last_update: DateTime::<Utc>::UNIX_EPOCH,
            coordinates: Coordinates { lat: 48.85, lng: 2.35 },
        };
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["id"], "7");
        assert_eq!(json["responseTime"], 30);
        assert_eq!(json["requestCount"], 10);
        assert_eq!(json["status"], "healthy");
    }
}
