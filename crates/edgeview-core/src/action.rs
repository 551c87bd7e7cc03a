// ── Action vocabulary ──
//
// Every state transition is expressed as an `Action`. The set is closed:
// the transition function and the effect coordinator both match on it
// exhaustively, so adding a variant is a compile error until handled.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::{
    EdgeNode, GeographicStats, Metrics, MetricsPatch, NodeStatusUpdate, TimeRange, TrafficPoint,
};

/// The four fetchable entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum LoadKind {
    #[strum(serialize = "edge nodes")]
    EdgeNodes,
    #[strum(serialize = "metrics")]
    Metrics,
    #[strum(serialize = "traffic data")]
    TrafficData,
    #[strum(serialize = "geographic stats")]
    GeographicStats,
}

impl LoadKind {
    pub const ALL: [LoadKind; 4] = [
        Self::EdgeNodes,
        Self::Metrics,
        Self::TrafficData,
        Self::GeographicStats,
    ];

    /// Whether loads of this kind take a time range.
    pub fn is_windowed(self) -> bool {
        !matches!(self, Self::EdgeNodes)
    }

    /// The trigger action for this kind. `range` is ignored for edge nodes.
    pub fn trigger(self, range: TimeRange) -> Action {
        match self {
            Self::EdgeNodes => Action::LoadEdgeNodes,
            Self::Metrics => Action::LoadMetrics(range),
            Self::TrafficData => Action::LoadTrafficData(range),
            Self::GeographicStats => Action::LoadGeographicStats(range),
        }
    }

    /// The failure action for this kind.
    pub fn failure(self, message: String) -> Action {
        match self {
            Self::EdgeNodes => Action::LoadEdgeNodesFailure(message),
            Self::Metrics => Action::LoadMetricsFailure(message),
            Self::TrafficData => Action::LoadTrafficDataFailure(message),
            Self::GeographicStats => Action::LoadGeographicStatsFailure(message),
        }
    }
}

/// Every intent the dashboard pipeline recognizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    // ── Edge nodes ────────────────────────────────────────────────
    LoadEdgeNodes,
    LoadEdgeNodesSuccess(Vec<EdgeNode>),
    LoadEdgeNodesFailure(String),

    // ── Metrics ───────────────────────────────────────────────────
    LoadMetrics(TimeRange),
    LoadMetricsSuccess(Metrics),
    LoadMetricsFailure(String),

    // ── Traffic data ──────────────────────────────────────────────
    LoadTrafficData(TimeRange),
    LoadTrafficDataSuccess(Vec<TrafficPoint>),
    LoadTrafficDataFailure(String),

    // ── Geographic stats ──────────────────────────────────────────
    LoadGeographicStats(TimeRange),
    LoadGeographicStatsSuccess(Vec<GeographicStats>),
    LoadGeographicStatsFailure(String),

    // ── Settings ──────────────────────────────────────────────────
    ToggleAutoRefresh,
    SetTimeRange(TimeRange),
    RefreshAllData,

    // ── Real-time updates ─────────────────────────────────────────
    UpdateNodeStatus(NodeStatusUpdate),
    UpdateMetrics(MetricsPatch),

    // ── Housekeeping ──────────────────────────────────────────────
    ClearError,
    ResetDashboard,
}

impl Action {
    /// Human-readable tag, stable across releases. Used in logs and the
    /// CLI action feed.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::LoadEdgeNodes => "[Dashboard] Load Edge Nodes",
            Self::LoadEdgeNodesSuccess(_) => "[Dashboard] Load Edge Nodes Success",
            Self::LoadEdgeNodesFailure(_) => "[Dashboard] Load Edge Nodes Failure",
            Self::LoadMetrics(_) => "[Dashboard] Load Metrics",
            Self::LoadMetricsSuccess(_) => "[Dashboard] Load Metrics Success",
            Self::LoadMetricsFailure(_) => "[Dashboard] Load Metrics Failure",
            Self::LoadTrafficData(_) => "[Dashboard] Load Traffic Data",
            Self::LoadTrafficDataSuccess(_) => "[Dashboard] Load Traffic Data Success",
            Self::LoadTrafficDataFailure(_) => "[Dashboard] Load Traffic Data Failure",
            Self::LoadGeographicStats(_) => "[Dashboard] Load Geographic Stats",
            Self::LoadGeographicStatsSuccess(_) => "[Dashboard] Load Geographic Stats Success",
            Self::LoadGeographicStatsFailure(_) => "[Dashboard] Load Geographic Stats Failure",
            Self::ToggleAutoRefresh => "[Dashboard] Toggle Auto Refresh",
            Self::SetTimeRange(_) => "[Dashboard] Set Time Range",
            Self::RefreshAllData => "[Dashboard] Refresh All Data",
            Self::UpdateNodeStatus(_) => "[Dashboard] Update Node Status",
            Self::UpdateMetrics(_) => "[Dashboard] Update Metrics",
            Self::ClearError => "[Dashboard] Clear Error",
            Self::ResetDashboard => "[Dashboard] Reset Dashboard",
        }
    }

    /// If this is a load trigger, the kind and (for windowed kinds) range.
    pub fn load_request(&self) -> Option<(LoadKind, Option<TimeRange>)> {
        match self {
            Self::LoadEdgeNodes => Some((LoadKind::EdgeNodes, None)),
            Self::LoadMetrics(r) => Some((LoadKind::Metrics, Some(*r))),
            Self::LoadTrafficData(r) => Some((LoadKind::TrafficData, Some(*r))),
            Self::LoadGeographicStats(r) => Some((LoadKind::GeographicStats, Some(*r))),
            _ => None,
        }
    }

    /// If this is a load failure, the kind and message.
    pub fn load_failure(&self) -> Option<(LoadKind, &str)> {
        match self {
            Self::LoadEdgeNodesFailure(e) => Some((LoadKind::EdgeNodes, e)),
            Self::LoadMetricsFailure(e) => Some((LoadKind::Metrics, e)),
            Self::LoadTrafficDataFailure(e) => Some((LoadKind::TrafficData, e)),
            Self::LoadGeographicStatsFailure(e) => Some((LoadKind::GeographicStats, e)),
            _ => None,
        }
    }

    /// If this is a load success, its kind.
    pub fn load_success(&self) -> Option<LoadKind> {
        match self {
            Self::LoadEdgeNodesSuccess(_) => Some(LoadKind::EdgeNodes),
            Self::LoadMetricsSuccess(_) => Some(LoadKind::Metrics),
            Self::LoadTrafficDataSuccess(_) => Some(LoadKind::TrafficData),
            Self::LoadGeographicStatsSuccess(_) => Some(LoadKind::GeographicStats),
            _ => None,
        }
    }
}
