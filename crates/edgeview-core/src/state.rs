// ── Dashboard snapshot and transition function ──
//
// `DashboardState` is the single aggregate root. It is only ever replaced,
// never mutated in place: `reduce` builds the next snapshot from the current
// one and an action. Readers hold `Arc<DashboardState>` and always observe a
// fully-formed value.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::model::{EdgeNode, GeographicStats, Metrics, NodeStatusUpdate, TimeRange, TrafficPoint};

/// Complete dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub edge_nodes: Vec<EdgeNode>,
    pub metrics: Option<Metrics>,
    pub traffic_data: Vec<TrafficPoint>,
    pub geographic_stats: Vec<GeographicStats>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_refresh: Option<DateTime<Utc>>,
    pub auto_refresh: bool,
    pub selected_time_range: TimeRange,
}

impl DashboardState {
    /// The documented initial snapshot: no data, no error, auto-refresh on,
    /// 24h window.
    pub fn initial() -> Self {
        Self {
            edge_nodes: Vec::new(),
            metrics: None,
            traffic_data: Vec::new(),
            geographic_stats: Vec::new(),
            loading: false,
            error: None,
            last_refresh: None,
            auto_refresh: true,
            selected_time_range: TimeRange::TwentyFourHours,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Apply `action` to `state`, stamping timestamps with the current time.
///
/// Returns `Arc::clone(state)` whenever the action leaves the snapshot
/// untouched, so callers can detect no-ops with [`Arc::ptr_eq`].
pub fn reduce(state: &Arc<DashboardState>, action: &Action) -> Arc<DashboardState> {
    reduce_at(state, action, Utc::now())
}

/// [`reduce`] with an explicit clock, for deterministic callers.
pub fn reduce_at(
    state: &Arc<DashboardState>,
    action: &Action,
    now: DateTime<Utc>,
) -> Arc<DashboardState> {
    match action {
        // ── Load triggers ────────────────────────────────────────
        Action::LoadEdgeNodes
        | Action::LoadMetrics(_)
        | Action::LoadTrafficData(_)
        | Action::LoadGeographicStats(_) => {
            if state.loading && state.error.is_none() {
                return Arc::clone(state);
            }
            modify(state, |s| {
                s.loading = true;
                s.error = None;
            })
        }

        // ── Load successes ───────────────────────────────────────
        Action::LoadEdgeNodesSuccess(nodes) => modify(state, |s| {
            s.edge_nodes.clone_from(nodes);
            s.loading = false;
            s.last_refresh = Some(now);
        }),
        Action::LoadMetricsSuccess(metrics) => modify(state, |s| {
            s.metrics = Some(metrics.clone());
            s.loading = false;
        }),
        Action::LoadTrafficDataSuccess(points) => modify(state, |s| {
            s.traffic_data.clone_from(points);
            s.loading = false;
        }),
        Action::LoadGeographicStatsSuccess(stats) => modify(state, |s| {
            s.geographic_stats.clone_from(stats);
            s.loading = false;
        }),

        // ── Load failures ────────────────────────────────────────
        Action::LoadEdgeNodesFailure(message)
        | Action::LoadMetricsFailure(message)
        | Action::LoadTrafficDataFailure(message)
        | Action::LoadGeographicStatsFailure(message) => modify(state, |s| {
            s.loading = false;
            s.error = Some(message.clone());
        }),

        // ── Settings ─────────────────────────────────────────────
        Action::ToggleAutoRefresh => modify(state, |s| s.auto_refresh = !s.auto_refresh),
        Action::SetTimeRange(range) => {
            if state.selected_time_range == *range {
                return Arc::clone(state);
            }
            modify(state, |s| s.selected_time_range = *range)
        }
        // Composite trigger: handled entirely by the effect coordinator.
        Action::RefreshAllData => Arc::clone(state),

        // ── Real-time updates ────────────────────────────────────
        Action::UpdateNodeStatus(update) => apply_node_update(state, update, now),
        Action::UpdateMetrics(patch) => match &state.metrics {
            Some(current) if !patch.is_empty() => {
                let merged = patch.apply_to(current);
                modify(state, |s| s.metrics = Some(merged))
            }
            _ => Arc::clone(state),
        },

        // ── Housekeeping ─────────────────────────────────────────
        Action::ClearError => {
            if state.error.is_none() {
                return Arc::clone(state);
            }
            modify(state, |s| s.error = None)
        }
        Action::ResetDashboard => Arc::new(DashboardState::initial()),
    }
}

fn modify(state: &DashboardState, f: impl FnOnce(&mut DashboardState)) -> Arc<DashboardState> {
    let mut next = state.clone();
    f(&mut next);
    Arc::new(next)
}

fn apply_node_update(
    state: &Arc<DashboardState>,
    update: &NodeStatusUpdate,
    now: DateTime<Utc>,
) -> Arc<DashboardState> {
    let Some(index) = state
        .edge_nodes
        .iter()
        .position(|n| n.id == update.node_id)
    else {
        return Arc::clone(state);
    };

    modify(state, |s| {
        let node = &mut s.edge_nodes[index];
        node.status = update.status;
        node.response_time_ms = update.response_time_ms;
        node.last_update = now;
    })
}
