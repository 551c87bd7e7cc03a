// ── Derived view selectors ──
//
// Read-only projections over a `DashboardState` snapshot. All selectors are
// pure; `Memoized` caches one result per snapshot for consumers that render
// at a higher rate than the state changes.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{EdgeNode, GeographicStats, NodeStatus, TrafficPoint};
use crate::state::DashboardState;

/// Number of regions shown in the top-regions view.
pub const TOP_REGIONS: usize = 5;

/// Number of trailing samples in the recent-traffic view.
pub const RECENT_TRAFFIC_POINTS: usize = 24;

// ── Status counts ───────────────────────────────────────────────────

/// Per-status node tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub healthy: usize,
    pub warning: usize,
    pub error: usize,
    pub offline: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn get(&self, status: NodeStatus) -> usize {
        match status {
            NodeStatus::Healthy => self.healthy,
            NodeStatus::Warning => self.warning,
            NodeStatus::Error => self.error,
            NodeStatus::Offline => self.offline,
        }
    }
}

pub fn node_status_counts(state: &DashboardState) -> StatusCounts {
    state
        .edge_nodes
        .iter()
        .fold(StatusCounts::default(), |mut acc, node| {
            match node.status {
                NodeStatus::Healthy => acc.healthy += 1,
                NodeStatus::Warning => acc.warning += 1,
                NodeStatus::Error => acc.error += 1,
                NodeStatus::Offline => acc.offline += 1,
            }
            acc.total += 1;
            acc
        })
}

// ── Node filters ────────────────────────────────────────────────────

pub fn healthy_nodes(state: &DashboardState) -> Vec<&EdgeNode> {
    state
        .edge_nodes
        .iter()
        .filter(|n| n.status.is_healthy())
        .collect()
}

pub fn warning_nodes(state: &DashboardState) -> Vec<&EdgeNode> {
    state
        .edge_nodes
        .iter()
        .filter(|n| n.status == NodeStatus::Warning)
        .collect()
}

/// Nodes in `error` or `offline` status.
pub fn unhealthy_nodes(state: &DashboardState) -> Vec<&EdgeNode> {
    state
        .edge_nodes
        .iter()
        .filter(|n| n.status.is_unhealthy())
        .collect()
}

// ── Aggregates ──────────────────────────────────────────────────────

/// Mean node response time in milliseconds, rounded half away from zero.
/// Returns 0 for an empty node list.
pub fn average_response_time(state: &DashboardState) -> u32 {
    let count = u64::try_from(state.edge_nodes.len()).unwrap_or(u64::MAX);
    if count == 0 {
        return 0;
    }
    let sum: u64 = state
        .edge_nodes
        .iter()
        .map(|n| u64::from(n.response_time_ms))
        .sum();
    // Integer round-half-up: (2*sum + count) / (2*count).
    let mean = (2 * sum + count) / (2 * count);
    u32::try_from(mean).unwrap_or(u32::MAX)
}

pub fn total_bandwidth(state: &DashboardState) -> u64 {
    state.edge_nodes.iter().map(|n| n.bandwidth_usage).sum()
}

/// Regions sorted by request count (descending), at most [`TOP_REGIONS`].
pub fn top_regions(state: &DashboardState) -> Vec<GeographicStats> {
    let mut regions = state.geographic_stats.clone();
    regions.sort_by(|a, b| b.requests.cmp(&a.requests));
    regions.truncate(TOP_REGIONS);
    regions
}

/// The trailing [`RECENT_TRAFFIC_POINTS`] samples (or all, if fewer).
pub fn recent_traffic(state: &DashboardState) -> &[TrafficPoint] {
    let data = &state.traffic_data;
    &data[data.len().saturating_sub(RECENT_TRAFFIC_POINTS)..]
}

// ── Summary ─────────────────────────────────────────────────────────

/// Combined read record for summary cards and the CLI `summary` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_requests: u64,
    pub cache_hit_rate: f64,
    pub error_rate: f64,
    pub uptime: f64,
    pub healthy_nodes: usize,
    pub total_nodes: usize,
    pub avg_response_time: u32,
    pub total_bandwidth: u64,
}

pub fn dashboard_summary(state: &DashboardState) -> DashboardSummary {
    let counts = node_status_counts(state);
    let metrics = state.metrics.as_ref();
    DashboardSummary {
        total_requests: metrics.map_or(0, |m| m.total_requests),
        cache_hit_rate: metrics.map_or(0.0, |m| m.cache_hit_rate),
        error_rate: metrics.map_or(0.0, |m| m.error_rate),
        uptime: metrics.map_or(0.0, |m| m.uptime),
        healthy_nodes: counts.healthy,
        total_nodes: counts.total,
        avg_response_time: average_response_time(state),
        total_bandwidth: total_bandwidth(state),
    }
}

// ── Memoization ─────────────────────────────────────────────────────

/// One-slot cache keyed on snapshot identity.
///
/// Recomputes only when handed a snapshot that is not the same `Arc` as the
/// last one. Since the transition function returns the input `Arc` for
/// no-op actions, unchanged snapshots are cache hits.
pub struct Memoized<T> {
    select: fn(&DashboardState) -> T,
    slot: Option<(Arc<DashboardState>, T)>,
}

impl<T> Memoized<T> {
    pub fn new(select: fn(&DashboardState) -> T) -> Self {
        Self { select, slot: None }
    }

    /// Return the selector output for `state`, computing it on a miss.
    pub fn get(&mut self, state: &Arc<DashboardState>) -> &T {
        if !matches!(&self.slot, Some((cached, _)) if Arc::ptr_eq(cached, state)) {
            self.slot = None;
        }
        let select = self.select;
        let (_, value) = self
            .slot
            .get_or_insert_with(|| (Arc::clone(state), select(state)));
        value
    }

    /// The last computed value, if any, without recomputing.
    pub fn cached(&self) -> Option<&T> {
        self.slot.as_ref().map(|(_, value)| value)
    }

    /// Drop the cached value.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::Action;
    use crate::state::reduce;
    use crate::state::tests::{metrics, node};

    fn fixture_nodes() -> Vec<EdgeNode> {
        vec![
            node("1", NodeStatus::Healthy, 45),
            node("2", NodeStatus::Warning, 78),
            node("3", NodeStatus::Healthy, 32),
            node("4", NodeStatus::Error, 156),
            node("5", NodeStatus::Healthy, 28),
            node("6", NodeStatus::Healthy, 41),
        ]
    }

    fn region(name: &str, requests: u64) -> GeographicStats {
        GeographicStats {
            region: name.into(),
            requests,
            percentage: 0.0,
            avg_response_time: 50,
        }
    }

    fn point(requests: u64) -> TrafficPoint {
        TrafficPoint {
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            requests,
            bandwidth: 0,
            errors: 0,
        }
    }

    #[test]
    fn status_counts_match_hand_tally_after_node_load() {
        let s0 = Arc::new(DashboardState::initial());
        let s1 = reduce(&s0, &Action::LoadEdgeNodesSuccess(fixture_nodes()));
        assert_eq!(
            node_status_counts(&s1),
            StatusCounts {
                healthy: 4,
                warning: 1,
                error: 1,
                offline: 0,
                total: 6,
            }
        );
        assert_eq!(healthy_nodes(&s1).len(), 4);
        assert_eq!(warning_nodes(&s1).len(), 1);
        assert_eq!(unhealthy_nodes(&s1).len(), 1);
    }

    #[test]
    fn offline_counts_as_unhealthy() {
        let state = DashboardState {
            edge_nodes: vec![
                node("a", NodeStatus::Offline, 0),
                node("b", NodeStatus::Error, 10),
                node("c", NodeStatus::Healthy, 10),
            ],
            ..DashboardState::initial()
        };
        let ids: Vec<_> = unhealthy_nodes(&state).into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(node_status_counts(&state).get(NodeStatus::Offline), 1);
    }

    #[test]
    fn average_response_time_is_zero_for_no_nodes() {
        assert_eq!(average_response_time(&DashboardState::initial()), 0);
    }

    #[test]
    fn average_response_time_rounds_to_nearest() {
        let state = DashboardState {
            edge_nodes: fixture_nodes(),
            ..DashboardState::initial()
        };
        // (45 + 78 + 32 + 156 + 28 + 41) / 6 = 63.33
        assert_eq!(average_response_time(&state), 63);

        let state = DashboardState {
            edge_nodes: vec![node("a", NodeStatus::Healthy, 1), node("b", NodeStatus::Healthy, 2)],
            ..DashboardState::initial()
        };
        assert_eq!(average_response_time(&state), 2);
    }

    #[test]
    fn total_bandwidth_sums_nodes() {
        let state = DashboardState {
            edge_nodes: fixture_nodes(),
            ..DashboardState::initial()
        };
        assert_eq!(total_bandwidth(&state), 600);
    }

    #[test]
    fn top_regions_sorts_then_truncates() {
        let state = DashboardState {
            geographic_stats: vec![
                region("a", 10),
                region("b", 70),
                region("c", 30),
                region("d", 50),
                region("e", 20),
                region("f", 90),
            ],
            ..DashboardState::initial()
        };
        let names: Vec<_> = top_regions(&state).into_iter().map(|r| r.region).collect();
        assert_eq!(names, vec!["f", "b", "d", "c", "e"]);
    }

    #[test]
    fn recent_traffic_keeps_the_tail() {
        let state = DashboardState {
            traffic_data: (0..48).map(point).collect(),
            ..DashboardState::initial()
        };
        let recent = recent_traffic(&state);
        assert_eq!(recent.len(), 24);
        assert_eq!(recent[0].requests, 24);
        assert_eq!(recent[23].requests, 47);

        let short = DashboardState {
            traffic_data: (0..5).map(point).collect(),
            ..DashboardState::initial()
        };
        assert_eq!(recent_traffic(&short).len(), 5);
    }

    #[test]
    fn summary_defaults_to_zero_without_metrics() {
        let summary = dashboard_summary(&DashboardState::initial());
        assert_eq!(summary.total_requests, 0);
        assert_eq!(summary.total_nodes, 0);
        assert_eq!(summary.avg_response_time, 0);
        assert!(summary.uptime.abs() < f64::EPSILON);
    }

    #[test]
    fn summary_combines_metrics_and_nodes() {
        let state = DashboardState {
            edge_nodes: fixture_nodes(),
            metrics: Some(metrics()),
            ..DashboardState::initial()
        };
        let summary = dashboard_summary(&state);
        assert_eq!(summary.total_requests, 355_000);
        assert_eq!(summary.healthy_nodes, 4);
        assert_eq!(summary.total_nodes, 6);
        assert_eq!(summary.avg_response_time, 63);
        assert_eq!(summary.total_bandwidth, 600);
    }

    #[test]
    fn memoized_recomputes_only_on_new_snapshots() {
        let mut counts = Memoized::new(node_status_counts);
        let s0 = Arc::new(DashboardState::initial());
        assert_eq!(counts.get(&s0).total, 0);

        let same = reduce(&s0, &Action::RefreshAllData);
        assert!(Arc::ptr_eq(&s0, &same));
        assert_eq!(counts.get(&same).total, 0);

        let s1 = reduce(&s0, &Action::LoadEdgeNodesSuccess(fixture_nodes()));
        assert_eq!(counts.get(&s1).total, 6);
        assert_eq!(counts.cached().map(|c| c.total), Some(6));

        counts.invalidate();
        assert!(counts.cached().is_none());
    }
}
