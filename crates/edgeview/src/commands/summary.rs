//! `edgeview summary`: the dashboard's headline cards in one view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use edgeview_core::selectors::{self, DashboardSummary, StatusCounts};
use edgeview_core::{DashboardState, LoadKind, TimeRange};

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    range: TimeRange,
    #[serde(flatten)]
    summary: DashboardSummary,
    status_counts: StatusCounts,
    last_refresh: Option<DateTime<Utc>>,
}

impl SummaryReport {
    fn from_state(state: &DashboardState) -> Self {
        Self {
            range: state.selected_time_range,
            summary: selectors::dashboard_summary(state),
            status_counts: selectors::node_status_counts(state),
            last_refresh: state.last_refresh,
        }
    }
}

fn detail(report: &SummaryReport, color: bool) -> String {
    use edgeview_core::NodeStatus;

    let s = &report.summary;
    let c = &report.status_counts;
    let health = NodeStatus::ALL
        .iter()
        .map(|status| format!("{} {}", c.get(*status), output::status_label(*status, color)))
        .collect::<Vec<_>>()
        .join(", ");
    [
        format!("Range:          {}", report.range),
        format!("Total requests: {}", output::compact_count(s.total_requests)),
        format!("Cache hit rate: {:.1}%", s.cache_hit_rate),
        format!("Error rate:     {:.2}%", s.error_rate),
        format!("Uptime:         {:.2}%", s.uptime),
        format!("Healthy nodes:  {}/{}", s.healthy_nodes, s.total_nodes),
        format!("Node health:    {health}"),
        format!("Avg response:   {} ms", s.avg_response_time),
        format!("Bandwidth:      {}", output::bytes(s.total_bandwidth)),
    ]
    .join("\n")
}

fn plain(report: &SummaryReport) -> String {
    let s = &report.summary;
    [
        format!("range={}", report.range),
        format!("total_requests={}", s.total_requests),
        format!("cache_hit_rate={}", s.cache_hit_rate),
        format!("error_rate={}", s.error_rate),
        format!("uptime={}", s.uptime),
        format!("healthy_nodes={}", s.healthy_nodes),
        format!("total_nodes={}", s.total_nodes),
        format!("avg_response_time={}", s.avg_response_time),
        format!("total_bandwidth={}", s.total_bandwidth),
    ]
    .join("\n")
}

pub async fn handle(settings: &Settings) -> Result<(), CliError> {
    let state = super::load(settings, &LoadKind::ALL).await?;
    let report = SummaryReport::from_state(&state);
    let rendered = output::render_single(
        settings.output,
        &report,
        |r| detail(r, settings.color),
        plain,
    )?;
    output::print_output(&rendered, settings.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use edgeview_core::{Action, MockDataSource, reduce};

    use super::*;

    fn loaded_state() -> DashboardState {
        let now = Utc::now();
        let state = std::sync::Arc::new(DashboardState::initial());
        let state = reduce(
            &state,
            &Action::LoadEdgeNodesSuccess(MockDataSource::fixture_nodes(now)),
        );
        (*state).clone()
    }

    #[test]
    fn report_counts_fixture_fleet() {
        let report = SummaryReport::from_state(&loaded_state());
        assert_eq!(report.status_counts.total, 6);
        assert_eq!(report.summary.total_nodes, 6);
        assert_eq!(report.summary.total_requests, 0);
    }

    #[test]
    fn plain_output_is_key_value() {
        let text = plain(&SummaryReport::from_state(&loaded_state()));
        assert!(text.lines().all(|l| l.contains('=')));
        assert!(text.contains("total_nodes=6"));
    }

    #[test]
    fn json_flattens_the_summary() {
        let value = serde_json::to_value(SummaryReport::from_state(&loaded_state()))
            .expect("serialize");
        assert_eq!(value["totalNodes"], 6);
        assert_eq!(value["range"], "24h");
        assert!(value["statusCounts"]["healthy"].is_number());
    }
}
