//! `edgeview watch`: run the live store and stream applied actions.
//!
//! Starts the full pipeline (auto-refresh and real-time timers included),
//! prints one line per applied action and a summary line after every
//! metrics refresh. Structured formats emit one document per action.

use std::time::Duration;

use chrono::Local;
use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use edgeview_core::selectors;
use edgeview_core::{Action, DashboardState, Store};

use crate::cli::{OutputFormat, WatchArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: WatchArgs, settings: &Settings) -> Result<(), CliError> {
    let mut initial = settings.config.initial_state();
    if args.no_auto_refresh {
        initial.auto_refresh = false;
    }

    let store = Store::with_state(settings.config.store_config(), settings.source(), initial);
    // Subscribe before start so the first timer-driven actions are not missed.
    let mut feed = store.actions();
    store.start().await;
    store.load_all(settings.range)?;

    let result = stream_actions(&store, &mut feed, args.duration, settings).await;
    store.shutdown().await;
    result
}

async fn stream_actions(
    store: &Store,
    feed: &mut tokio::sync::broadcast::Receiver<Action>,
    duration: Option<Duration>,
    settings: &Settings,
) -> Result<(), CliError> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => {
                info!("interrupted");
                return Ok(());
            }
            () = &mut deadline => {
                info!("watch duration elapsed");
                return Ok(());
            }
            received = feed.recv() => match received {
                Ok(action) => {
                    let rendered = render_event(&action, &store.state(), settings)?;
                    output::print_output(&rendered, settings.quiet);
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "action feed lagged"),
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}

// ── Event rendering ──────────────────────────────────────────────────

fn render_event(
    action: &Action,
    state: &DashboardState,
    settings: &Settings,
) -> Result<String, CliError> {
    Ok(match settings.output {
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(action)?,
        OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(action)?),
        OutputFormat::Plain => action.tag().to_owned(),
        OutputFormat::Table => {
            let mut line = event_line(action, settings.color);
            if matches!(action, Action::LoadMetricsSuccess(_)) {
                line.push('\n');
                line.push_str(&summary_line(state, settings.color));
            }
            line
        }
    })
}

fn event_line(action: &Action, color: bool) -> String {
    let time = Local::now().format("%H:%M:%S").to_string();
    let tag = action.tag();
    let detail = describe(action);
    if !color {
        return format!("{time}  {tag}  {detail}").trim_end().to_owned();
    }
    let tag = if action.load_failure().is_some() {
        tag.red().to_string()
    } else if action.load_success().is_some() {
        tag.green().to_string()
    } else {
        tag.cyan().to_string()
    };
    format!("{}  {tag}  {detail}", time.dimmed())
        .trim_end()
        .to_owned()
}

/// Short payload description shown next to the tag.
fn describe(action: &Action) -> String {
    match action {
        Action::LoadMetrics(range)
        | Action::LoadTrafficData(range)
        | Action::LoadGeographicStats(range)
        | Action::SetTimeRange(range) => range.to_string(),
        Action::LoadEdgeNodesSuccess(nodes) => format!("{} nodes", nodes.len()),
        Action::LoadMetricsSuccess(m) => {
            format!("{} requests", output::compact_count(m.total_requests))
        }
        Action::LoadTrafficDataSuccess(points) => format!("{} points", points.len()),
        Action::LoadGeographicStatsSuccess(regions) => format!("{} regions", regions.len()),
        Action::LoadEdgeNodesFailure(message)
        | Action::LoadMetricsFailure(message)
        | Action::LoadTrafficDataFailure(message)
        | Action::LoadGeographicStatsFailure(message) => message.clone(),
        Action::UpdateNodeStatus(update) => format!(
            "{} -> {} ({} ms)",
            update.node_id, update.status, update.response_time_ms
        ),
        Action::UpdateMetrics(patch) => patch
            .total_requests
            .map(|total| format!("{} requests", output::compact_count(total)))
            .unwrap_or_default(),
        Action::LoadEdgeNodes
        | Action::ToggleAutoRefresh
        | Action::RefreshAllData
        | Action::ClearError
        | Action::ResetDashboard => String::new(),
    }
}

fn summary_line(state: &DashboardState, color: bool) -> String {
    let s = selectors::dashboard_summary(state);
    let line = format!(
        "          {} requests | cache {:.1}% | errors {:.2}% | uptime {:.2}% | {}/{} healthy | avg {} ms",
        output::compact_count(s.total_requests),
        s.cache_hit_rate,
        s.error_rate,
        s.uptime,
        s.healthy_nodes,
        s.total_nodes,
        s.avg_response_time,
    );
    if color { line.bold().to_string() } else { line }
}

#[cfg(test)]
mod tests {
    use edgeview_core::{NodeId, NodeStatus, NodeStatusUpdate, TimeRange};

    use super::*;

    #[test]
    fn describes_payloads() {
        assert_eq!(describe(&Action::LoadMetrics(TimeRange::SevenDays)), "7d");
        assert_eq!(
            describe(&Action::LoadTrafficDataFailure(
                "Failed to load traffic data".into()
            )),
            "Failed to load traffic data"
        );
        assert_eq!(
            describe(&Action::UpdateNodeStatus(NodeStatusUpdate {
                node_id: NodeId::from("3"),
                status: NodeStatus::Warning,
                response_time_ms: 180,
            })),
            "3 -> warning (180 ms)"
        );
        assert_eq!(describe(&Action::RefreshAllData), "");
    }

    #[test]
    fn uncolored_event_line_ends_with_the_tag_when_no_detail() {
        let line = event_line(&Action::ClearError, false);
        assert!(line.ends_with("[Dashboard] Clear Error"));
        assert!(!line.contains('\u{1b}'));
    }
}
