//! `edgeview nodes`: the edge fleet with per-node health.

use tabled::Tabled;

use edgeview_core::selectors;
use edgeview_core::{EdgeNode, LoadKind};

use crate::cli::{NodesArgs, OutputFormat};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Response")]
    response: String,
    #[tabled(rename = "Requests")]
    requests: String,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl NodeRow {
    fn new(node: &EdgeNode, color: bool) -> Self {
        Self {
            id: node.id.to_string(),
            location: node.location.clone(),
            country: node.country.clone(),
            status: output::status_label(node.status, color),
            response: format!("{} ms", node.response_time_ms),
            requests: output::compact_count(node.request_count),
            bandwidth: output::bytes(node.bandwidth_usage),
            updated: node.last_update.format("%H:%M:%S").to_string(),
        }
    }
}

pub async fn handle(args: NodesArgs, settings: &Settings) -> Result<(), CliError> {
    let state = super::load(settings, &[LoadKind::EdgeNodes]).await?;

    let nodes: Vec<&EdgeNode> = state
        .edge_nodes
        .iter()
        .filter(|n| args.status.is_none_or(|filter| filter.matches(n.status)))
        .collect();

    let mut rendered = output::render_list(
        settings.output,
        &nodes,
        |n| NodeRow::new(n, settings.color),
        |n| n.id.to_string(),
    )?;

    if settings.output == OutputFormat::Table {
        let counts = selectors::node_status_counts(&state);
        rendered.push_str(&format!(
            "\n{} of {} nodes shown ({} healthy, {} warning, {} unhealthy, avg {} ms)",
            nodes.len(),
            counts.total,
            counts.healthy,
            counts.warning,
            counts.error + counts.offline,
            selectors::average_response_time(&state),
        ));
    }

    output::print_output(&rendered, settings.quiet);
    Ok(())
}
