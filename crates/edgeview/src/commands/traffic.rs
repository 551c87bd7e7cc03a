//! `edgeview traffic`: request/bandwidth/error samples, oldest first.

use tabled::Tabled;

use edgeview_core::selectors;
use edgeview_core::{LoadKind, TrafficPoint};

use crate::cli::TrafficArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TrafficRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Requests")]
    requests: u64,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
    #[tabled(rename = "Errors")]
    errors: u64,
}

impl From<&TrafficPoint> for TrafficRow {
    fn from(p: &TrafficPoint) -> Self {
        Self {
            time: p.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            requests: p.requests,
            bandwidth: output::bytes(p.bandwidth),
            errors: p.errors,
        }
    }
}

fn plain_line(p: &TrafficPoint) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        p.timestamp.to_rfc3339(),
        p.requests,
        p.bandwidth,
        p.errors
    )
}

pub async fn handle(args: TrafficArgs, settings: &Settings) -> Result<(), CliError> {
    let state = super::load(settings, &[LoadKind::TrafficData]).await?;

    let points = if args.all {
        state.traffic_data.as_slice()
    } else {
        selectors::recent_traffic(&state)
    };

    let rendered = output::render_list(
        settings.output,
        points,
        |p| TrafficRow::from(p),
        plain_line,
    )?;
    output::print_output(&rendered, settings.quiet);
    Ok(())
}
