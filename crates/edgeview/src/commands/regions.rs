//! `edgeview regions`: request share per region.

use tabled::Tabled;

use edgeview_core::selectors;
use edgeview_core::{GeographicStats, LoadKind};

use crate::cli::RegionsArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Requests")]
    requests: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Avg Response")]
    avg_response: String,
}

impl From<&GeographicStats> for RegionRow {
    fn from(g: &GeographicStats) -> Self {
        Self {
            region: g.region.clone(),
            requests: output::compact_count(g.requests),
            share: format!("{:.1}%", g.percentage),
            avg_response: format!("{} ms", g.avg_response_time),
        }
    }
}

pub async fn handle(args: RegionsArgs, settings: &Settings) -> Result<(), CliError> {
    let state = super::load(settings, &[LoadKind::GeographicStats]).await?;

    let regions = if args.all {
        let mut all = state.geographic_stats.clone();
        all.sort_by(|a, b| b.requests.cmp(&a.requests));
        all
    } else {
        selectors::top_regions(&state)
    };

    let rendered = output::render_list(
        settings.output,
        &regions,
        |g| RegionRow::from(g),
        |g| g.region.clone(),
    )?;
    output::print_output(&rendered, settings.quiet);
    Ok(())
}
