//! `edgeview metrics`: aggregate metrics for the selected range.

use edgeview_core::{LoadKind, Metrics};

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

fn detail(m: &Metrics) -> String {
    [
        format!(
            "Total requests: {} ({})",
            m.total_requests,
            output::compact_count(m.total_requests)
        ),
        format!("Avg response:   {} ms", m.avg_response_time),
        format!("Cache hit rate: {:.1}%", m.cache_hit_rate),
        format!("Error rate:     {:.2}%", m.error_rate),
        format!("Bandwidth used: {}", output::bytes(m.bandwidth_used)),
        format!("Peak RPS:       {}", m.peak_rps),
        format!("Uptime:         {:.2}%", m.uptime),
        format!("Sampled at:     {}", m.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
    ]
    .join("\n")
}

fn plain(m: &Metrics) -> String {
    [
        format!("total_requests={}", m.total_requests),
        format!("avg_response_time={}", m.avg_response_time),
        format!("cache_hit_rate={}", m.cache_hit_rate),
        format!("error_rate={}", m.error_rate),
        format!("bandwidth_used={}", m.bandwidth_used),
        format!("peak_rps={}", m.peak_rps),
        format!("uptime={}", m.uptime),
    ]
    .join("\n")
}

pub async fn handle(settings: &Settings) -> Result<(), CliError> {
    let state = super::load(settings, &[LoadKind::Metrics]).await?;
    let metrics = state
        .metrics
        .as_ref()
        .ok_or_else(|| CliError::Internal("metrics load finished without data".into()))?;

    let rendered = output::render_single(settings.output, metrics, detail, plain)?;
    output::print_output(&rendered, settings.quiet);
    Ok(())
}
