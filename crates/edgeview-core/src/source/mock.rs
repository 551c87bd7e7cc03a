// ── In-process mock backend ──
//
// Serves a fixed fleet of six edge nodes and five regions, synthesizes
// metrics and traffic per time range, and simulates network latency.
// Latency, failure injection, and RNG seeding come from `MockConfig`.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::{DataSource, SourceError};
use crate::config::MockConfig;
use crate::model::{
    Coordinates, EdgeNode, GeographicStats, Metrics, NodeId, NodeStatus, NodeStatusUpdate,
    TimeRange, TrafficPoint,
};

// Simulated round-trip latencies at `latency_scale = 1.0`.
const NODES_LATENCY: Duration = Duration::from_millis(500);
const METRICS_LATENCY: Duration = Duration::from_millis(300);
const TRAFFIC_LATENCY: Duration = Duration::from_millis(400);
const REGIONS_LATENCY: Duration = Duration::from_millis(350);
const STATUS_LATENCY: Duration = Duration::from_millis(100);

/// `(id, location, country, status, response ms, requests, bandwidth, lat, lng)`
type NodeFixture = (
    &'static str,
    &'static str,
    &'static str,
    NodeStatus,
    u32,
    u64,
    u64,
    f64,
    f64,
);

const NODES: [NodeFixture; 6] = [
    ("1", "New York", "US", NodeStatus::Healthy, 45, 12_500, 850, 40.7128, -74.006),
    ("2", "London", "GB", NodeStatus::Warning, 78, 8_900, 620, 51.5074, -0.1278),
    ("3", "Tokyo", "JP", NodeStatus::Healthy, 32, 15_200, 1_200, 35.6762, 139.6503),
    ("4", "Sydney", "AU", NodeStatus::Error, 156, 3_400, 230, -33.8688, 151.2093),
    ("5", "Frankfurt", "DE", NodeStatus::Healthy, 28, 18_700, 1_450, 50.1109, 8.6821),
    ("6", "Singapore", "SG", NodeStatus::Healthy, 41, 11_800, 890, 1.3521, 103.8198),
];

/// `(region, requests, percentage, avg response ms)`
const REGIONS: [(&str, u64, f64, u32); 5] = [
    ("North America", 125_000, 35.2, 45),
    ("Europe", 98_000, 27.6, 52),
    ("Asia Pacific", 87_000, 24.5, 38),
    ("South America", 28_000, 7.9, 89),
    ("Africa", 17_000, 4.8, 102),
];

// 24h baseline for the metrics endpoint.
const BASE_TOTAL_REQUESTS: u64 = 355_000;
const BASE_AVG_RESPONSE_MS: u32 = 48;
const BASE_CACHE_HIT_RATE: f64 = 94.2;
const BASE_ERROR_RATE: f64 = 0.08;
const BASE_BANDWIDTH: u64 = 4_240;
const BASE_PEAK_RPS: u64 = 8_900;
const BASE_UPTIME: f64 = 99.97;

/// Statuses the real-time feed reports. Offline never appears.
const UPDATE_STATUSES: [NodeStatus; 3] =
    [NodeStatus::Healthy, NodeStatus::Warning, NodeStatus::Error];

/// Mock [`DataSource`] with simulated latency and optional failure injection.
pub struct MockDataSource {
    config: MockConfig,
    rng: Mutex<StdRng>,
}

impl MockDataSource {
    pub fn new(config: MockConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// The fixed fleet, stamped with `now`.
    pub fn fixture_nodes(now: DateTime<Utc>) -> Vec<EdgeNode> {
        NODES
            .iter()
            .map(
                |&(id, location, country, status, rt, requests, bandwidth, lat, lng)| EdgeNode {
                    id: NodeId::from(id),
                    location: location.to_owned(),
                    country: country.to_owned(),
                    status,
                    response_time_ms: rt,
                    request_count: requests,
                    bandwidth_usage: bandwidth,
                    last_update: now,
                    coordinates: Coordinates { lat, lng },
                },
            )
            .collect()
    }

    /// The fixed regional breakdown.
    pub fn fixture_regions() -> Vec<GeographicStats> {
        REGIONS
            .iter()
            .map(|&(region, requests, percentage, avg)| GeographicStats {
                region: region.to_owned(),
                requests,
                percentage,
                avg_response_time: avg,
            })
            .collect()
    }

    // ── Internals ────────────────────────────────────────────────

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Sleep for the scaled latency, then roll for an injected failure.
    async fn round_trip(&self, base: Duration, what: &str) -> Result<(), SourceError> {
        let scale = self.config.latency_scale;
        if scale > 0.0 {
            let delay = Duration::try_from_secs_f64(base.as_secs_f64() * scale)
                .map_err(|e| SourceError::new(format!("Invalid latency for {what}: {e}")))?;
            tokio::time::sleep(delay).await;
        }

        let rate = self.config.failure_rate;
        if rate > 0.0 && self.with_rng(|rng| rng.random::<f64>() < rate) {
            trace!(what, "injecting mock failure");
            return Err(SourceError::new(format!("Failed to load {what}")));
        }
        Ok(())
    }

    fn traffic_series(
        &self,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrafficPoint>, SourceError> {
        let step = TimeDelta::from_std(range.sample_interval())
            .map_err(|e| SourceError::new(format!("invalid sample interval: {e}")))?;
        let points = i32::try_from(range.data_points()).unwrap_or(i32::MAX);

        Ok(self.with_rng(|rng| {
            (0..points)
                .rev()
                .map(|i| TrafficPoint {
                    timestamp: now - step * i,
                    requests: rng.random_range(8_000..13_000),
                    bandwidth: rng.random_range(150..350),
                    errors: rng.random_range(5..55),
                })
                .collect()
        }))
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl DataSource for MockDataSource {
    async fn edge_nodes(&self) -> Result<Vec<EdgeNode>, SourceError> {
        self.round_trip(NODES_LATENCY, "edge nodes").await?;
        Ok(Self::fixture_nodes(Utc::now()))
    }

    async fn metrics(&self, range: TimeRange) -> Result<Metrics, SourceError> {
        self.round_trip(METRICS_LATENCY, "metrics").await?;
        let multiplier = range.request_multiplier();
        Ok(Metrics {
            total_requests: scale_rounded(BASE_TOTAL_REQUESTS, multiplier),
            avg_response_time: BASE_AVG_RESPONSE_MS,
            cache_hit_rate: BASE_CACHE_HIT_RATE,
            error_rate: BASE_ERROR_RATE,
            bandwidth_used: scale_rounded(BASE_BANDWIDTH, multiplier),
            peak_rps: BASE_PEAK_RPS,
            uptime: BASE_UPTIME,
            timestamp: Utc::now(),
        })
    }

    async fn traffic_data(&self, range: TimeRange) -> Result<Vec<TrafficPoint>, SourceError> {
        self.round_trip(TRAFFIC_LATENCY, "traffic data").await?;
        self.traffic_series(range, Utc::now())
    }

    async fn geographic_stats(
        &self,
        _range: TimeRange,
    ) -> Result<Vec<GeographicStats>, SourceError> {
        self.round_trip(REGIONS_LATENCY, "geographic stats").await?;
        Ok(Self::fixture_regions())
    }

    async fn random_status_update(&self) -> Result<NodeStatusUpdate, SourceError> {
        self.round_trip(STATUS_LATENCY, "status update").await?;
        let (index, status, response_time_ms) = self.with_rng(|rng| {
            let index = rng.random_range(0..NODES.len());
            let status = UPDATE_STATUSES[rng.random_range(0..UPDATE_STATUSES.len())];
            let rt = match status {
                NodeStatus::Healthy => rng.random_range(20..70),
                NodeStatus::Warning => rng.random_range(60..160),
                NodeStatus::Error | NodeStatus::Offline => rng.random_range(120..320),
            };
            (index, status, rt)
        });
        Ok(NodeStatusUpdate {
            node_id: NodeId::from(NODES[index].0),
            status,
            response_time_ms,
        })
    }
}

#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale_rounded(value: u64, multiplier: f64) -> u64 {
    (value as f64 * multiplier).round() as u64
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn instant() -> MockDataSource {
        MockDataSource::new(MockConfig::instant(7))
    }

    #[tokio::test]
    async fn serves_the_six_node_fleet() {
        let nodes = instant().edge_nodes().await.expect("nodes");
        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes[0].location, "New York");
        assert_eq!(nodes[3].status, NodeStatus::Error);
        assert_eq!(nodes[3].response_time_ms, 156);
        let healthy = nodes.iter().filter(|n| n.status.is_healthy()).count();
        assert_eq!(healthy, 4);
    }

    #[tokio::test]
    async fn metrics_scale_with_range() {
        let source = instant();
        let day = source.metrics(TimeRange::TwentyFourHours).await.expect("metrics");
        assert_eq!(day.total_requests, 355_000);
        assert_eq!(day.bandwidth_used, 4_240);

        let hour = source.metrics(TimeRange::OneHour).await.expect("metrics");
        assert_eq!(hour.total_requests, 14_910);
        assert_eq!(hour.bandwidth_used, 178);
        assert_eq!(hour.peak_rps, 8_900);

        let month = source.metrics(TimeRange::ThirtyDays).await.expect("metrics");
        assert_eq!(month.total_requests, 10_650_000);
    }

    #[tokio::test]
    async fn traffic_is_ascending_and_bounded() {
        let source = instant();
        for range in TimeRange::ALL {
            let series = source.traffic_data(range).await.expect("traffic");
            assert_eq!(series.len(), range.data_points());
            assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            for p in &series {
                assert!((8_000..13_000).contains(&p.requests));
                assert!((150..350).contains(&p.bandwidth));
                assert!((5..55).contains(&p.errors));
            }
        }
    }

    #[tokio::test]
    async fn seeded_sources_agree() {
        let a = instant().traffic_data(TimeRange::OneHour).await.expect("traffic");
        let b = instant().traffic_data(TimeRange::OneHour).await.expect("traffic");
        let requests = |s: &[TrafficPoint]| s.iter().map(|p| p.requests).collect::<Vec<_>>();
        assert_eq!(requests(&a), requests(&b));
    }

    #[tokio::test]
    async fn status_updates_stay_in_band() {
        let source = instant();
        for _ in 0..200 {
            let update = source.random_status_update().await.expect("update");
            assert!(NODES.iter().any(|n| n.0 == update.node_id.as_str()));
            let band = match update.status {
                NodeStatus::Healthy => 20..70,
                NodeStatus::Warning => 60..160,
                NodeStatus::Error => 120..320,
                NodeStatus::Offline => panic!("offline is never reported"),
            };
            assert!(band.contains(&update.response_time_ms));
        }
    }

    #[tokio::test]
    async fn full_failure_rate_always_fails() {
        let source = MockDataSource::new(MockConfig {
            failure_rate: 1.0,
            ..MockConfig::instant(1)
        });
        let err = source.metrics(TimeRange::OneHour).await.expect_err("must fail");
        assert_eq!(err.message, "Failed to load metrics");
        assert!(source.edge_nodes().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated_and_scaled() {
        let source = MockDataSource::new(MockConfig {
            latency_scale: 1.0,
            ..MockConfig::instant(3)
        });
        let started = tokio::time::Instant::now();
        source.edge_nodes().await.expect("nodes");
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(510));

        let source = MockDataSource::new(MockConfig {
            latency_scale: 2.0,
            ..MockConfig::instant(3)
        });
        let started = tokio::time::Instant::now();
        source.random_status_update().await.expect("update");
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200) && elapsed < Duration::from_millis(210));
    }

    #[tokio::test]
    async fn unrepresentable_latency_is_an_error() {
        for latency_scale in [1e300, f64::INFINITY] {
            let source = MockDataSource::new(MockConfig {
                latency_scale,
                ..MockConfig::instant(3)
            });
            let err = source.metrics(TimeRange::OneHour).await.expect_err("must fail");
            assert!(err.message.starts_with("Invalid latency for metrics"), "{}", err.message);
        }
    }
}
