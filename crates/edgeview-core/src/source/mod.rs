// ── Data source abstraction ──
//
// The pipeline consumes data through `DataSource`. Every operation is
// asynchronous and may fail; the effect coordinator maps failures to
// failure actions and never lets them escape.

mod mock;

use std::future::Future;

use thiserror::Error;

use crate::model::{EdgeNode, GeographicStats, Metrics, NodeStatusUpdate, TimeRange, TrafficPoint};

pub use mock::MockDataSource;

/// A load failure, carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Read operations the dashboard needs from a backend.
///
/// Futures must be `Send` so the effect coordinator can spawn them.
pub trait DataSource: Send + Sync + 'static {
    fn edge_nodes(&self) -> impl Future<Output = Result<Vec<EdgeNode>, SourceError>> + Send;

    fn metrics(
        &self,
        range: TimeRange,
    ) -> impl Future<Output = Result<Metrics, SourceError>> + Send;

    fn traffic_data(
        &self,
        range: TimeRange,
    ) -> impl Future<Output = Result<Vec<TrafficPoint>, SourceError>> + Send;

    fn geographic_stats(
        &self,
        range: TimeRange,
    ) -> impl Future<Output = Result<Vec<GeographicStats>, SourceError>> + Send;

    /// A status change for one randomly chosen node.
    fn random_status_update(
        &self,
    ) -> impl Future<Output = Result<NodeStatusUpdate, SourceError>> + Send;
}
