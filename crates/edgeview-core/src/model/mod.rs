// ── Domain model ──
//
// Canonical types for everything the dashboard displays. Field names
// serialize in camelCase so JSON output keeps the shape dashboard API
// consumers expect.

pub mod geo;
pub mod metrics;
pub mod node;
pub mod time_range;
pub mod traffic;

pub use geo::GeographicStats;
pub use metrics::{Metrics, MetricsPatch};
pub use node::{Coordinates, EdgeNode, NodeId, NodeStatus, NodeStatusUpdate};
pub use time_range::TimeRange;
pub use traffic::TrafficPoint;
