// edgeview-core: State store, effect pipeline, and selectors for the
// edgeview edge-network dashboard. Consumed by the CLI and the TUI.
//
// Data flow: intent or timer -> `Action` -> `Store` queue -> `reduce` ->
// new snapshot published -> `EffectCoordinator` calls the `DataSource` ->
// result `Action` back onto the queue.

pub mod action;
pub mod config;
pub mod effects;
pub mod error;
pub mod model;
pub mod selectors;
pub mod source;
pub mod state;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{Action, LoadKind};
pub use config::{MockConfig, StoreConfig};
pub use effects::EffectCoordinator;
pub use error::CoreError;
pub use source::{DataSource, MockDataSource, SourceError};
pub use state::{reduce, DashboardState};
pub use store::Store;
pub use stream::StateStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Coordinates, EdgeNode, GeographicStats, Metrics, MetricsPatch, NodeId, NodeStatus,
    NodeStatusUpdate, TimeRange, TrafficPoint,
};
