//! Screen implementations. Each screen is a top-level [`Component`](crate::component::Component).

pub mod dashboard;

pub use dashboard::DashboardScreen;
