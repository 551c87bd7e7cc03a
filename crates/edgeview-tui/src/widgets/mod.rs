pub mod fmt;
pub mod status_indicator;
