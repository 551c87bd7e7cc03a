// ── Aggregation window ──

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Aggregation window for time-windowed loads (metrics, traffic, regions).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    #[strum(serialize = "6h")]
    SixHours,
    #[default]
    #[serde(rename = "24h")]
    #[strum(serialize = "24h")]
    TwentyFourHours,
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    ThirtyDays,
}

impl TimeRange {
    /// All ranges in selector order.
    pub const ALL: [TimeRange; 5] = [
        Self::OneHour,
        Self::SixHours,
        Self::TwentyFourHours,
        Self::SevenDays,
        Self::ThirtyDays,
    ];

    /// Short token (`"1h"`, `"24h"`, ...).
    pub fn token(self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::TwentyFourHours => "24h",
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
        }
    }

    /// Position in [`ALL`](Self::ALL), for tab bars.
    pub fn index(self) -> usize {
        match self {
            Self::OneHour => 0,
            Self::SixHours => 1,
            Self::TwentyFourHours => 2,
            Self::SevenDays => 3,
            Self::ThirtyDays => 4,
        }
    }

    /// Volume scaling relative to the 24h baseline.
    pub fn request_multiplier(self) -> f64 {
        match self {
            Self::OneHour => 0.042,
            Self::SixHours => 0.25,
            Self::TwentyFourHours => 1.0,
            Self::SevenDays => 7.0,
            Self::ThirtyDays => 30.0,
        }
    }

    /// Number of samples in a traffic series for this range.
    pub fn data_points(self) -> usize {
        match self {
            Self::OneHour => 12,
            Self::SixHours => 36,
            Self::TwentyFourHours => 48,
            Self::SevenDays => 168,
            Self::ThirtyDays => 120,
        }
    }

    /// Spacing between consecutive traffic samples.
    pub fn sample_interval(self) -> Duration {
        const MINUTE: u64 = 60;
        const HOUR: u64 = 60 * MINUTE;
        Duration::from_secs(match self {
            Self::OneHour => 5 * MINUTE,
            Self::SixHours => 10 * MINUTE,
            Self::TwentyFourHours => 30 * MINUTE,
            Self::SevenDays => HOUR,
            Self::ThirtyDays => 6 * HOUR,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_the_five_tokens() {
        for range in TimeRange::ALL {
            assert_eq!(range.token().parse::<TimeRange>().ok(), Some(range));
            assert_eq!(range.to_string(), range.token());
        }
        assert!("2h".parse::<TimeRange>().is_err());
        assert!("".parse::<TimeRange>().is_err());
    }

    #[test]
    fn default_is_24h() {
        assert_eq!(TimeRange::default(), TimeRange::TwentyFourHours);
    }

    #[test]
    fn serde_uses_tokens() {
        let json = serde_json::to_string(&TimeRange::SevenDays).expect("serialize");
        assert_eq!(json, "\"7d\"");
        let back: TimeRange = serde_json::from_str("\"30d\"").expect("deserialize");
        assert_eq!(back, TimeRange::ThirtyDays);
        assert!(serde_json::from_str::<TimeRange>("\"12h\"").is_err());
    }

    #[test]
    fn series_spans_cover_the_window() {
        assert_eq!(TimeRange::OneHour.data_points(), 12);
        assert_eq!(TimeRange::OneHour.sample_interval(), Duration::from_secs(300));
        assert_eq!(TimeRange::ThirtyDays.data_points(), 120);
        assert_eq!(
            TimeRange::ThirtyDays.sample_interval(),
            Duration::from_secs(6 * 3600)
        );
    }

    #[test]
    fn index_matches_all_order() {
        for (i, range) in TimeRange::ALL.into_iter().enumerate() {
            assert_eq!(range.index(), i);
        }
    }
}
