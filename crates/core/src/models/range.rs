use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Chart range selector, as picked in the UI. Translated into concrete
/// from/to bounds before any series code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartRange {
    /// Trailing 7 days
    Week,
    /// Trailing 30 days
    Month,
    /// Trailing 365 days
    Year,
    /// Everything since the portfolio's first data point
    All,
}

impl ChartRange {
    /// Resolve the selector into `(from, to)` bounds ending at `now`.
    ///
    /// `All` is anchored at `inception` (earliest acquisition or price
    /// point); with no inception known it returns `None` for `from`, which
    /// downstream treats as "start at the first available observation".
    pub fn bounds(
        &self,
        now: DateTime<Utc>,
        inception: Option<DateTime<Utc>>,
    ) -> (Option<DateTime<Utc>>, DateTime<Utc>) {
        let from = match self {
            ChartRange::Week => Some(now - Duration::days(7)),
            ChartRange::Month => Some(now - Duration::days(30)),
            ChartRange::Year => Some(now - Duration::days(365)),
            ChartRange::All => inception,
        };
        (from, now)
    }
}

impl std::fmt::Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartRange::Week => write!(f, "Week"),
            ChartRange::Month => write!(f, "Month"),
            ChartRange::Year => write!(f, "Year"),
            ChartRange::All => write!(f, "All"),
        }
    }
}
