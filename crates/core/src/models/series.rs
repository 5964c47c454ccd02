use serde::{Deserialize, Serialize};

/// Accumulator for one calendar day of raw observations.
///
/// `price` is always the arithmetic mean of every sample folded in that day
/// (not the latest or the max). That smoothing is deliberate and load-bearing
/// for historical chart compatibility; `volume` is the plain sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Day-epoch key: milliseconds of the day's UTC midnight
    pub day_epoch: i64,

    /// How many raw samples landed in this bucket
    pub sample_count: u32,

    /// Running sum of sample prices (mean numerator)
    pub sum_price: f64,

    /// Running mean price: sum_price / sample_count
    pub price: f64,

    /// Summed volume across the day's samples
    pub volume: f64,
}

/// One entry of a dense, gap-filled daily series: exactly one per calendar
/// day in the requested range, strictly ascending, no duplicate days.
/// Days before the first observation are zero-filled; days after it carry
/// the last observed price forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSeriesPoint {
    /// Day-epoch key: milliseconds of the day's UTC midnight
    pub day_epoch: i64,

    pub price: f64,

    pub volume: f64,
}

/// One day of the aggregated portfolio-value series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    /// Day-epoch key: milliseconds of the day's UTC midnight
    pub day_epoch: i64,

    /// Σ quantity × item price for the day
    pub value: f64,

    /// How many item series contributed to this day. Diagnostic only —
    /// never part of the weighted sum.
    pub hits: u32,
}
