use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::models::item::Inventory;
use crate::models::price::{PriceCache, PriceObservation};
use crate::models::series::{DenseSeriesPoint, PortfolioPoint};
use crate::series;

/// Generates chart-ready series from raw observations and cached history.
///
/// The core computes all the numbers — the frontend only renders.
/// Everything flows through the series engine: daily aggregation, gap
/// filling to `now`, and quantity-weighted portfolio summation.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Dense daily chart for a single item: aggregate raw observations into
    /// day buckets, then gap-fill from `backfill_from` (or the first
    /// observation) through `now`.
    pub fn item_chart(
        &self,
        observations: &[PriceObservation],
        backfill_from: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Vec<DenseSeriesPoint> {
        let buckets = series::aggregate_daily(observations);
        let points = series::bucket_series(&buckets);
        series::fill_gaps(&points, backfill_from, now)
    }

    /// Dense daily chart for a single item from its cached official history.
    pub fn item_chart_from_cache(
        &self,
        cache: &PriceCache,
        market_hash_name: &str,
        backfill_from: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Vec<DenseSeriesPoint> {
        let points = Self::cached_series(cache, market_hash_name);
        series::fill_gaps(&points, backfill_from, now)
    }

    /// Portfolio-value chart: one gap-filled series per holding, summed per
    /// day weighted by held quantity. Output is ascending by day — the one
    /// canonical order every consumer gets.
    pub fn portfolio_chart(
        &self,
        inventory: &Inventory,
        cache: &PriceCache,
        backfill_from: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Vec<PortfolioPoint> {
        let weighted: Vec<(f64, Vec<DenseSeriesPoint>)> = inventory
            .holdings
            .iter()
            .map(|holding| {
                let points = Self::cached_series(cache, &holding.item.market_hash_name);
                let dense = series::fill_gaps(&points, backfill_from, now);
                (f64::from(holding.quantity), dense)
            })
            .collect();

        let chart = series::aggregate_portfolio(&weighted);

        // Gap-filled inputs should make every day a full hit; a shortfall
        // means some holding had no cached history at all.
        if let Some(low) = chart.iter().find(|p| (p.hits as usize) < weighted.len()) {
            debug!(
                day_epoch = low.day_epoch,
                hits = low.hits,
                holdings = weighted.len(),
                "portfolio chart day missing item series"
            );
        }

        chart
    }

    /// Chart-axis tick marks for a range (day/month/year granularity by
    /// span). Missing bounds mean "no axis decoration".
    pub fn axis_ticks(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Vec<i64> {
        series::axis_epochs(from, to)
    }

    /// Cached official history for an item as an ascending day series.
    /// The cache keeps history date-sorted, so no re-sort is needed.
    fn cached_series(cache: &PriceCache, market_hash_name: &str) -> Vec<DenseSeriesPoint> {
        cache
            .history
            .get(market_hash_name)
            .map(|points| {
                points
                    .iter()
                    .map(|p| DenseSeriesPoint {
                        day_epoch: series::day_epoch_of(p.date),
                        price: p.price,
                        volume: p.volume,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
