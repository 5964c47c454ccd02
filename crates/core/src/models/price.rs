use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One raw market sample for an item: a timestamped price with the volume
/// traded. Multiple observations may land on the same calendar day; the
/// daily aggregator folds them into one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: DateTime<Utc>,
    pub price: f64,
    pub volume: f64,
}

/// A single daily price data point (date → price/volume).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: f64,
}

/// A timestamped single-price reading from one source, used by the
/// latest-price reconciler. The official history head and the quick
/// market-API read both arrive in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub date: DateTime<Utc>,
    pub price: f64,
}

/// Local cache of per-item price data.
///
/// Two independently-updating layers per item:
/// - **History**: the slow official daily price history, fetched in bulk and
///   kept sorted by date for binary-search lookups.
/// - **Quick snapshot**: the most recent fast market-API read (price
///   overview). Fresher than the history head on most days.
///
/// The latest-price reconciler picks whichever of the two is newer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceCache {
    /// Official daily history: market_hash_name → sorted Vec of PricePoints
    pub history: HashMap<String, Vec<PricePoint>>,

    /// Fast market-API reads: market_hash_name → most recent snapshot
    pub quick: HashMap<String, PriceSnapshot>,

    /// Tracks when the quick snapshot was last refreshed per item.
    /// Used to avoid redundant API calls within the same day.
    pub last_updated: HashMap<String, NaiveDate>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached history price for a specific (item, date).
    /// Returns None if not cached. Uses binary search (O(log n)).
    pub fn get_price(&self, item: &str, date: NaiveDate) -> Option<f64> {
        let entries = self.history.get(item)?;
        entries
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| entries[idx].price)
    }

    /// Insert or update a daily history point for an item.
    /// Maintains sorted order by date using binary search (O(log n) insertion).
    pub fn set_price(&mut self, item: &str, point: PricePoint) {
        let entries = self.history.entry(item.to_string()).or_default();

        match entries.binary_search_by_key(&point.date, |p| p.date) {
            Ok(idx) => {
                entries[idx] = point;
            }
            Err(idx) => {
                entries.insert(idx, point);
            }
        }
    }

    /// Insert multiple history points at once (e.g., from a full
    /// pricehistory API call).
    pub fn set_prices(&mut self, item: &str, points: &[PricePoint]) {
        for point in points {
            self.set_price(item, point.clone());
        }
    }

    /// The most recent point in the official history for an item, as a
    /// reconciler-ready snapshot (dated at that day's UTC midnight).
    pub fn history_head(&self, item: &str) -> Option<PriceSnapshot> {
        let last = self.history.get(item)?.last()?;
        Some(PriceSnapshot {
            date: last.date.and_time(chrono::NaiveTime::MIN).and_utc(),
            price: last.price,
        })
    }

    /// The cached fast market-API snapshot for an item, if any.
    pub fn quick_snapshot(&self, item: &str) -> Option<&PriceSnapshot> {
        self.quick.get(item)
    }

    /// Store a fast market-API snapshot for an item.
    pub fn set_quick_snapshot(&mut self, item: &str, snapshot: PriceSnapshot) {
        self.quick.insert(item.to_string(), snapshot);
    }

    /// Check if the quick snapshot was already refreshed today
    /// (avoid redundant API calls).
    pub fn is_today_fresh(&self, item: &str, today: NaiveDate) -> bool {
        self.last_updated.get(item).is_some_and(|&d| d == today)
    }

    /// Mark that we've refreshed the quick snapshot for this item today.
    pub fn mark_updated_today(&mut self, item: &str, today: NaiveDate) {
        self.last_updated.insert(item.to_string(), today);
    }

    /// Get all cached history points for an item in a date range (inclusive).
    /// Uses binary search to find the range boundaries.
    pub fn get_price_range(&self, item: &str, from: NaiveDate, to: NaiveDate) -> Vec<PricePoint> {
        self.history
            .get(item)
            .map(|entries| {
                let start = entries
                    .binary_search_by_key(&from, |p| p.date)
                    .unwrap_or_else(|pos| pos);
                let end = entries
                    .binary_search_by_key(&to, |p| p.date)
                    .map(|pos| pos + 1) // include the exact match
                    .unwrap_or_else(|pos| pos);
                entries[start..end].to_vec()
            })
            .unwrap_or_default()
    }

    /// Total number of cached history points across all items.
    pub fn total_entries(&self) -> usize {
        self.history.values().map(|v| v.len()).sum()
    }

    /// Number of distinct items with cached history.
    pub fn item_count(&self) -> usize {
        self.history.len()
    }

    /// Remove all cached history points older than `before`.
    /// Returns the number of entries removed.
    pub fn prune_before(&mut self, before: NaiveDate) -> usize {
        let mut removed = 0;
        for entries in self.history.values_mut() {
            let old_len = entries.len();
            let split = entries
                .binary_search_by_key(&before, |p| p.date)
                .unwrap_or_else(|pos| pos);
            if split > 0 {
                entries.drain(..split);
                removed += old_len - entries.len();
            }
        }
        self.history.retain(|_, v| !v.is_empty());
        self.last_updated
            .retain(|key, updated| self.history.contains_key(key) && *updated >= before);
        removed
    }

    /// Clear all cached data.
    pub fn clear(&mut self) {
        self.history.clear();
        self.quick.clear();
        self.last_updated.clear();
    }
}
