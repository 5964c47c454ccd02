use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::price::{PriceCache, PriceSnapshot};
use crate::providers::traits::MarketDataProvider;
use crate::series;

/// Fetches market prices through a provider and keeps the cache current.
///
/// Two feeds per item, updating independently:
/// - **Official history** (`pricehistory`): slow, daily granularity, fetched
///   in bulk and cached. Past days don't change.
/// - **Quick snapshot** (`priceoverview`): fast single read, refreshed at
///   most once per day unless forced.
///
/// "Current price" reconciles the two by recency — see
/// [`series::latest_price`].
///
/// **Note on precision**: prices are `f64` (~15-17 significant digits);
/// sufficient for market prices, but repeated arithmetic can accumulate
/// small floating-point errors.
pub struct PriceService {
    provider: Box<dyn MarketDataProvider>,
}

impl PriceService {
    pub fn new(provider: Box<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the full official price history for an item and merge it into
    /// the cache. Returns the number of points fetched.
    pub async fn refresh_history(
        &self,
        cache: &mut PriceCache,
        market_hash_name: &str,
    ) -> Result<usize, CoreError> {
        let points = self.provider.get_price_history(market_hash_name).await?;

        for point in &points {
            if !point.price.is_finite() || point.price < 0.0 {
                return Err(CoreError::Api {
                    provider: self.provider.name().to_string(),
                    message: format!(
                        "Invalid history price for {market_hash_name}: {} (must be finite and non-negative)",
                        point.price
                    ),
                });
            }
        }

        debug!(
            item = market_hash_name,
            points = points.len(),
            provider = self.provider.name(),
            "refreshed official price history"
        );
        cache.set_prices(market_hash_name, &points);
        Ok(points.len())
    }

    /// Refresh the quick market snapshot for an item.
    ///
    /// Skipped (returning the cached value) when already refreshed today,
    /// unless `force` is set. Returns the snapshot price.
    pub async fn refresh_quick(
        &self,
        cache: &mut PriceCache,
        market_hash_name: &str,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<f64, CoreError> {
        let today = now.date_naive();

        if !force && cache.is_today_fresh(market_hash_name, today) {
            if let Some(snapshot) = cache.quick_snapshot(market_hash_name) {
                return Ok(snapshot.price);
            }
        }

        let price = self.provider.get_current_price(market_hash_name).await?;
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::Api {
                provider: self.provider.name().to_string(),
                message: format!(
                    "Invalid price returned for {market_hash_name}: {price} (must be finite and non-negative)"
                ),
            });
        }

        cache.set_quick_snapshot(market_hash_name, PriceSnapshot { date: now, price });
        cache.mark_updated_today(market_hash_name, today);
        Ok(price)
    }

    /// The single "current price" for an item: the fresher of the official
    /// history head and the quick snapshot. Purely cache-based — no network.
    /// Returns 0.0 when neither source has data.
    pub fn current_price(&self, cache: &PriceCache, market_hash_name: &str) -> f64 {
        let official = cache.history_head(market_hash_name);
        let cached = cache.quick_snapshot(market_hash_name);

        if official.is_none() && cached.is_none() {
            warn!(item = market_hash_name, "no price data from either source");
        }

        series::latest_price(official.as_ref(), cached)
    }

    /// Provider name, for logs and error messages.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
