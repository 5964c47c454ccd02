pub mod errors;
pub mod models;
pub mod providers;
pub mod series;
pub mod services;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use errors::CoreError;
use models::{
    analytics::{PortfolioSummary, Trend},
    item::{Holding, Inventory, Item},
    price::{PriceCache, PricePoint},
    range::ChartRange,
    series::{DenseSeriesPoint, PortfolioPoint},
};
use providers::{steam_market::SteamMarketProvider, traits::MarketDataProvider};
use services::{
    analytics_service::AnalyticsService, chart_service::ChartService,
    portfolio_service::PortfolioService, price_service::PriceService,
};

/// Maximum chart date range in days (10 years).
const MAX_CHART_RANGE_DAYS: i64 = 3650;

/// Default trend window in days.
const DEFAULT_TREND_WINDOW_DAYS: i64 = 7;

/// Main entry point for the SkinFolio core library.
/// Holds the tracked inventory, the price cache, and all services.
#[must_use]
pub struct SkinFolio {
    inventory: Inventory,
    price_cache: PriceCache,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    chart_service: ChartService,
    analytics_service: AnalyticsService,
}

impl std::fmt::Debug for SkinFolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkinFolio")
            .field("holdings", &self.inventory.holdings.len())
            .field("cached_prices", &self.price_cache.total_entries())
            .field("provider", &self.price_service.provider_name())
            .finish()
    }
}

impl SkinFolio {
    /// Create an empty tracker backed by the Steam Community Market.
    pub fn new() -> Self {
        Self::with_provider(Box::new(SteamMarketProvider::new()))
    }

    /// Create an empty tracker with a custom market-data provider
    /// (tests plug in mocks here).
    pub fn with_provider(provider: Box<dyn MarketDataProvider>) -> Self {
        Self {
            inventory: Inventory::default(),
            price_cache: PriceCache::new(),
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(provider),
            chart_service: ChartService::new(),
            analytics_service: AnalyticsService::new(),
        }
    }

    // ── Inventory Management ────────────────────────────────────────

    /// Track a new holding. Returns its id.
    pub fn add_holding(&mut self, item: Item, quantity: u32) -> Result<Uuid, CoreError> {
        let holding = Holding::new(item, quantity);
        let id = holding.id;
        self.portfolio_service.add_holding(&mut self.inventory, holding)?;
        Ok(id)
    }

    /// Track a new holding with its recorded purchase. Returns its id.
    pub fn add_holding_with_purchase(
        &mut self,
        item: Item,
        quantity: u32,
        buy_price: f64,
        acquired: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let holding = Holding::with_purchase(item, quantity, buy_price, acquired);
        let id = holding.id;
        self.portfolio_service.add_holding(&mut self.inventory, holding)?;
        Ok(id)
    }

    /// Stop tracking a holding. Returns the removed holding.
    pub fn remove_holding(&mut self, id: Uuid) -> Result<Holding, CoreError> {
        self.portfolio_service.remove_holding(&mut self.inventory, id)
    }

    /// Change the quantity of a tracked holding.
    pub fn set_quantity(&mut self, id: Uuid, quantity: u32) -> Result<(), CoreError> {
        self.portfolio_service
            .set_quantity(&mut self.inventory, id, quantity)
    }

    /// Set or clear the recorded purchase on a tracked holding.
    pub fn set_purchase(
        &mut self,
        id: Uuid,
        buy_price: Option<f64>,
        acquired: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .set_purchase(&mut self.inventory, id, buy_price, acquired)
    }

    /// Get a single holding by id.
    #[must_use]
    pub fn get_holding(&self, id: Uuid) -> Option<&Holding> {
        self.inventory.holdings.iter().find(|h| h.id == id)
    }

    /// All tracked holdings, in insertion order.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.inventory.holdings
    }

    /// All distinct tracked items, sorted by market hash name.
    #[must_use]
    pub fn unique_items(&self) -> Vec<&Item> {
        self.portfolio_service.unique_items(&self.inventory)
    }

    /// Total copies held of an item across all lots.
    #[must_use]
    pub fn quantity_of(&self, item: &Item) -> u32 {
        self.portfolio_service.quantity_of(&self.inventory, item)
    }

    /// Earliest recorded acquisition date across holdings.
    #[must_use]
    pub fn inception_date(&self) -> Option<NaiveDate> {
        self.portfolio_service.inception(&self.inventory)
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Refresh official history and quick snapshots for every tracked item.
    pub async fn refresh_prices(&mut self) -> Result<(), CoreError> {
        let now = Utc::now();
        let items: Vec<String> = self
            .unique_items()
            .iter()
            .map(|i| i.market_hash_name.clone())
            .collect();

        for name in items {
            self.price_service
                .refresh_history(&mut self.price_cache, &name)
                .await?;
            self.price_service
                .refresh_quick(&mut self.price_cache, &name, now, false)
                .await?;
        }

        Ok(())
    }

    /// The reconciled current price of an item (fresher of official history
    /// head and quick snapshot). 0.0 when nothing is cached.
    #[must_use]
    pub fn latest_price(&self, item: &Item) -> f64 {
        self.price_service
            .current_price(&self.price_cache, &item.market_hash_name)
    }

    /// Total portfolio worth at reconciled current prices.
    #[must_use]
    pub fn portfolio_worth(&self) -> f64 {
        self.inventory
            .holdings
            .iter()
            .map(|h| {
                f64::from(h.quantity)
                    * self
                        .price_service
                        .current_price(&self.price_cache, &h.item.market_hash_name)
            })
            .sum()
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Portfolio-value chart for a UI range selector, ending at `now`.
    /// Ascending by day.
    #[must_use]
    pub fn portfolio_chart(&self, range: ChartRange, now: DateTime<Utc>) -> Vec<PortfolioPoint> {
        let inception = self
            .inception_date()
            .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc());
        let (from, to) = range.bounds(now, inception);
        self.chart_service.portfolio_chart(
            &self.inventory,
            &self.price_cache,
            from.map(|f| f.date_naive()),
            to,
        )
    }

    /// Portfolio-value chart over explicit bounds. Rejects inverted or
    /// oversized ranges up front.
    pub fn portfolio_chart_between(
        &self,
        from: NaiveDate,
        to: DateTime<Utc>,
    ) -> Result<Vec<PortfolioPoint>, CoreError> {
        Self::validate_range(from, to)?;
        Ok(self
            .chart_service
            .portfolio_chart(&self.inventory, &self.price_cache, Some(from), to))
    }

    /// Dense daily price chart for one item from cached history, for a UI
    /// range selector ending at `now`.
    #[must_use]
    pub fn item_chart(
        &self,
        item: &Item,
        range: ChartRange,
        now: DateTime<Utc>,
    ) -> Vec<DenseSeriesPoint> {
        let (from, to) = range.bounds(now, None);
        self.chart_service.item_chart_from_cache(
            &self.price_cache,
            &item.market_hash_name,
            from.map(|f| f.date_naive()),
            to,
        )
    }

    /// Dense daily price chart for one item over explicit bounds.
    pub fn item_chart_between(
        &self,
        item: &Item,
        from: NaiveDate,
        to: DateTime<Utc>,
    ) -> Result<Vec<DenseSeriesPoint>, CoreError> {
        Self::validate_range(from, to)?;
        Ok(self.chart_service.item_chart_from_cache(
            &self.price_cache,
            &item.market_hash_name,
            Some(from),
            to,
        ))
    }

    /// Chart-axis tick marks for a range (see [`series::axis_epochs`]).
    #[must_use]
    pub fn axis_ticks(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Vec<i64> {
        self.chart_service.axis_ticks(from, to)
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Full portfolio summary at `now`: worth, gain/loss, allocation.
    #[must_use]
    pub fn portfolio_summary(&self, now: DateTime<Utc>) -> PortfolioSummary {
        self.analytics_service
            .portfolio_summary(&self.inventory, &self.price_cache, now)
    }

    /// 7-day price trend for one item, computed off its gap-filled series.
    #[must_use]
    pub fn item_trend(&self, item: &Item, now: DateTime<Utc>) -> Option<Trend> {
        self.item_trend_over(item, DEFAULT_TREND_WINDOW_DAYS, now)
    }

    /// Price trend for one item over an arbitrary trailing window.
    #[must_use]
    pub fn item_trend_over(
        &self,
        item: &Item,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Option<Trend> {
        let dense = self.chart_service.item_chart_from_cache(
            &self.price_cache,
            &item.market_hash_name,
            None,
            now,
        );
        self.analytics_service.trend(&dense, window_days)
    }

    // ── Cache Management ────────────────────────────────────────────

    /// Total number of cached history points.
    #[must_use]
    pub fn cache_total_entries(&self) -> usize {
        self.price_cache.total_entries()
    }

    /// Number of distinct items with cached history.
    #[must_use]
    pub fn cache_item_count(&self) -> usize {
        self.price_cache.item_count()
    }

    /// Remove all cached history points older than `before`.
    /// Returns the number of entries removed.
    pub fn cache_prune_before(&mut self, before: NaiveDate) -> usize {
        self.price_cache.prune_before(before)
    }

    /// Clear all cached price data.
    pub fn cache_clear(&mut self) {
        self.price_cache.clear();
    }

    /// Get a specific cached history price.
    #[must_use]
    pub fn get_cached_price(&self, item: &Item, date: NaiveDate) -> Option<f64> {
        self.price_cache.get_price(&item.market_hash_name, date)
    }

    /// Manually insert a history point into the cache (useful for tests,
    /// offline use, or historical import).
    pub fn set_cached_price(&mut self, item: &Item, point: PricePoint) {
        self.price_cache.set_price(&item.market_hash_name, point);
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all holdings as a JSON string.
    pub fn export_holdings_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.inventory.holdings)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize holdings: {e}")))
    }

    /// Import holdings from a JSON string. Each holding is validated;
    /// on any failure nothing is imported. Returns the number imported.
    pub fn import_holdings_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let holdings: Vec<Holding> = serde_json::from_str(json)?;
        let count = holdings.len();

        // Validate all against a scratch inventory before committing
        let mut staged = self.inventory.clone();
        for holding in holdings {
            self.portfolio_service.add_holding(&mut staged, holding)?;
        }
        self.inventory = staged;
        Ok(count)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn validate_range(from: NaiveDate, to: DateTime<Utc>) -> Result<(), CoreError> {
        let to_date = to.date_naive();
        if from > to_date {
            return Err(CoreError::ValidationError(format!(
                "'from' date ({from}) must not be after 'to' date ({to_date})"
            )));
        }
        let range_days = (to_date - from).num_days();
        if range_days > MAX_CHART_RANGE_DAYS {
            return Err(CoreError::ValidationError(format!(
                "Chart range of {range_days} days exceeds maximum of {MAX_CHART_RANGE_DAYS} days (10 years)"
            )));
        }
        Ok(())
    }
}

impl Default for SkinFolio {
    fn default() -> Self {
        Self::new()
    }
}
