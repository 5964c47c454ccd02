use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// Trait abstraction for market-data sources.
///
/// The Steam Community Market is the production implementation; tests plug
/// in a mock. If the market API changes, only that one implementation moves
/// — the rest of the codebase is untouched.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// The current (fast, possibly intra-day) price of an item.
    async fn get_current_price(&self, market_hash_name: &str) -> Result<f64, CoreError>;

    /// The official daily price/volume history of an item, sorted by date.
    async fn get_price_history(&self, market_hash_name: &str)
        -> Result<Vec<PricePoint>, CoreError>;
}
