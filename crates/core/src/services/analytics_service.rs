use chrono::{DateTime, Utc};

use crate::models::analytics::{PortfolioSummary, PositionSummary, Trend};
use crate::models::item::Inventory;
use crate::models::price::PriceCache;
use crate::models::series::DenseSeriesPoint;
use crate::series;

/// Computes valuation analytics: portfolio worth, gain/loss, allocation,
/// and price trends.
///
/// All figures use reconciled latest prices (official history head vs.
/// quick market snapshot, whichever is fresher). Purely cache-based.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Full portfolio summary at `now`.
    ///
    /// Computes:
    /// - Total current worth (Σ quantity × reconciled latest price)
    /// - Invested and gain/loss figures over holdings with a recorded buy price
    /// - Per-position breakdown with allocation percentages
    pub fn portfolio_summary(
        &self,
        inventory: &Inventory,
        cache: &PriceCache,
        now: DateTime<Utc>,
    ) -> PortfolioSummary {
        let mut positions = Vec::with_capacity(inventory.holdings.len());
        let mut total_value = 0.0;
        let mut total_invested = 0.0;
        let mut total_gain_loss = 0.0;
        let mut total_quantity = 0;

        for holding in &inventory.holdings {
            let latest = series::latest_price(
                cache.history_head(&holding.item.market_hash_name).as_ref(),
                cache.quick_snapshot(&holding.item.market_hash_name),
            );
            let quantity = f64::from(holding.quantity);
            let current_value = quantity * latest;

            let invested = holding.buy_price.map(|p| quantity * p);
            let gain_loss = invested.map(|inv| current_value - inv);
            let return_pct = invested.and_then(|inv| {
                gain_loss.map(|gl| if inv > 0.0 { (gl / inv) * 100.0 } else { 0.0 })
            });

            total_value += current_value;
            total_invested += invested.unwrap_or(0.0);
            // Only positions with a recorded cost basis enter the gain/loss
            // total; uncosted positions have no baseline to gain against.
            total_gain_loss += gain_loss.unwrap_or(0.0);
            total_quantity += holding.quantity;

            positions.push(PositionSummary {
                item: holding.item.clone(),
                quantity: holding.quantity,
                latest_price: latest,
                current_value,
                invested,
                gain_loss,
                return_pct,
                allocation_pct: 0.0, // filled below, once total_value is known
            });
        }

        for position in &mut positions {
            position.allocation_pct = if total_value > 0.0 {
                (position.current_value / total_value) * 100.0
            } else {
                0.0
            };
        }

        // Sort by allocation (largest first)
        positions.sort_by(|a, b| {
            b.allocation_pct
                .partial_cmp(&a.allocation_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_return_pct = if total_invested > 0.0 {
            (total_gain_loss / total_invested) * 100.0
        } else {
            0.0
        };

        PortfolioSummary {
            as_of: now,
            total_holdings: inventory.holdings.len(),
            total_quantity,
            total_value,
            total_invested,
            total_gain_loss,
            total_return_pct,
            positions,
        }
    }

    /// Percentage change over the trailing `window_days` of a dense series.
    ///
    /// Always runs on a gap-filled series, so the window has exactly one
    /// point per day and both endpoints exist whenever the series is long
    /// enough. Returns None for an empty series, a window no point reaches
    /// back into, or a non-positive start price (no meaningful baseline).
    pub fn trend(&self, dense: &[DenseSeriesPoint], window_days: i64) -> Option<Trend> {
        if window_days <= 0 {
            return None;
        }
        let end = dense.last()?;
        let start_idx = dense.len().checked_sub(window_days as usize + 1)?;
        let start = &dense[start_idx];

        if start.price <= 0.0 {
            return None;
        }

        Some(Trend {
            window_days,
            change_pct: (end.price - start.price) / start.price * 100.0,
            start_price: start.price,
            end_price: end.price,
        })
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
