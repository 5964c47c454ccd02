use serde::{Deserialize, Serialize};

use super::item::Item;

/// Summary of the entire tracked inventory at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Date this summary was computed for
    pub as_of: chrono::DateTime<chrono::Utc>,

    /// Total number of holdings tracked
    pub total_holdings: usize,

    /// Total copies held across all items
    pub total_quantity: u32,

    /// Current portfolio worth: Σ quantity × reconciled latest price
    pub total_value: f64,

    /// Sum of recorded purchase costs (quantity × buy_price where known)
    pub total_invested: f64,

    /// Absolute gain/loss over holdings with a recorded buy price
    pub total_gain_loss: f64,

    /// Percentage return: (total_gain_loss / total_invested) * 100
    pub total_return_pct: f64,

    /// Per-item breakdown, sorted by allocation (largest first)
    pub positions: Vec<PositionSummary>,
}

/// Summary of a single held item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSummary {
    /// The item
    pub item: Item,

    /// Copies held
    pub quantity: u32,

    /// Reconciled latest price per copy
    pub latest_price: f64,

    /// quantity × latest_price
    pub current_value: f64,

    /// Recorded purchase cost (quantity × buy_price), if known
    pub invested: Option<f64>,

    /// Absolute gain/loss vs. the recorded purchase, if known
    pub gain_loss: Option<f64>,

    /// Percentage return vs. the recorded purchase, if known
    pub return_pct: Option<f64>,

    /// This position's value / total portfolio value × 100
    pub allocation_pct: f64,
}

/// Percentage change of a price series over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Window length in days
    pub window_days: i64,

    /// (end - start) / start × 100 over the gap-filled series
    pub change_pct: f64,

    /// Price at the window start
    pub start_price: f64,

    /// Price at the window end
    pub end_price: f64,
}
