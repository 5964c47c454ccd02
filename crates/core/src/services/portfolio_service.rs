use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::item::{Holding, Inventory, Item};

/// Manages the tracked inventory (holdings CRUD).
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Add a new holding to the inventory.
    /// Validates the holding before adding; ids must be unique, since
    /// remove/update operations address holdings by id.
    pub fn add_holding(&self, inventory: &mut Inventory, holding: Holding) -> Result<(), CoreError> {
        Self::validate_holding(&holding)?;
        if inventory.holdings.iter().any(|h| h.id == holding.id) {
            return Err(CoreError::ValidationError(format!(
                "Holding id {} is already tracked",
                holding.id
            )));
        }
        inventory.holdings.push(holding);
        Ok(())
    }

    /// Remove a holding by its UUID.
    pub fn remove_holding(&self, inventory: &mut Inventory, id: Uuid) -> Result<Holding, CoreError> {
        let idx = inventory
            .holdings
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))?;
        Ok(inventory.holdings.remove(idx))
    }

    /// Change the quantity of an existing holding.
    pub fn set_quantity(
        &self,
        inventory: &mut Inventory,
        id: Uuid,
        quantity: u32,
    ) -> Result<(), CoreError> {
        if quantity == 0 {
            return Err(CoreError::ValidationError(
                "Holding quantity must be positive — remove the holding instead".into(),
            ));
        }
        let holding = inventory
            .holdings
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))?;
        holding.quantity = quantity;
        Ok(())
    }

    /// Set or clear the recorded purchase on an existing holding.
    pub fn set_purchase(
        &self,
        inventory: &mut Inventory,
        id: Uuid,
        buy_price: Option<f64>,
        acquired: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        if let Some(price) = buy_price {
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Buy price must be finite and non-negative, got {price}"
                )));
            }
        }
        let holding = inventory
            .holdings
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))?;
        holding.buy_price = buy_price;
        holding.acquired = acquired;
        Ok(())
    }

    /// All holdings of a given item (several lots of the same skin can be
    /// tracked separately with different buy prices).
    pub fn holdings_of<'a>(&self, inventory: &'a Inventory, item: &Item) -> Vec<&'a Holding> {
        inventory
            .holdings
            .iter()
            .filter(|h| &h.item == item)
            .collect()
    }

    /// Total copies held of a given item across all lots.
    pub fn quantity_of(&self, inventory: &Inventory, item: &Item) -> u32 {
        inventory
            .holdings
            .iter()
            .filter(|h| &h.item == item)
            .map(|h| h.quantity)
            .sum()
    }

    /// All distinct items in the inventory, sorted by market hash name.
    pub fn unique_items<'a>(&self, inventory: &'a Inventory) -> Vec<&'a Item> {
        let mut seen = std::collections::HashSet::new();
        let mut items: Vec<&Item> = inventory
            .holdings
            .iter()
            .filter_map(|h| {
                if seen.insert(&h.item.market_hash_name) {
                    Some(&h.item)
                } else {
                    None
                }
            })
            .collect();
        items.sort_by(|a, b| a.market_hash_name.cmp(&b.market_hash_name));
        items
    }

    /// The earliest recorded acquisition date, if any holding has one.
    pub fn inception(&self, inventory: &Inventory) -> Option<NaiveDate> {
        inventory.holdings.iter().filter_map(|h| h.acquired).min()
    }

    /// Validate a holding before it enters the inventory.
    ///
    /// Rules:
    /// - Quantity must be positive
    /// - Buy price (if recorded) must be finite and non-negative
    /// - Acquisition date (if recorded) must not be in the future
    ///   (+1 day tolerance for timezone differences)
    fn validate_holding(holding: &Holding) -> Result<(), CoreError> {
        if holding.quantity == 0 {
            return Err(CoreError::ValidationError(
                "Holding quantity must be positive".into(),
            ));
        }

        if let Some(price) = holding.buy_price {
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Buy price must be finite and non-negative, got {price}"
                )));
            }
        }

        if let Some(acquired) = holding.acquired {
            let today = Utc::now().date_naive();
            if let Some(tomorrow) = today.succ_opt() {
                if acquired > tomorrow {
                    return Err(CoreError::ValidationError(format!(
                        "Acquisition date {acquired} is in the future"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
