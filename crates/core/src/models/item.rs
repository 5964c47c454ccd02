use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tradable CS:GO market item.
///
/// **Equality and hashing** are based solely on `market_hash_name`, NOT on
/// the display name. The hash name is the canonical Steam Community Market
/// identifier, so cache lookups stay consistent regardless of how the item
/// was labeled when added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Canonical market identifier, e.g. "AK-47 | Redline (Field-Tested)"
    pub market_hash_name: String,

    /// Human-readable display name (defaults to the hash name)
    pub name: String,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.market_hash_name == other.market_hash_name
    }
}

impl Eq for Item {}

impl std::hash::Hash for Item {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.market_hash_name.hash(state);
    }
}

impl Item {
    pub fn new(market_hash_name: impl Into<String>) -> Self {
        let hash_name = market_hash_name.into();
        Self {
            name: hash_name.clone(),
            market_hash_name: hash_name,
        }
    }

    /// Create an item with a display name different from the hash name.
    pub fn named(market_hash_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            market_hash_name: market_hash_name.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One position in the tracked inventory: an item plus how many copies
/// are held and, optionally, what was paid for them.
///
/// **Important**: Holdings do NOT store current prices. Prices come from
/// the market-data providers and the price cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier (upstream CRUD endpoints reference it)
    pub id: Uuid,

    /// The tracked item
    pub item: Item,

    /// Number of copies held (always positive)
    pub quantity: u32,

    /// Purchase price per copy, if recorded
    #[serde(default)]
    pub buy_price: Option<f64>,

    /// Date the position was acquired, if recorded
    #[serde(default)]
    pub acquired: Option<NaiveDate>,
}

impl Holding {
    pub fn new(item: Item, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            item,
            quantity,
            buy_price: None,
            acquired: None,
        }
    }

    /// Create a holding with a recorded purchase.
    pub fn with_purchase(item: Item, quantity: u32, buy_price: f64, acquired: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            item,
            quantity,
            buy_price: Some(buy_price),
            acquired: Some(acquired),
        }
    }
}

/// The tracked inventory: every holding the user has linked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// All holdings, kept in insertion order
    pub holdings: Vec<Holding>,
}
