use serde::{Deserialize, Serialize};
use std::fmt;

pub type OrderId = u64;
pub type Price = i64; // Price in ticks (1 tick = 0.01 of a currency unit)
pub type Quantity = u64;

/// Lowest valid limit price, in ticks.
pub const MIN_PRICE: Price = 0;
/// Highest valid limit price, in ticks.
pub const MAX_PRICE: Price = 20_000;
/// Default number of pre-allocated order slots.
pub const DEFAULT_POOL_CAPACITY: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Rests at its price until filled or cancelled.
    Limit,
    /// Matches immediately at any price; never rests, residual is dropped.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// A single execution. The price is always the maker's resting price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

/// Aggregated view of one price level, as returned by the depth queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub total_quantity: Quantity,
    pub order_count: usize,
}

/// Outcome of a single `add_order` call. `fills` is in exact execution
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub order_id: OrderId,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub fills: Vec<Fill>,
}
