use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBookError {
    /// Order quantity must be a positive integer
    InvalidQuantity,

    /// Limit price is outside the book's configured tick range
    PriceOutOfRange,

    /// Construction with an inverted or unrepresentable price range
    InvalidPriceRange,

    /// No free order slots left; the pool never grows, so this is a
    /// capacity misconfiguration rather than a recoverable condition
    PoolExhausted,
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidQuantity => write!(f, "Quantity must be positive"),
            OrderBookError::PriceOutOfRange => write!(f, "Price outside allowed range"),
            OrderBookError::InvalidPriceRange => write!(f, "Invalid price range"),
            OrderBookError::PoolExhausted => write!(f, "Order pool exhausted"),
        }
    }
}

impl std::error::Error for OrderBookError {}

/// Result type for order book operations
pub type OrderBookResult<T> = Result<T, OrderBookError>;
