//! Limit Order Book Matching Engine
//!
//! A single-instrument, single-threaded order book designed for
//! microsecond-class operation latency on commodity CPUs.
//!
//! # Features
//!
//! - **Price-Time Priority**: strict FIFO ordering within price levels
//! - **Zero Hot-Path Allocation**: pooled order slots with a free-list;
//!   all storage is pre-allocated at construction
//! - **O(1) Operations**: flat price ladders with intrusive FIFOs give
//!   constant-time insert, cancel and per-fill work
//! - **Deterministic**: no locks, no threads, no clocks; state is a pure
//!   function of the operation sequence
//!
//! # Quick Start
//!
//! ```rust
//! use orderbook_engine::{OrderBook, OrderType, Side};
//!
//! let mut book = OrderBook::new();
//!
//! // Rest some liquidity
//! book.add_order(Side::Sell, OrderType::Limit, 10050, 100)?;
//!
//! // Cross it
//! let result = book.add_order(Side::Buy, OrderType::Limit, 10050, 40)?;
//! assert_eq!(result.filled_quantity, 40);
//! assert_eq!(result.fills[0].price, 10050);
//!
//! println!("Best ask: {:?}", book.best_ask());
//! # Ok::<(), orderbook_engine::OrderBookError>(())
//! ```
//!
//! # Architecture
//!
//! The book couples three structures, kept consistent by the matcher:
//!
//! 1. **Order pool**: a fixed slab of order slots plus a free-list; a
//!    dense id->slot array gives O(1) cancellation lookup
//! 2. **Price ladders**: one flat `Level` array per side over the whole
//!    tick range, with best-price cursors and intrusive doubly-linked
//!    FIFOs threaded through the order slots
//! 3. **Matcher**: drains the opposite ladder best-level-first, FIFO
//!    within a level, emitting fills at the maker's resting price
//!
//! The engine is deliberately not thread-safe: every operation takes
//! `&mut self`. Multi-producer setups must serialise externally.

pub mod metrics;
pub mod orderbook;
pub mod utils;

// Re-export commonly used types
pub use orderbook::{
    error::{OrderBookError, OrderBookResult},
    types::{Fill, OrderId, OrderResult, OrderType, Price, PriceLevel, Quantity, Side},
    BookConfig, BookStats, OrderBook,
};

pub use self::metrics::BookMetrics;
