use tracing::{debug, info, warn};

use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::orderbook::ladder::Ladder;
use crate::orderbook::matching::{IncomingOrder, FILLS_RESERVE};
use crate::orderbook::pool::{OrderIndex, OrderPool};
use crate::orderbook::types::{
    OrderId, OrderResult, OrderType, Price, PriceLevel, Quantity, Side, DEFAULT_POOL_CAPACITY,
    MAX_PRICE, MIN_PRICE,
};

/// Construction parameters. All storage is allocated up front from these;
/// nothing on the hot path allocates afterwards except the caller-sized
/// result vectors.
#[derive(Debug, Clone)]
pub struct BookConfig {
    pub min_price: Price,
    pub max_price: Price,
    pub pool_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            min_price: MIN_PRICE,
            max_price: MAX_PRICE,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

/// Single-instrument limit order book with strict price-time priority.
///
/// Single-threaded by contract: every operation takes `&mut self` and
/// runs to completion on the calling thread. Multi-producer integrators
/// must serialise externally.
#[derive(Debug)]
pub struct OrderBook {
    pub(super) pool: OrderPool,
    pub(super) index: OrderIndex,
    pub(super) bids: Ladder,
    pub(super) asks: Ladder,
    min_price: Price,
    max_price: Price,
    next_id: OrderId,
}

impl OrderBook {
    /// Book over the default tick range with the default pool capacity.
    pub fn new() -> Self {
        Self::build(BookConfig::default())
    }

    pub fn with_config(config: BookConfig) -> OrderBookResult<Self> {
        // The cursors need one sentinel tick outside the range on each end.
        if config.min_price > config.max_price
            || config.min_price == Price::MIN
            || config.max_price == Price::MAX
        {
            return Err(OrderBookError::InvalidPriceRange);
        }
        Ok(Self::build(config))
    }

    fn build(config: BookConfig) -> Self {
        info!(
            "Creating order book: price range [{}, {}], pool capacity {}",
            config.min_price, config.max_price, config.pool_capacity
        );

        Self {
            pool: OrderPool::with_capacity(config.pool_capacity),
            // Ids start at 1; pre-sizing to the pool capacity means the
            // lookup never grows while the pool can still hold the order.
            index: OrderIndex::with_capacity(config.pool_capacity + 1),
            bids: Ladder::new(Side::Buy, config.min_price, config.max_price),
            asks: Ladder::new(Side::Sell, config.min_price, config.max_price),
            min_price: config.min_price,
            max_price: config.max_price,
            next_id: 1,
        }
    }

    /// Submit an order. Matching runs first; for limit orders any
    /// residual then rests at `price`, for market orders it is dropped.
    ///
    /// Consumes one id per successful call, even when the order fills
    /// completely on arrival. A rejected call consumes nothing and
    /// leaves the book untouched.
    pub fn add_order(
        &mut self,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: Quantity,
    ) -> OrderBookResult<OrderResult> {
        if quantity == 0 {
            warn!("Rejected {} {} order: zero quantity", side, order_type);
            return Err(OrderBookError::InvalidQuantity);
        }
        if order_type == OrderType::Limit {
            if price < self.min_price || price > self.max_price {
                warn!("Rejected {} limit order: price {} out of range", side, price);
                return Err(OrderBookError::PriceOutOfRange);
            }
            // Reserve a slot before matching so a residual can always
            // rest; a failed call must not consume liquidity.
            if self.pool.is_full() {
                warn!("Rejected {} limit order: pool exhausted", side);
                return Err(OrderBookError::PoolExhausted);
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        debug!("Add order {}: {} {} {}@{}", id, side, order_type, quantity, price);

        let mut incoming = IncomingOrder {
            id,
            side,
            order_type,
            price,
            quantity,
        };
        let mut result = OrderResult {
            order_id: id,
            filled_quantity: 0,
            remaining_quantity: quantity,
            fills: Vec::with_capacity(FILLS_RESERVE),
        };

        self.match_incoming(&mut incoming, &mut result);
        result.remaining_quantity = incoming.quantity;

        if order_type == OrderType::Limit && incoming.quantity > 0 {
            // A slot is free here: limit orders are rejected up front
            // when the pool is full.
            let Some(slot) = self.pool.alloc() else {
                return Err(OrderBookError::PoolExhausted);
            };
            let order = &mut self.pool[slot];
            order.id = id;
            order.side = side;
            order.price = price;
            order.quantity = incoming.quantity;

            let ladder = match side {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            ladder.push_back(&mut self.pool, slot);
            self.index.insert(id, slot);
        }

        Ok(result)
    }

    /// Remove a resting order. Returns `false` for ids that are unknown,
    /// already filled or already cancelled; a second cancel of the same
    /// id is always `false`.
    pub fn cancel_order(&mut self, id: OrderId) -> bool {
        let Some(slot) = self.index.get(id) else {
            debug!("Cancel order {}: not resting", id);
            return false;
        };

        let side = self.pool[slot].side;
        debug!("Cancel order {}: removing from {} side", id, side);

        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        ladder.unlink(&mut self.pool, slot);
        self.index.remove(id);
        self.pool.release(slot);
        true
    }

    /// At most `depth` bid levels, highest price first.
    pub fn get_bids(&self, depth: usize) -> Vec<PriceLevel> {
        self.bids.depth_view(&self.pool, depth)
    }

    /// At most `depth` ask levels, lowest price first.
    pub fn get_asks(&self, depth: usize) -> Vec<PriceLevel> {
        self.asks.depth_view(&self.pool, depth)
    }

    pub fn bid_level_count(&self) -> usize {
        self.bids.level_count()
    }

    pub fn ask_level_count(&self) -> usize {
        self.asks.level_count()
    }

    /// Number of orders currently resting in the book.
    pub fn order_count(&self) -> usize {
        self.pool.live()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn spread(&self) -> Option<Price> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) if ask > bid => Some(ask - bid),
            _ => None,
        }
    }

    /// One-shot summary of the current book state.
    pub fn stats(&self) -> BookStats {
        BookStats {
            order_count: self.order_count(),
            bid_levels: self.bid_level_count(),
            ask_levels: self.ask_level_count(),
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            spread: self.spread(),
        }
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct BookStats {
    pub order_count: usize,
    pub bid_levels: usize,
    pub ask_levels: usize,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub spread: Option<Price>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book() {
        let book = OrderBook::new();
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.spread(), None);
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.bid_level_count(), 0);
        assert_eq!(book.ask_level_count(), 0);
    }

    #[test]
    fn test_add_limit_orders_both_sides() {
        let mut book = OrderBook::new();

        let buy = book.add_order(Side::Buy, OrderType::Limit, 10000, 100).unwrap();
        assert_eq!(buy.filled_quantity, 0);
        assert_eq!(buy.remaining_quantity, 100);

        let sell = book.add_order(Side::Sell, OrderType::Limit, 10100, 100).unwrap();
        assert_eq!(sell.remaining_quantity, 100);

        assert_eq!(book.best_bid(), Some(10000));
        assert_eq!(book.best_ask(), Some(10100));
        assert_eq!(book.spread(), Some(100));
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn test_bid_levels_ordered_highest_first() {
        let mut book = OrderBook::new();
        book.add_order(Side::Buy, OrderType::Limit, 10000, 100).unwrap();
        book.add_order(Side::Buy, OrderType::Limit, 10050, 200).unwrap();
        book.add_order(Side::Buy, OrderType::Limit, 9900, 50).unwrap();

        let bids = book.get_bids(10);
        assert_eq!(bids.len(), 3);
        assert_eq!(bids[0].price, 10050);
        assert_eq!(bids[1].price, 10000);
        assert_eq!(bids[2].price, 9900);
    }

    // Sell 100 @ 10000, Sell 100 @ 10000, Buy 150 @ 10000: first maker
    // fills completely before the second is touched.
    #[test]
    fn test_price_time_priority_within_level() {
        let mut book = OrderBook::new();
        let m1 = book.add_order(Side::Sell, OrderType::Limit, 10000, 100).unwrap();
        let m2 = book.add_order(Side::Sell, OrderType::Limit, 10000, 100).unwrap();

        let result = book.add_order(Side::Buy, OrderType::Limit, 10000, 150).unwrap();
        assert_eq!(result.filled_quantity, 150);
        assert_eq!(result.remaining_quantity, 0);
        assert_eq!(result.fills.len(), 2);
        assert_eq!(result.fills[0].maker_order_id, m1.order_id);
        assert_eq!(result.fills[0].quantity, 100);
        assert_eq!(result.fills[0].price, 10000);
        assert_eq!(result.fills[1].maker_order_id, m2.order_id);
        assert_eq!(result.fills[1].quantity, 50);

        let asks = book.get_asks(10);
        assert_eq!(asks.len(), 1);
        assert_eq!(asks[0].price, 10000);
        assert_eq!(asks[0].total_quantity, 50);
    }

    // Sell 50 @ 10000, Sell 50 @ 10100, market buy 80: fills walk up the
    // ask ladder and leave 20 at 10100.
    #[test]
    fn test_market_buy_across_levels() {
        let mut book = OrderBook::new();
        book.add_order(Side::Sell, OrderType::Limit, 10000, 50).unwrap();
        book.add_order(Side::Sell, OrderType::Limit, 10100, 50).unwrap();

        let result = book.add_order(Side::Buy, OrderType::Market, 0, 80).unwrap();
        assert_eq!(result.filled_quantity, 80);
        assert_eq!(result.remaining_quantity, 0);
        assert_eq!(result.fills.len(), 2);
        assert_eq!(result.fills[0].price, 10000);
        assert_eq!(result.fills[0].quantity, 50);
        assert_eq!(result.fills[1].price, 10100);
        assert_eq!(result.fills[1].quantity, 30);

        let asks = book.get_asks(10);
        assert_eq!(asks.len(), 1);
        assert_eq!(asks[0].price, 10100);
        assert_eq!(asks[0].total_quantity, 20);
    }

    // Sell 30 @ 10000, Buy 100 @ 10000: the 70 surplus rests as a bid.
    #[test]
    fn test_crossing_limit_residual_rests() {
        let mut book = OrderBook::new();
        book.add_order(Side::Sell, OrderType::Limit, 10000, 30).unwrap();

        let result = book.add_order(Side::Buy, OrderType::Limit, 10000, 100).unwrap();
        assert_eq!(result.filled_quantity, 30);
        assert_eq!(result.remaining_quantity, 70);

        assert_eq!(book.ask_level_count(), 0);
        let bids = book.get_bids(10);
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].price, 10000);
        assert_eq!(bids[0].total_quantity, 70);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut book = OrderBook::new();
        let r1 = book.add_order(Side::Buy, OrderType::Limit, 10000, 100).unwrap();
        book.add_order(Side::Buy, OrderType::Limit, 10000, 200).unwrap();
        assert_eq!(book.order_count(), 2);

        assert!(book.cancel_order(r1.order_id));
        assert!(!book.cancel_order(r1.order_id));
        assert_eq!(book.order_count(), 1);

        let bids = book.get_bids(10);
        assert_eq!(bids[0].total_quantity, 200);
    }

    #[test]
    fn test_market_order_on_empty_book() {
        let mut book = OrderBook::new();
        let result = book.add_order(Side::Buy, OrderType::Market, 0, 100).unwrap();
        assert_eq!(result.filled_quantity, 0);
        assert_eq!(result.remaining_quantity, 100);
        assert!(result.fills.is_empty());
        assert_eq!(book.order_count(), 0);
    }

    // Sweep three ask levels; the cursor must land on the partially
    // consumed top level.
    #[test]
    fn test_multi_level_sweep_recovers_best_ask() {
        let mut book = OrderBook::new();
        book.add_order(Side::Sell, OrderType::Limit, 10000, 50).unwrap();
        book.add_order(Side::Sell, OrderType::Limit, 10100, 50).unwrap();
        book.add_order(Side::Sell, OrderType::Limit, 10200, 50).unwrap();

        let result = book.add_order(Side::Buy, OrderType::Limit, 10200, 120).unwrap();
        assert_eq!(result.filled_quantity, 120);
        assert_eq!(result.fills.len(), 3);
        assert_eq!(result.fills[0].price, 10000);
        assert_eq!(result.fills[1].price, 10100);
        assert_eq!(result.fills[2].price, 10200);
        assert_eq!(result.fills[2].quantity, 20);

        let asks = book.get_asks(10);
        assert_eq!(asks.len(), 1);
        assert_eq!(asks[0].price, 10200);
        assert_eq!(asks[0].total_quantity, 30);
        assert_eq!(book.best_ask(), Some(10200));
    }

    #[test]
    fn test_no_match_across_price_gap() {
        let mut book = OrderBook::new();
        book.add_order(Side::Sell, OrderType::Limit, 10100, 100).unwrap();

        let result = book.add_order(Side::Buy, OrderType::Limit, 10000, 100).unwrap();
        assert_eq!(result.filled_quantity, 0);
        assert_eq!(result.remaining_quantity, 100);
        assert_eq!(book.bid_level_count(), 1);
        assert_eq!(book.ask_level_count(), 1);
    }

    #[test]
    fn test_full_match_leaves_empty_book() {
        let mut book = OrderBook::new();
        book.add_order(Side::Sell, OrderType::Limit, 10000, 100).unwrap();
        let result = book.add_order(Side::Buy, OrderType::Limit, 10000, 100).unwrap();

        assert_eq!(result.filled_quantity, 100);
        assert_eq!(result.remaining_quantity, 0);
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.bid_level_count(), 0);
        assert_eq!(book.ask_level_count(), 0);
    }

    #[test]
    fn test_ids_increase_even_when_fully_filled() {
        let mut book = OrderBook::new();
        let a = book.add_order(Side::Sell, OrderType::Limit, 10000, 50).unwrap();
        // Fully filled on arrival: still consumes an id
        let b = book.add_order(Side::Buy, OrderType::Limit, 10000, 50).unwrap();
        let c = book.add_order(Side::Buy, OrderType::Market, 0, 10).unwrap();

        assert_eq!(b.order_id, a.order_id + 1);
        assert_eq!(c.order_id, b.order_id + 1);
    }

    #[test]
    fn test_cancel_after_fill_returns_false() {
        let mut book = OrderBook::new();
        let maker = book.add_order(Side::Sell, OrderType::Limit, 10000, 50).unwrap();
        book.add_order(Side::Buy, OrderType::Limit, 10000, 50).unwrap();

        assert!(!book.cancel_order(maker.order_id));
    }

    #[test]
    fn test_cancel_recovers_best_bid() {
        let mut book = OrderBook::new();
        let top = book.add_order(Side::Buy, OrderType::Limit, 10050, 100).unwrap();
        book.add_order(Side::Buy, OrderType::Limit, 9900, 100).unwrap();

        assert!(book.cancel_order(top.order_id));
        assert_eq!(book.best_bid(), Some(9900));
        assert_eq!(book.bid_level_count(), 1);
    }

    #[test]
    fn test_market_order_exceeding_liquidity_drops_residual() {
        let mut book = OrderBook::new();
        book.add_order(Side::Sell, OrderType::Limit, 10000, 50).unwrap();

        let result = book.add_order(Side::Buy, OrderType::Market, 0, 200).unwrap();
        assert_eq!(result.filled_quantity, 50);
        assert_eq!(result.remaining_quantity, 150);
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn test_depth_limits_output() {
        let mut book = OrderBook::new();
        for i in 0..20 {
            book.add_order(Side::Buy, OrderType::Limit, 10000 - i * 100, 10)
                .unwrap();
        }
        let bids = book.get_bids(5);
        assert_eq!(bids.len(), 5);
        assert_eq!(bids[0].price, 10000);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut book = OrderBook::new();
        assert_eq!(
            book.add_order(Side::Buy, OrderType::Limit, 10000, 0),
            Err(OrderBookError::InvalidQuantity)
        );
        assert_eq!(
            book.add_order(Side::Buy, OrderType::Limit, MAX_PRICE + 1, 10),
            Err(OrderBookError::PriceOutOfRange)
        );
        assert_eq!(
            book.add_order(Side::Sell, OrderType::Limit, MIN_PRICE - 1, 10),
            Err(OrderBookError::PriceOutOfRange)
        );
        // Rejected calls consume no ids
        let r = book.add_order(Side::Buy, OrderType::Limit, 10000, 10).unwrap();
        assert_eq!(r.order_id, 1);
    }

    #[test]
    fn test_pool_exhaustion_rejects_before_matching() {
        let mut book = OrderBook::with_config(BookConfig {
            pool_capacity: 1,
            ..BookConfig::default()
        })
        .unwrap();

        book.add_order(Side::Sell, OrderType::Limit, 10100, 50).unwrap();
        let err = book.add_order(Side::Buy, OrderType::Limit, 10000, 50);
        assert_eq!(err, Err(OrderBookError::PoolExhausted));
        // The resting ask is untouched
        assert_eq!(book.order_count(), 1);

        // Market orders need no slot and still match
        let result = book.add_order(Side::Buy, OrderType::Market, 0, 20).unwrap();
        assert_eq!(result.filled_quantity, 20);
    }

    #[test]
    fn test_with_config_validates_range() {
        assert_eq!(
            OrderBook::with_config(BookConfig {
                min_price: 100,
                max_price: 50,
                pool_capacity: 16,
            })
            .err(),
            Some(OrderBookError::InvalidPriceRange)
        );
    }

    #[test]
    fn test_custom_price_range() {
        let mut book = OrderBook::with_config(BookConfig {
            min_price: 9_000,
            max_price: 11_000,
            pool_capacity: 1024,
        })
        .unwrap();

        assert_eq!(
            book.add_order(Side::Buy, OrderType::Limit, 8_999, 10),
            Err(OrderBookError::PriceOutOfRange)
        );
        book.add_order(Side::Buy, OrderType::Limit, 9_000, 10).unwrap();
        assert_eq!(book.best_bid(), Some(9_000));
    }

    #[test]
    fn test_stats_snapshot() {
        let mut book = OrderBook::new();
        book.add_order(Side::Buy, OrderType::Limit, 9950, 100).unwrap();
        book.add_order(Side::Sell, OrderType::Limit, 10050, 100).unwrap();

        let stats = book.stats();
        assert_eq!(stats.order_count, 2);
        assert_eq!(stats.bid_levels, 1);
        assert_eq!(stats.ask_levels, 1);
        assert_eq!(stats.best_bid, Some(9950));
        assert_eq!(stats.best_ask, Some(10050));
        assert_eq!(stats.spread, Some(100));
    }
}
