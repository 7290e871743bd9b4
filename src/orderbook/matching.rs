use crate::orderbook::book::OrderBook;
use crate::orderbook::types::{Fill, OrderId, OrderResult, OrderType, Price, Quantity, Side};

/// Fills vector capacity reserved on entry to matching. Typical takers
/// produce a handful of fills; this keeps the common case growth-free.
pub(crate) const FILLS_RESERVE: usize = 16;

/// An order during its matching phase. Market orders exist only as this
/// transient record; limit orders are copied into a pool slot afterwards
/// if any quantity remains.
#[derive(Debug)]
pub(crate) struct IncomingOrder {
    pub id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderBook {
    /// Drain the opposite ladder under price-time priority until the
    /// incoming order is exhausted or no longer crossable.
    ///
    /// Fills execute at the maker's resting price and are appended in
    /// execution order. Exhausted makers are unlinked, deregistered and
    /// returned to the pool; the ladder advances its own cursor whenever
    /// a level empties, so every iteration reads a tight best price.
    pub(crate) fn match_incoming(&mut self, incoming: &mut IncomingOrder, result: &mut OrderResult) {
        result.fills.reserve(FILLS_RESERVE);

        let (pool, index, opposite) = match incoming.side {
            Side::Buy => (&mut self.pool, &mut self.index, &mut self.asks),
            Side::Sell => (&mut self.pool, &mut self.index, &mut self.bids),
        };

        while incoming.quantity > 0 && opposite.has_orders() {
            if incoming.order_type == OrderType::Limit && !opposite.crosses(incoming.price) {
                break;
            }

            let maker_slot = opposite.front();
            let maker = &mut pool[maker_slot];
            let fill_qty = incoming.quantity.min(maker.quantity);

            result.fills.push(Fill {
                maker_order_id: maker.id,
                taker_order_id: incoming.id,
                price: maker.price,
                quantity: fill_qty,
            });

            maker.quantity -= fill_qty;
            incoming.quantity -= fill_qty;
            result.filled_quantity += fill_qty;

            if pool[maker_slot].quantity == 0 {
                let maker_id = pool[maker_slot].id;
                opposite.unlink(pool, maker_slot);
                index.remove(maker_id);
                pool.release(maker_slot);
            }
        }
    }
}
