use crate::engine::level::PriceLevel;
use crate::engine::matching;
use crate::engine::pool::OrderPool;
use crate::engine::table::OrderTable;
use crate::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// OrderBook is the public surface of the matching core: submit, cancel, and the
/// best-bid/best-ask queries.
pub trait OrderBook {
    /// Enters `order` into the book and matches it against the opposite side,
    /// returning every trade produced. Insertion happens before matching, so a
    /// `GoodTillCancel`/`Market` order may trade against orders it was just
    /// inserted among; `FillAndKill` orders are never inserted.
    fn submit(
        &self,
        order_type: OrderType,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<Vec<Trade>, RejectReason>;

    /// Cancels a live order by id. Returns `true` iff it was live (`Active`) and
    /// this call transitioned it to `Cancelled`.
    fn cancel(&self, order_id: OrderId) -> bool;

    /// Highest-priced bid level with resting quantity, or `INVALID_PRICE` if none.
    fn best_bid_price(&self) -> Price;
    /// Resting quantity at [`OrderBook::best_bid_price`], or 0 if none.
    fn best_bid_quantity(&self) -> Quantity;
    /// Lowest-priced ask level with resting quantity, or `INVALID_PRICE` if none.
    fn best_ask_price(&self) -> Price;
    /// Resting quantity at [`OrderBook::best_ask_price`], or 0 if none.
    fn best_ask_quantity(&self) -> Quantity;
}

/// DefaultOrderBook is the default implementation of [`OrderBook`]: two dense arrays
/// of price levels (one per side), a grow-only order pool, and a fixed-size order
/// table, tied together by the match-and-insert protocol in `engine::matching`.
pub struct DefaultOrderBook {
    pub(crate) bids: Box<[PriceLevel]>,
    pub(crate) asks: Box<[PriceLevel]>,
    pub(crate) pool: OrderPool,
    pub(crate) table: OrderTable,
    next_order_id: AtomicU64,
    sync_seq: AtomicU64,
    syncer: Arc<dyn OrderBookSyncer>,
}

impl DefaultOrderBook {
    /// Creates a fresh, empty book. `syncer` is notified of every accepted order,
    /// cancellation, and trade; pass [`EmptyOrderBookSyncer`] if nothing downstream
    /// needs to know.
    pub fn new(syncer: Arc<dyn OrderBookSyncer>) -> Self {
        debug!(levels = NUM_LEVELS, table_size = ORDER_TABLE_SIZE, "constructing order book");
        DefaultOrderBook {
            bids: (0..NUM_LEVELS).map(|_| PriceLevel::new()).collect(),
            asks: (0..NUM_LEVELS).map(|_| PriceLevel::new()).collect(),
            pool: OrderPool::new(),
            table: OrderTable::new(),
            next_order_id: AtomicU64::new(1),
            sync_seq: AtomicU64::new(0),
            syncer,
        }
    }

    /// The array of price levels for `side`, indexed by [`price_to_index`].
    #[inline]
    pub(crate) fn levels(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn best_index(&self, side: Side) -> Option<usize> {
        let levels = self.levels(side);
        match side {
            // Highest-indexed non-empty bid level is the best bid.
            Side::Buy => (0..levels.len())
                .rev()
                .find(|&i| levels[i].total_quantity() > 0),
            // Lowest-indexed non-empty ask level is the best ask.
            Side::Sell => (0..levels.len()).find(|&i| levels[i].total_quantity() > 0),
        }
    }

    fn best_price(&self, side: Side) -> Option<Price> {
        self.best_index(side).map(index_to_price)
    }

    fn next_sync_seq(&self) -> u64 {
        self.sync_seq.fetch_add(1, Ordering::Relaxed)
    }
}

impl OrderBook for DefaultOrderBook {
    fn submit(
        &self,
        order_type: OrderType,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<Vec<Trade>, RejectReason> {
        debug_assert!(quantity > 0, "submit requires a positive quantity");

        let resolved_price = match order_type {
            OrderType::Market => self
                .best_price(side.opposite())
                .ok_or(RejectReason::InsufficientLiquidity)?,
            _ => {
                if price < MIN_PRICE || price > MAX_PRICE {
                    return Err(RejectReason::RangeError);
                }
                price
            }
        };
        let level_idx = price_to_index(resolved_price).expect("resolved_price was validated");

        let id = self.next_order_id.fetch_add(1, Ordering::Relaxed);
        if self.table.is_occupied(id) {
            return Err(RejectReason::TableCollision);
        }

        let initial_price = if order_type == OrderType::Market {
            INVALID_PRICE
        } else {
            resolved_price
        };
        let order = Order::new(order_type, id, side, initial_price, quantity, now_micros());
        let order_ref = self.pool.alloc(order);

        if order_type == OrderType::Market {
            order_ref.convert_to_market_to_limit(resolved_price);
        }

        let order_ptr = order_ref as *const Order as *mut Order;
        if self.table.register(id, order_ptr).is_err() {
            // Lost a race for this slot; the allocated record is simply never
            // linked into a level and stays unreachable.
            return Err(RejectReason::TableCollision);
        }

        if order_type != OrderType::FillAndKill {
            self.levels(side)[level_idx].push(order_ref);
        }

        self.syncer.add_order(self.next_sync_seq(), order_ref);

        let trades = matching::match_incoming(self, order_ref, level_idx);
        if !trades.is_empty() {
            self.syncer.matched(self.next_sync_seq(), &trades);
        }
        Ok(trades)
    }

    fn cancel(&self, order_id: OrderId) -> bool {
        let Some(order) = self.table.lookup(order_id) else {
            return false;
        };
        if !order.try_cancel() {
            return false;
        }
        self.table.clear(order_id);
        self.syncer.cancel_order(self.next_sync_seq(), order);
        true
    }

    fn best_bid_price(&self) -> Price {
        self.best_price(Side::Buy).unwrap_or(INVALID_PRICE)
    }

    fn best_bid_quantity(&self) -> Quantity {
        self.best_index(Side::Buy)
            .map(|i| self.bids[i].total_quantity())
            .unwrap_or(0)
    }

    fn best_ask_price(&self) -> Price {
        self.best_price(Side::Sell).unwrap_or(INVALID_PRICE)
    }

    fn best_ask_quantity(&self) -> Quantity {
        self.best_index(Side::Sell)
            .map(|i| self.asks[i].total_quantity())
            .unwrap_or(0)
    }
}
