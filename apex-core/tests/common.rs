use apex_core::prelude::*;
use std::sync::{Arc, Mutex};

/// Builds an order book with no syncer attached.
pub fn new_book() -> DefaultOrderBook {
    DefaultOrderBook::new(Arc::new(EmptyOrderBookSyncer))
}

/// A syncer that records every callback it receives, for asserting on the
/// book's notification stream independently of its own query methods.
#[derive(Default)]
pub struct RecordingSyncer {
    pub added: Mutex<Vec<OrderId>>,
    pub cancelled: Mutex<Vec<OrderId>>,
    pub trades: Mutex<Vec<Trade>>,
}

impl OrderBookSyncer for RecordingSyncer {
    fn add_order(&self, _seq: u64, order: &Order) {
        self.added.lock().unwrap().push(order.id);
    }

    fn cancel_order(&self, _seq: u64, order: &Order) {
        self.cancelled.lock().unwrap().push(order.id);
    }

    fn matched(&self, _seq: u64, trades: &[Trade]) {
        self.trades.lock().unwrap().extend_from_slice(trades);
    }
}
