use crate::prelude::*;

/// OrderBookSyncer is the seam an out-of-scope collaborator (journaling, market-data
/// dissemination, risk) attaches to. The book calls it at the same points regardless
/// of whether anyone is listening.
pub trait OrderBookSyncer: Send + Sync {
    /// Called once a new order has been entered into the book.
    fn add_order(&self, seq: u64, order: &Order);
    /// Called when an order is cancelled.
    fn cancel_order(&self, seq: u64, order: &Order);
    /// Called with every trade produced by a single submission's matching walk.
    fn matched(&self, seq: u64, trades: &[Trade]);
}

/// No-op implementation of [`OrderBookSyncer`], used when nothing downstream cares.
pub struct EmptyOrderBookSyncer;

impl OrderBookSyncer for EmptyOrderBookSyncer {
    fn add_order(&self, _seq: u64, _order: &Order) {}

    fn cancel_order(&self, _seq: u64, _order: &Order) {}

    fn matched(&self, _seq: u64, _trades: &[Trade]) {}
}
