use crate::engine::types::{Order, Quantity};
use crossbeam_utils::CachePadded;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU32, AtomicU64, Ordering};

/// A single price's intrusive singly-linked list of resting orders, plus aggregate
/// counters. The level does not store its own price — the price is implicit in the
/// level's index within the book's side array.
///
/// The list is a LIFO, deliberately: pushing at the head via CAS keeps insertion
/// constant-time without a tail pointer, at the cost of strict time priority within
/// the level. Callers that need FIFO fairness within a price must build it on top
/// (a tail pointer and Michael-Scott queue semantics would restore it, doubling the
/// CAS count per push).
pub struct PriceLevel {
    head: AtomicPtr<Order>,
    total_quantity: CachePadded<AtomicU64>,
    order_count: CachePadded<AtomicU32>,
}

impl PriceLevel {
    /// Creates an empty level.
    pub const fn new() -> Self {
        PriceLevel {
            head: AtomicPtr::new(ptr::null_mut()),
            total_quantity: CachePadded::new(AtomicU64::new(0)),
            order_count: CachePadded::new(AtomicU32::new(0)),
        }
    }

    /// Aggregate resting quantity at this level. Eventually consistent with the sum
    /// of active orders' remaining quantities after quiescence; may run briefly ahead
    /// of or behind an in-flight fill.
    #[inline]
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity.load(Ordering::Acquire)
    }

    /// Count of orders ever linked into this level. Orders are never unlinked
    /// (cancellation only flips status), so this never decreases.
    #[inline]
    pub fn order_count(&self) -> u32 {
        self.order_count.load(Ordering::Acquire)
    }

    /// Acquire-loads the list head, for traversal.
    #[inline]
    pub fn head(&self) -> *mut Order {
        self.head.load(Ordering::Acquire)
    }

    /// Pushes `order` onto the head of the list via a CAS retry loop, then bumps the
    /// aggregate counters. `order` must outlive the level (pool-allocated addresses
    /// are stable for the book's lifetime).
    pub fn push(&self, order: &Order) {
        let node = order as *const Order as *mut Order;
        let mut head = self.head.load(Ordering::Acquire);
        loop {
            order.set_next(head);
            match self
                .head
                .compare_exchange_weak(head, node, Ordering::Release, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(observed) => head = observed,
            }
        }
        self.total_quantity
            .fetch_add(order.initial_quantity, Ordering::Release);
        self.order_count.fetch_add(1, Ordering::Release);
    }

    /// Subtracts `quantity` from the aggregate resting quantity after a fill.
    #[inline]
    pub fn decrement_quantity(&self, quantity: Quantity) {
        self.total_quantity.fetch_sub(quantity, Ordering::Release);
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}
