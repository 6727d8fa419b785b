use crate::engine::types::{ORDER_TABLE_SIZE, Order, OrderId};
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};

struct Slot {
    id: AtomicU64,
    order: AtomicPtr<Order>,
}

impl Slot {
    const fn empty() -> Slot {
        Slot {
            id: AtomicU64::new(0),
            order: AtomicPtr::new(ptr::null_mut()),
        }
    }
}

/// Fixed-size, open-addressed-by-identity lookup from order identifier to order record.
///
/// The table is authoritative for live orders only up to [`ORDER_TABLE_SIZE`]
/// simultaneously-outstanding identifiers: once the issued id space wraps the table,
/// a new registration targeting an occupied slot is rejected rather than silently
/// overwriting the slot's current occupant.
pub struct OrderTable {
    slots: Box<[Slot]>,
}

impl OrderTable {
    /// Creates an empty table with [`ORDER_TABLE_SIZE`] slots.
    pub fn new() -> Self {
        OrderTable {
            slots: (0..ORDER_TABLE_SIZE).map(|_| Slot::empty()).collect(),
        }
    }

    #[inline]
    fn index(id: OrderId) -> usize {
        (id as usize) & (ORDER_TABLE_SIZE - 1)
    }

    /// Whether the slot `id` would hash to currently holds a live order.
    pub fn is_occupied(&self, id: OrderId) -> bool {
        let slot = &self.slots[Self::index(id)];
        !slot.order.load(Ordering::Acquire).is_null()
    }

    /// Registers `order` under `id`. Fails if the target slot is already occupied
    /// (either by `id` itself, impossible since ids are issued once, or by a
    /// different still-live id — a table collision).
    pub fn register(&self, id: OrderId, order: *mut Order) -> Result<(), ()> {
        let slot = &self.slots[Self::index(id)];
        match slot.order.compare_exchange(
            ptr::null_mut(),
            order,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                slot.id.store(id, Ordering::Release);
                Ok(())
            }
            Err(_) => Err(()),
        }
    }

    /// Looks up the live order registered under `id`, verifying the slot's id still
    /// matches (guarding against a slot that has since been reused or cleared).
    pub fn lookup(&self, id: OrderId) -> Option<&Order> {
        let slot = &self.slots[Self::index(id)];
        if slot.id.load(Ordering::Acquire) != id {
            return None;
        }
        let ptr = slot.order.load(Ordering::Acquire);
        if ptr.is_null() {
            return None;
        }
        // SAFETY: pool-allocated orders are never freed while the book is alive.
        Some(unsafe { &*ptr })
    }

    /// Clears the slot for `id` if it still holds `id`. Returns whether a live
    /// registration was actually cleared.
    pub fn clear(&self, id: OrderId) -> bool {
        let slot = &self.slots[Self::index(id)];
        if slot.id.load(Ordering::Acquire) != id {
            return false;
        }
        if slot.order.swap(ptr::null_mut(), Ordering::Release).is_null() {
            return false;
        }
        slot.id.store(0, Ordering::Release);
        true
    }
}

impl Default for OrderTable {
    fn default() -> Self {
        Self::new()
    }
}
