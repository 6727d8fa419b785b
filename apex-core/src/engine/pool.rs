use crate::engine::types::Order;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use tracing::debug;

/// Number of order slots per block.
pub const BLOCK_SIZE: usize = 1024;

struct Block {
    /// Next index to hand out within this block.
    index: AtomicUsize,
    slots: [UnsafeCell<MaybeUninit<Order>>; BLOCK_SIZE],
    /// Chain to the block installed immediately before this one, newest-first.
    prev: AtomicPtr<Block>,
}

impl Block {
    fn new(prev: *mut Block) -> Box<Block> {
        Box::new(Block {
            index: AtomicUsize::new(0),
            slots: std::array::from_fn(|_| UnsafeCell::new(MaybeUninit::uninit())),
            prev: AtomicPtr::new(prev),
        })
    }
}

// SAFETY: slots are only written once by the allocating thread before the
// resulting `&Order` is published, and never written again; concurrent readers
// only ever observe fully-initialized orders through `alloc`'s return value.
unsafe impl Sync for Block {}

/// A grow-only block allocator handing out order records with addresses stable for
/// the pool's lifetime.
///
/// Allocation reserves the next index in the current block atomically. When a block
/// fills up, installing its successor is serialized behind a short lock — the one
/// spot in the engine allowed to briefly block, because it happens once every
/// [`BLOCK_SIZE`] allocations. Blocks are never freed until the pool itself drops.
pub struct OrderPool {
    current: AtomicPtr<Block>,
    /// Owns every block ever installed, so they are freed exactly once on drop.
    owned: Mutex<Vec<Box<Block>>>,
}

impl OrderPool {
    /// Creates a pool with one empty block already installed.
    pub fn new() -> Self {
        let first = Block::new(ptr::null_mut());
        let first_ptr = Box::into_raw(first);
        let owned = unsafe { vec![Box::from_raw(first_ptr)] };
        OrderPool {
            current: AtomicPtr::new(first_ptr),
            owned: Mutex::new(owned),
        }
    }

    /// Writes `order` into a fresh slot and returns a stable reference to it.
    pub fn alloc(&self, order: Order) -> &Order {
        loop {
            let block_ptr = self.current.load(Ordering::Acquire);
            // SAFETY: block_ptr was installed by `new` or `grow` and is never freed
            // while `self` is alive.
            let block = unsafe { &*block_ptr };
            let idx = block.index.fetch_add(1, Ordering::Relaxed);
            if idx < BLOCK_SIZE {
                let slot = block.slots[idx].get();
                unsafe {
                    (*slot).write(order);
                    return (*slot).assume_init_ref();
                }
            }
            self.grow(block_ptr);
        }
    }

    /// Installs a new block as `current`, unless another thread already did so
    /// after `observed` was read.
    fn grow(&self, observed: *mut Block) {
        let mut owned = self.owned.lock().expect("order pool lock poisoned");
        if self.current.load(Ordering::Acquire) != observed {
            // Someone else installed a newer block while we waited for the lock.
            return;
        }
        debug!("order pool expanding past {BLOCK_SIZE} orders in current block");
        let new_block = Block::new(observed);
        let new_ptr = Box::into_raw(new_block);
        self.current.store(new_ptr, Ordering::Release);
        owned.push(unsafe { Box::from_raw(new_ptr) });
    }
}

impl Default for OrderPool {
    fn default() -> Self {
        Self::new()
    }
}
