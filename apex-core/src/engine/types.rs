use mimalloc::MiMalloc;
use std::sync::atomic::{AtomicI64, AtomicPtr, AtomicU8, AtomicU32, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Global allocator.
///
/// The pool still goes through the system allocator once per block of
/// `BLOCK_SIZE` orders, so a fast allocator matters even though the hot
/// per-order path never allocates.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// OrderId is the type used for order identifiers, issued monotonically by the book.
pub type OrderId = u64;

/// Price is a signed fixed-tick integer. Valid prices lie in `[MIN_PRICE, MAX_PRICE]`.
pub type Price = i64;

/// Quantity is an unsigned integer.
pub type Quantity = u64;

/// Lowest valid price.
pub const MIN_PRICE: Price = 0;
/// Highest valid price.
pub const MAX_PRICE: Price = 50_000;
/// Minimum price increment.
pub const TICK_SIZE: Price = 1;
/// Sentinel used for market orders that have no limit yet, and for
/// best-bid/best-ask queries that find no resting liquidity.
pub const INVALID_PRICE: Price = -1;

/// Number of distinct price levels per side, covering `[MIN_PRICE, MAX_PRICE]` inclusive.
///
/// The original C++ sized this array as `(MAX_PRICE - MIN_PRICE) / TICK_SIZE`, which is
/// off by one: `MAX_PRICE` itself has no slot and indexing it overruns the array. This
/// crate adds the missing `+ 1`.
pub const NUM_LEVELS: usize = ((MAX_PRICE - MIN_PRICE) / TICK_SIZE) as usize + 1;

/// Number of slots in the order table. Must be a power of two.
pub const ORDER_TABLE_SIZE: usize = 65536;

/// Converts a validated price into its price-level array index.
///
/// Returns `None` if `price` falls outside `[MIN_PRICE, MAX_PRICE]`.
#[inline]
pub fn price_to_index(price: Price) -> Option<usize> {
    if price < MIN_PRICE || price > MAX_PRICE {
        return None;
    }
    Some(((price - MIN_PRICE) / TICK_SIZE) as usize)
}

/// Converts a price-level array index back into its price. Inverse of [`price_to_index`].
#[inline]
pub fn index_to_price(index: usize) -> Price {
    MIN_PRICE + (index as Price) * TICK_SIZE
}

/// Returns the current wall-clock time in microseconds since the Unix epoch.
#[inline]
pub(crate) fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

/// Side indicates the direction of the order.
#[derive(PartialEq, Eq, Default, Copy, Clone, Debug)]
pub enum Side {
    /// Buy means the order wants to acquire the asset, matching against resting sells.
    #[default]
    Buy,
    /// Sell means the order wants to dispose of the asset, matching against resting buys.
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// OrderType determines how an order participates in matching and resting.
#[derive(PartialEq, Eq, Default, Copy, Clone, Debug)]
pub enum OrderType {
    /// Rests until fully filled or cancelled.
    #[default]
    GoodTillCancel,
    /// Has no limit price of its own; converted to a concrete price at submit time.
    Market,
    /// Takes whatever liquidity it can immediately and never rests; any residue is discarded.
    FillAndKill,
}

/// OrderStatus is carried on the order record and only ever advances forward:
/// `Active -> Cancelled` or `Active -> Filled`, never reverses.
#[derive(PartialEq, Eq, Default, Copy, Clone, Debug)]
pub enum OrderStatus {
    /// Live and eligible to be matched or cancelled.
    #[default]
    Active = 0,
    /// Cancelled before being fully filled.
    Cancelled = 1,
    /// Fully filled; remaining quantity is zero.
    Filled = 2,
}

impl From<u8> for OrderStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => OrderStatus::Active,
            1 => OrderStatus::Cancelled,
            2 => OrderStatus::Filled,
            _ => unreachable!("invalid order status"),
        }
    }
}

impl From<OrderStatus> for u8 {
    fn from(value: OrderStatus) -> u8 {
        value as u8
    }
}

/// Order is an immutable-identity, mutably-progressing node: both a resting (or
/// in-flight) order and the intrusive list node within its price level.
///
/// `id`, `side`, `order_type` and `initial_quantity` never change after construction.
/// `price`, `remaining`, `status`, `version`, `last_update` and `next` are mutated through
/// atomics with release-on-write / acquire-on-read ordering, as spelled out per-field below.
#[derive(Debug)]
pub struct Order {
    /// Identifier, assigned once by the book and never reused.
    pub id: OrderId,
    /// Side this order rests on (if it rests at all).
    pub side: Side,
    /// The order's original type; never changes (a market order stays `Market` even
    /// after its price has been set by conversion).
    pub order_type: OrderType,
    /// Quantity requested at submission time.
    pub initial_quantity: Quantity,

    price: AtomicI64,
    remaining: AtomicU64,
    status: AtomicU8,
    version: AtomicU32,
    last_update: AtomicU64,
    next: AtomicPtr<Order>,
}

impl Order {
    /// Builds a fresh, active order with the given parameters.
    pub fn new(
        order_type: OrderType,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        now: u64,
    ) -> Self {
        Order {
            id,
            side,
            order_type,
            initial_quantity: quantity,
            price: AtomicI64::new(price),
            remaining: AtomicU64::new(quantity),
            status: AtomicU8::new(OrderStatus::Active.into()),
            version: AtomicU32::new(0),
            last_update: AtomicU64::new(now),
            next: AtomicPtr::new(std::ptr::null_mut()),
        }
    }

    /// Current limit price. For an unconverted market order this is [`INVALID_PRICE`].
    #[inline]
    pub fn price(&self) -> Price {
        self.price.load(Ordering::Acquire)
    }

    /// Quantity not yet filled.
    #[inline]
    pub fn remaining(&self) -> Quantity {
        self.remaining.load(Ordering::Acquire)
    }

    /// Quantity filled so far: `initial_quantity - remaining`.
    #[inline]
    pub fn filled(&self) -> Quantity {
        self.initial_quantity - self.remaining()
    }

    /// Whether this order has been fully filled.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining() == 0
    }

    /// Current status.
    #[inline]
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from(self.status.load(Ordering::Acquire))
    }

    /// Current version. Bumped on every mutation that changes observable matching state.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version.load(Ordering::Acquire)
    }

    /// Microsecond timestamp of the last mutation.
    #[inline]
    pub fn last_update(&self) -> u64 {
        self.last_update.load(Ordering::Acquire)
    }

    #[inline]
    fn touch(&self, now: u64) {
        self.version.fetch_add(1, Ordering::Release);
        self.last_update.store(now, Ordering::Release);
    }

    /// Atomically decrements `remaining` by `quantity` via a compare-exchange loop.
    ///
    /// Fails (returns `false`, no state change) iff `quantity` exceeds the remaining
    /// quantity observed at the moment of the winning compare. On success, flips status
    /// to `Filled` once remaining hits zero. Safe to call from multiple concurrent
    /// matchers walking the same price level.
    pub fn try_fill(&self, quantity: Quantity) -> bool {
        let mut current = self.remaining.load(Ordering::Acquire);
        loop {
            if quantity > current {
                return false;
            }
            let new_remaining = current - quantity;
            match self.remaining.compare_exchange_weak(
                current,
                new_remaining,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if new_remaining == 0 {
                        self.status
                            .store(OrderStatus::Filled.into(), Ordering::Release);
                    }
                    self.touch(now_micros());
                    return true;
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Single-threaded variant of [`Order::try_fill`]: load, check, store with no retry loop.
    ///
    /// Defined behavior only when the caller can prove no concurrent mutator of
    /// `remaining` exists (e.g. a single-producer benchmark driving the book alone).
    /// Using this under contention is a correctness bug, not a panic: a concurrent
    /// winner's decrement can be silently clobbered.
    pub fn fast_fill(&self, quantity: Quantity) -> bool {
        let current = self.remaining.load(Ordering::Acquire);
        if quantity > current {
            return false;
        }
        let new_remaining = current - quantity;
        self.remaining.store(new_remaining, Ordering::Release);
        if new_remaining == 0 {
            self.status
                .store(OrderStatus::Filled.into(), Ordering::Release);
        }
        self.touch(now_micros());
        true
    }

    /// Converts a market order to a concrete limit price. Permitted only when the
    /// order's static type is `Market`; returns `false` and makes no change otherwise.
    /// Callers must convert at most once — idempotence across repeated calls is not
    /// guaranteed.
    pub fn convert_to_market_to_limit(&self, price: Price) -> bool {
        if self.order_type != OrderType::Market {
            return false;
        }
        self.price.store(price, Ordering::Release);
        self.touch(now_micros());
        true
    }

    /// Attempts `Active -> Cancelled`. Fails if the order is already `Cancelled` or `Filled`.
    pub fn try_cancel(&self) -> bool {
        match self.status.compare_exchange(
            OrderStatus::Active.into(),
            OrderStatus::Cancelled.into(),
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => {
                self.touch(now_micros());
                true
            }
            Err(_) => false,
        }
    }

    /// Loads the intrusive next-pointer (acquire).
    #[inline]
    pub fn get_next(&self) -> *mut Order {
        self.next.load(Ordering::Acquire)
    }

    /// Stores the intrusive next-pointer (release).
    #[inline]
    pub fn set_next(&self, next: *mut Order) {
        self.next.store(next, Ordering::Release);
    }

    /// Compare-and-swaps the intrusive next-pointer: release on success, acquire on failure.
    #[inline]
    pub fn compare_and_swap_next(&self, expected: *mut Order, desired: *mut Order) -> bool {
        self.next
            .compare_exchange_weak(expected, desired, Ordering::Release, Ordering::Acquire)
            .is_ok()
    }
}

// SAFETY: every field is either immutable after construction (Copy types) or
// accessed exclusively through atomics; no field requires external synchronization.
unsafe impl Sync for Order {}

/// Trade records one executed fill. `bid_order_id` is always the buy-side identifier
/// regardless of which side was the incoming (taker) order; `price` is the resting
/// level's price (price-taker convention).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trade {
    /// Identifier of the buy-side order in this fill.
    pub bid_order_id: OrderId,
    /// Identifier of the sell-side order in this fill.
    pub ask_order_id: OrderId,
    /// Execution price: the resting (maker) order's level price.
    pub price: Price,
    /// Quantity executed in this fill.
    pub quantity: Quantity,
}
