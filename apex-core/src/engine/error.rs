/// Represents possible rejections when submitting a new order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RejectReason {
    /// `price` fell outside `[MIN_PRICE, MAX_PRICE]`.
    RangeError,
    /// The order's identifier hashed to an order-table slot already held by a
    /// different live order.
    TableCollision,
    /// A market order found no resting liquidity on the opposite side to convert
    /// its price against.
    InsufficientLiquidity,
}
