use apex_core::prelude::*;
use std::sync::Arc;

/// Builds a book pre-loaded with `count` resting sell orders spread evenly
/// across `[base_price, base_price + spread)`.
pub fn seeded_book(count: u64, base_price: Price, spread: i64) -> DefaultOrderBook {
    let book = DefaultOrderBook::new(Arc::new(EmptyOrderBookSyncer));
    for i in 0..count {
        let price = base_price + (i as i64 % spread);
        book.submit(OrderType::GoodTillCancel, Side::Sell, price, 10)
            .unwrap();
    }
    book
}
