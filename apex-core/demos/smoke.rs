//! Diagnostic binary exercising the book end to end: a resting bid, a crossing
//! ask, and the resulting best-bid/ask and trade printed to stdout.

use apex_core::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let book = DefaultOrderBook::new(Arc::new(EmptyOrderBookSyncer));

    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 1_000)
        .expect("bid accepted");
    println!(
        "after bid: best_bid={}/{} best_ask={}/{}",
        book.best_bid_price(),
        book.best_bid_quantity(),
        book.best_ask_price(),
        book.best_ask_quantity()
    );

    let trades = book
        .submit(OrderType::GoodTillCancel, Side::Sell, 100, 500)
        .expect("ask accepted");
    for trade in &trades {
        println!(
            "trade: bid={} ask={} price={} qty={}",
            trade.bid_order_id, trade.ask_order_id, trade.price, trade.quantity
        );
    }
    println!(
        "after cross: best_bid={}/{} best_ask={}/{}",
        book.best_bid_price(),
        book.best_bid_quantity(),
        book.best_ask_price(),
        book.best_ask_quantity()
    );
}
