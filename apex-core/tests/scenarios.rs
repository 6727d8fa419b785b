mod common;

use apex_core::prelude::*;
use common::new_book;

#[test]
fn bid_then_cross() {
    let book = new_book();
    let trades = book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 1000).unwrap();
    assert!(trades.is_empty());
    assert_eq!((book.best_bid_price(), book.best_bid_quantity()), (100, 1000));
    assert_eq!((book.best_ask_price(), book.best_ask_quantity()), (INVALID_PRICE, 0));

    let trades = book.submit(OrderType::GoodTillCancel, Side::Sell, 100, 500).unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(
        trades[0],
        Trade { bid_order_id: 1, ask_order_id: 2, price: 100, quantity: 500 }
    );
    assert_eq!((book.best_bid_price(), book.best_bid_quantity()), (100, 500));
    assert_eq!((book.best_ask_price(), book.best_ask_quantity()), (INVALID_PRICE, 0));
}

#[test]
fn exact_cross() {
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 1000).unwrap();
    let trades = book.submit(OrderType::GoodTillCancel, Side::Sell, 100, 1000).unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 1000);
    assert_eq!(book.best_bid_price(), INVALID_PRICE);
    assert_eq!(book.best_ask_price(), INVALID_PRICE);
}

#[test]
fn partial_through_multiple_makers_lifo() {
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 200).unwrap(); // id 1
    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 300).unwrap(); // id 2
    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 500).unwrap(); // id 3

    let trades = book.submit(OrderType::GoodTillCancel, Side::Sell, 100, 600).unwrap();
    let total: Quantity = trades.iter().map(|t| t.quantity).sum();
    assert_eq!(total, 600);

    // LIFO: newest bid (id 3) consumed first, then id 2, then id 1 partially.
    assert_eq!(trades[0].bid_order_id, 3);
    assert_eq!(trades[0].quantity, 500);
    assert_eq!(trades[1].bid_order_id, 2);
    assert_eq!(trades[1].quantity, 100);
    assert_eq!(trades.len(), 2);
    assert_eq!(book.best_bid_quantity(), 200, "id 2 has 200 remaining");
}

#[test]
fn fill_and_kill_no_residue_against_empty_book() {
    let book = new_book();
    let trades = book.submit(OrderType::FillAndKill, Side::Sell, 100, 1000).unwrap();
    assert!(trades.is_empty());
    assert_eq!(book.best_ask_price(), INVALID_PRICE);
    assert_eq!(book.best_ask_quantity(), 0);
}

#[test]
fn fill_and_kill_with_residue_is_discarded() {
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 400).unwrap();
    let trades = book.submit(OrderType::FillAndKill, Side::Sell, 100, 1000).unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 400);
    assert_eq!(book.best_bid_price(), INVALID_PRICE);
    assert_eq!(book.best_ask_price(), INVALID_PRICE, "the 600 residue never rests");
}

#[test]
fn cancel_of_filled_orders_always_misses() {
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 1000).unwrap();
    book.submit(OrderType::GoodTillCancel, Side::Sell, 100, 1000).unwrap();

    assert!(!book.cancel(1));
    assert!(!book.cancel(2));
}
