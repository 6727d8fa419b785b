mod common;

use apex_core::prelude::*;
use common::new_book;

#[test]
fn market_buy_converts_to_the_current_best_ask() {
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Sell, 100, 10).unwrap();

    let trades = book.submit(OrderType::Market, Side::Buy, 0, 10).unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, 100);
    assert_eq!(book.best_ask_price(), INVALID_PRICE);
}

#[test]
fn market_sell_converts_to_the_current_best_bid() {
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Buy, 100, 10).unwrap();

    let trades = book.submit(OrderType::Market, Side::Sell, 0, 10).unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, 100);
    assert_eq!(book.best_bid_price(), INVALID_PRICE);
}

#[test]
fn market_order_rejected_on_empty_opposite_side() {
    let book = new_book();
    let err = book.submit(OrderType::Market, Side::Buy, 0, 10).unwrap_err();
    assert_eq!(err, RejectReason::InsufficientLiquidity);
}

#[test]
fn market_order_residue_rests_as_a_limit_at_its_converted_price() {
    // A market order only matches at the level it converted to; if that level
    // has less quantity than requested, the remainder rests there as an
    // ordinary limit order rather than being discarded like FillAndKill.
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Sell, 100, 4).unwrap();

    let trades = book.submit(OrderType::Market, Side::Buy, 0, 10).unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 4);
    assert_eq!(book.best_bid_price(), 100);
    assert_eq!(book.best_bid_quantity(), 6);
}

#[test]
fn market_order_does_not_sweep_past_its_converted_level() {
    let book = new_book();
    book.submit(OrderType::GoodTillCancel, Side::Sell, 100, 2).unwrap();
    book.submit(OrderType::GoodTillCancel, Side::Sell, 101, 100).unwrap();

    let trades = book.submit(OrderType::Market, Side::Buy, 0, 10).unwrap();
    assert_eq!(trades.len(), 1, "only the level it converted to (100) is matched");
    assert_eq!(trades[0].price, 100);
    assert_eq!(book.best_ask_price(), 101, "the deeper level is untouched");
}
