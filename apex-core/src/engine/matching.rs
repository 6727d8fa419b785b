use crate::engine::book::DefaultOrderBook;
use crate::engine::level::PriceLevel;
use crate::prelude::*;

/// Walks the opposite side of the book against `incoming`, filling both records
/// via CAS retry loops and emitting a [`Trade`] per fill. `incoming_level_idx` is
/// the price-level index `incoming` itself resolves to (already inserted, unless
/// it is `FillAndKill`).
///
/// The walk direction is determined by `incoming.side`: a buy walks ask levels
/// from the lowest index (best ask) up to and including its own level; a sell
/// walks bid levels from the highest index (best bid) down to and including its
/// own level. Levels with zero aggregate quantity are skipped without touching
/// their list.
pub(crate) fn match_incoming(
    book: &DefaultOrderBook,
    incoming: &Order,
    incoming_level_idx: usize,
) -> Vec<Trade> {
    let mut trades = Vec::new();
    let levels = book.levels(incoming.side.opposite());

    match incoming.side {
        Side::Buy => {
            for idx in 0..=incoming_level_idx {
                if incoming.remaining() == 0 {
                    break;
                }
                walk_level(&levels[idx], incoming, &mut trades);
            }
        }
        Side::Sell => {
            for idx in (incoming_level_idx..levels.len()).rev() {
                if incoming.remaining() == 0 {
                    break;
                }
                walk_level(&levels[idx], incoming, &mut trades);
            }
        }
    }

    trades
}

/// Walks a single price level's intrusive list, matching eligible makers against
/// `incoming` until either the level is exhausted or `incoming` is fully filled.
fn walk_level(level: &PriceLevel, incoming: &Order, trades: &mut Vec<Trade>) {
    if level.total_quantity() == 0 {
        return;
    }

    let mut node = level.head();
    while !node.is_null() {
        if incoming.remaining() == 0 {
            return;
        }
        // SAFETY: pool-allocated orders are never freed while the book is alive,
        // and a record's next-pointer is set before it is published to the list.
        let maker = unsafe { &*node };
        node = maker.get_next();

        if maker.order_type == OrderType::FillAndKill {
            // Defensive: FillAndKill orders are never inserted, so this should
            // be unreachable, but the walk must not treat one as restable.
            continue;
        }
        if maker.status() != OrderStatus::Active {
            continue;
        }

        loop {
            let maker_remaining = maker.remaining();
            if maker_remaining == 0 {
                // Already exhausted by a concurrent matcher; move to the next node.
                break;
            }
            let incoming_remaining = incoming.remaining();
            if incoming_remaining == 0 {
                return;
            }
            let quantity = maker_remaining.min(incoming_remaining);
            if !maker.try_fill(quantity) {
                // Lost the race for this maker; re-read and retry.
                continue;
            }
            let filled = incoming.try_fill(quantity);
            debug_assert!(filled, "incoming order is only mutated by its own matching walk");

            level.decrement_quantity(quantity);
            trades.push(trade_for(maker, incoming, maker.price(), quantity));
            break;
        }
    }
}

/// Builds the [`Trade`] record for a fill between `maker` and `incoming`,
/// orienting bid/ask identifiers by side and pricing at the maker's level.
fn trade_for(maker: &Order, incoming: &Order, price: Price, quantity: Quantity) -> Trade {
    let (bid_order_id, ask_order_id) = match maker.side {
        Side::Buy => (maker.id, incoming.id),
        Side::Sell => (incoming.id, maker.id),
    };
    Trade {
        bid_order_id,
        ask_order_id,
        price,
        quantity,
    }
}
