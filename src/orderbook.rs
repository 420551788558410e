//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Limit order book for a single instrument, maintaining bids and asks in
// price-time priority and running the matching algorithm on submission.
//
// | Component     | Description                                                               |
// |---------------|---------------------------------------------------------------------------|
// | PriceLevel    | FIFO queue of order ids resting at one price                              |
// | OrderBook     | Two BTreeMaps of price levels, the id index, and the trade log            |
//
// Structure follows the classic shape: O(log P) price-level lookup through
// BTreeMap keys, FIFO VecDeques for time priority within a level. The id
// index is a plain HashMap owning every resting order; the matcher is the
// only mutator, so no concurrent map is needed. Queues store ids, not orders,
// which is what makes lazy cancellation cheap: cancel flips the status in the
// index and the stale queue entry is evicted the next time matching peeks at
// it.
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                                 | Return Type             |
// |-----------------------|---------------------------------------------|-------------------------|
// | submit                | Match an incoming order, rest the remainder | Vec<Trade>              |
// | cancel                | Mark an order canceled (lazy removal)       | bool                    |
// | lookup                | Snapshot of an indexed order                | Option<&Order>          |
// | best_bid / best_ask   | Top of book with visible quantity           | Option<(Price, Qty)>    |
// | resting_orders        | Live order count for one side               | usize                   |
// | trades / trade_count  | Cumulative trade log                        | &[Trade] / usize        |
//--------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::types::{Order, Price, Qty, Side, Trade};

/// Orders resting at a single price, in arrival order.
#[derive(Debug, Default)]
struct PriceLevel {
    /// FIFO queue of order ids. Entries may be stale (canceled or filled);
    /// matching evicts them when it reaches them.
    queue: VecDeque<String>,
}

/// The order book. All mutation happens on the matcher's thread; the book has
/// no interior locking.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Bid levels; best bid is the largest key.
    bids: BTreeMap<Price, PriceLevel>,
    /// Ask levels; best ask is the smallest key.
    asks: BTreeMap<Price, PriceLevel>,
    /// Id index owning every order that is, or recently was, resting.
    orders: HashMap<String, Order>,
    /// Append-only log of every trade this book has produced.
    trades: Vec<Trade>,
}

impl OrderBook {
    pub fn new() -> OrderBook {
        OrderBook::default()
    }

    /// Processes an incoming order: matches it against the opposing side and
    /// rests any remainder at its limit price. Returns the trades produced by
    /// this submission, which are also appended to the cumulative trade log.
    ///
    /// After this returns the book is never crossed: either one side is empty
    /// or best bid < best ask.
    pub fn submit(&mut self, mut order: Order) -> Vec<Trade> {
        let produced = self.match_incoming(&mut order);

        if order.is_live() {
            let own_side = match order.side() {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            own_side
                .entry(order.limit_price())
                .or_default()
                .queue
                .push_back(order.id().to_string());
            self.orders.insert(order.id().to_string(), order);
        }

        self.trades.extend(produced.iter().cloned());
        produced
    }

    /// Price-time-priority match of `taker` against the opposing side.
    ///
    /// Walks opposing levels best-price-first while the limit crosses, and
    /// each level's FIFO front-to-back. The execution price is always the
    /// resting order's price: improvement accrues to the taker.
    fn match_incoming(&mut self, taker: &mut Order) -> Vec<Trade> {
        let mut produced = Vec::new();
        let taker_side = taker.side();
        let opp = match taker_side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };

        while taker.remaining_qty() > 0 {
            let best_price = match taker_side {
                Side::Buy => opp.keys().next().copied(),
                Side::Sell => opp.keys().next_back().copied(),
            };
            let Some(best_price) = best_price else {
                break;
            };

            let crosses = match taker_side {
                Side::Buy => taker.limit_price() >= best_price,
                Side::Sell => taker.limit_price() <= best_price,
            };
            if !crosses {
                break;
            }

            // Walk the FIFO at the best price.
            while taker.remaining_qty() > 0 {
                let Some(level) = opp.get_mut(&best_price) else {
                    break;
                };
                let Some(head_id) = level.queue.front().cloned() else {
                    break;
                };

                match self.orders.get_mut(&head_id) {
                    Some(maker) if maker.is_live() => {
                        let qty = taker.remaining_qty().min(maker.remaining_qty());
                        taker.fill(qty);
                        maker.fill(qty);

                        let (buy_id, sell_id) = match taker_side {
                            Side::Buy => (taker.id(), maker.id()),
                            Side::Sell => (maker.id(), taker.id()),
                        };
                        produced.push(Trade {
                            buy_order_id: buy_id.to_string(),
                            sell_order_id: sell_id.to_string(),
                            price: best_price,
                            quantity: qty,
                        });

                        if !maker.is_live() {
                            level.queue.pop_front();
                            self.orders.remove(&head_id);
                        }
                    }
                    // Stale entry: canceled or already filled. Evict it and
                    // drop the terminal order from the id index.
                    _ => {
                        level.queue.pop_front();
                        self.orders.remove(&head_id);
                    }
                }
            }

            if opp.get(&best_price).is_some_and(|level| level.queue.is_empty()) {
                opp.remove(&best_price);
            }
        }

        produced
    }

    /// Cancels the order with the given id. Returns true only if the order
    /// was still cancelable (Open or PartiallyFilled). The queue entry stays
    /// where it is and is evicted lazily when matching next reaches it.
    pub fn cancel(&mut self, id: &str) -> bool {
        match self.orders.get_mut(id) {
            Some(order) if !order.status().is_terminal() => {
                order.cancel();
                true
            }
            _ => false,
        }
    }

    /// Snapshot of an indexed order. Terminal orders disappear from here once
    /// matching has encountered them, and a fully filled incoming order is
    /// never indexed at all.
    pub fn lookup(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Best bid with its visible quantity, skipping stale queue entries.
    pub fn best_bid(&self) -> Option<(Price, Qty)> {
        self.best_visible(self.bids.iter().rev())
    }

    /// Best ask with its visible quantity, skipping stale queue entries.
    pub fn best_ask(&self) -> Option<(Price, Qty)> {
        self.best_visible(self.asks.iter())
    }

    fn best_visible<'a>(
        &'a self,
        levels: impl Iterator<Item = (&'a Price, &'a PriceLevel)>,
    ) -> Option<(Price, Qty)> {
        for (price, level) in levels {
            let visible: Qty = level
                .queue
                .iter()
                .filter_map(|id| self.orders.get(id))
                .filter(|order| order.is_live())
                .map(|order| order.remaining_qty())
                .sum();
            if visible > 0 {
                return Some((*price, visible));
            }
        }
        None
    }

    /// Number of live resting orders on one side.
    pub fn resting_orders(&self, side: Side) -> usize {
        self.orders
            .values()
            .filter(|order| order.side() == side && order.is_live())
            .count()
    }

    /// Every trade this book has produced, in execution order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}
