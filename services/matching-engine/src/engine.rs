//! Matching engine core
//!
//! Takes an incoming order and either matches it against the resting
//! book, rests it, or both. The book, order index, and trade log sit
//! behind one exclusive lock; counters that readers may observe while
//! mutators run are atomic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::time::monotonic_ns;
use types::trade::Trade;

use crate::book::{AskBook, BidBook};
use crate::matching::{crossing, TradeExecutor};

/// Result of submitting an order
///
/// An incoming order moves Arriving → Matching → one of these terminal
/// states. A Market order can never be Resting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// Order was completely filled
    Filled { trades: Vec<Trade> },
    /// Order rested on its own side (a Limit order with remainder)
    Resting { trades: Vec<Trade> },
    /// Unfilled Market remainder was discarded
    Dropped { trades: Vec<Trade>, unfilled: Quantity },
}

impl SubmitResult {
    /// Trades produced by this submission, in match order
    pub fn trades(&self) -> &[Trade] {
        match self {
            SubmitResult::Filled { trades }
            | SubmitResult::Resting { trades }
            | SubmitResult::Dropped { trades, .. } => trades,
        }
    }
}

/// Book state guarded by the engine lock
#[derive(Debug)]
struct Books {
    bids: BidBook,
    asks: AskBook,
    /// order_id → (price, side); an id is present iff the order rests
    order_index: HashMap<OrderId, (Price, Side)>,
    /// Append-only trade log in linearisation order
    trade_log: Vec<Trade>,
    executor: TradeExecutor,
}

/// Price-time priority matching engine
///
/// Thread-safe: submissions and cancels from any number of threads are
/// linearised by the engine lock.
#[derive(Debug)]
pub struct MatchingEngine {
    books: Mutex<Books>,
    orders_processed: AtomicU64,
    trades_matched: AtomicU64,
    total_processing_ns: AtomicU64,
}

impl MatchingEngine {
    /// Create a new empty engine
    pub fn new() -> Self {
        Self {
            books: Mutex::new(Books {
                bids: BidBook::new(),
                asks: AskBook::new(),
                order_index: HashMap::new(),
                trade_log: Vec::new(),
                executor: TradeExecutor::new(1),
            }),
            orders_processed: AtomicU64::new(0),
            trades_matched: AtomicU64::new(0),
            total_processing_ns: AtomicU64::new(0),
        }
    }

    /// Submit an order to the engine
    ///
    /// Market orders match until exhausted or the opposite side empties;
    /// the remainder is dropped. Limit orders match while the front
    /// resting order crosses, then rest any remainder. Submitting a
    /// well-formed order cannot fail.
    pub fn submit(&self, mut order: Order) -> SubmitResult {
        let start = Instant::now();
        let result = {
            let mut books = self.books.lock().expect("engine lock poisoned");
            let trades = Self::match_incoming(&mut books, &mut order);

            if order.is_filled() {
                SubmitResult::Filled { trades }
            } else if order.order_type == OrderType::Market {
                // A Market order is never rested
                SubmitResult::Dropped {
                    trades,
                    unfilled: order.remaining_quantity,
                }
            } else {
                books
                    .order_index
                    .insert(order.order_id, (order.price, order.side));
                match order.side {
                    Side::Buy => books.bids.insert(&order),
                    Side::Sell => books.asks.insert(&order),
                }
                SubmitResult::Resting { trades }
            }
        };

        self.trades_matched
            .fetch_add(result.trades().len() as u64, Ordering::Relaxed);
        self.total_processing_ns
            .fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
        self.orders_processed.fetch_add(1, Ordering::Relaxed);

        result
    }

    /// Match the incoming order against the opposite side of the book
    fn match_incoming(books: &mut Books, order: &mut Order) -> Vec<Trade> {
        let mut trades = Vec::new();

        while !order.is_filled() {
            let front = match order.side {
                Side::Buy => books.asks.peek_best(),
                Side::Sell => books.bids.peek_best(),
            };
            let Some((resting_price, resting_id, resting_qty)) = front else {
                break;
            };
            if !crossing::crosses(order, resting_price) {
                break;
            }

            let fill = order.remaining_quantity.min(resting_qty);
            let trade =
                books
                    .executor
                    .execute(order, resting_id, resting_price, fill, monotonic_ns());
            books.trade_log.push(trade);
            trades.push(trade);

            order.fill(fill);
            let remaining_after = match order.side {
                Side::Buy => books.asks.fill_best(fill),
                Side::Sell => books.bids.fill_best(fill),
            };
            if matches!(remaining_after, Some(q) if q.is_zero()) {
                books.order_index.remove(&resting_id);
            }
        }

        trades
    }

    /// Cancel a resting order by id
    ///
    /// Returns false for an unknown id; that is not an error.
    pub fn cancel(&self, order_id: OrderId) -> bool {
        let mut books = self.books.lock().expect("engine lock poisoned");

        let Some(&(price, side)) = books.order_index.get(&order_id) else {
            return false;
        };

        let removed = match side {
            Side::Buy => books.bids.remove(&order_id, price),
            Side::Sell => books.asks.remove(&order_id, price),
        };
        if removed {
            books.order_index.remove(&order_id);
        }
        removed
    }

    /// One consistent snapshot of (best bid, best ask), zero sentinels
    /// when a side is empty
    pub fn best_bid_ask(&self) -> (Price, Price) {
        let books = self.books.lock().expect("engine lock poisoned");
        (books.bids.best_price(), books.asks.best_price())
    }

    /// Copy of the full trade log, in linearisation order
    pub fn trades(&self) -> Vec<Trade> {
        let books = self.books.lock().expect("engine lock poisoned");
        books.trade_log.clone()
    }

    /// The most recent `count` trades, oldest first
    pub fn recent_trades(&self, count: usize) -> Vec<Trade> {
        let books = self.books.lock().expect("engine lock poisoned");
        let skip = books.trade_log.len().saturating_sub(count);
        books.trade_log[skip..].to_vec()
    }

    /// Number of orders currently resting in the book
    pub fn resting_orders(&self) -> usize {
        let books = self.books.lock().expect("engine lock poisoned");
        books.order_index.len()
    }

    /// Orders processed through `submit`
    pub fn orders_processed(&self) -> u64 {
        self.orders_processed.load(Ordering::Relaxed)
    }

    /// Trades matched
    pub fn trades_matched(&self) -> u64 {
        self.trades_matched.load(Ordering::Relaxed)
    }

    /// Average nanoseconds spent inside `submit`
    pub fn average_processing_ns(&self) -> f64 {
        let orders = self.orders_processed.load(Ordering::Relaxed);
        if orders == 0 {
            return 0.0;
        }
        self.total_processing_ns.load(Ordering::Relaxed) as f64 / orders as f64
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
