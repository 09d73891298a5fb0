//! Market-data consumers
//!
//! A tagged-variant enumeration over everything that observes the order
//! stream: the momentum strategy (which may append a signal order) and a
//! passive sampler used for diagnostics. Each variant supports the same
//! three observer operations: batch update, trade, and quote.

use strategy::{MomentumStrategy, SignalRecord};
use types::numeric::Price;
use types::order::Order;
use types::trade::Trade;

/// A consumer of the market-data stream
pub enum MarketDataConsumer {
    /// The momentum strategy; may append one signal order per batch
    Strategy(MomentumStrategy),
    /// Passive observer tracking the last trade and quote
    Sampler(QuoteSampler),
}

impl MarketDataConsumer {
    /// Observe a batch, returning it (possibly extended by one signal
    /// order)
    pub fn on_batch(&mut self, orders: Vec<Order>) -> Vec<Order> {
        match self {
            MarketDataConsumer::Strategy(strategy) => strategy.process_batch(orders),
            MarketDataConsumer::Sampler(sampler) => {
                sampler.observe_batch(&orders);
                orders
            }
        }
    }

    /// Observe an executed trade
    pub fn on_trade(&mut self, trade: &Trade) {
        match self {
            // The strategy reads the order stream, not the tape
            MarketDataConsumer::Strategy(_) => {}
            MarketDataConsumer::Sampler(sampler) => sampler.record_trade(trade),
        }
    }

    /// Observe the current best bid/ask
    pub fn on_quote(&mut self, bid: Price, ask: Price) {
        match self {
            MarketDataConsumer::Strategy(_) => {}
            MarketDataConsumer::Sampler(sampler) => sampler.record_quote(bid, ask),
        }
    }

    /// Take the signal produced by the most recent batch, if this
    /// consumer produces signals
    pub fn take_signal(&mut self) -> Option<SignalRecord> {
        match self {
            MarketDataConsumer::Strategy(strategy) => strategy.take_signal(),
            MarketDataConsumer::Sampler(_) => None,
        }
    }
}

/// Passive sampler over trades and quotes
#[derive(Debug)]
pub struct QuoteSampler {
    last_trade: Option<Trade>,
    last_bid: Price,
    last_ask: Price,
    trades_seen: u64,
    batches_seen: u64,
}

impl QuoteSampler {
    pub fn new() -> Self {
        Self {
            last_trade: None,
            last_bid: Price::zero(),
            last_ask: Price::zero(),
            trades_seen: 0,
            batches_seen: 0,
        }
    }

    fn observe_batch(&mut self, _orders: &[Order]) {
        self.batches_seen += 1;
    }

    fn record_trade(&mut self, trade: &Trade) {
        self.last_trade = Some(*trade);
        self.trades_seen += 1;
    }

    fn record_quote(&mut self, bid: Price, ask: Price) {
        self.last_bid = bid;
        self.last_ask = ask;
    }

    /// Most recent trade observed
    pub fn last_trade(&self) -> Option<&Trade> {
        self.last_trade.as_ref()
    }

    /// Most recent quote observed
    pub fn last_quote(&self) -> (Price, Price) {
        (self.last_bid, self.last_ask)
    }

    pub fn trades_seen(&self) -> u64 {
        self.trades_seen
    }

    pub fn batches_seen(&self) -> u64 {
        self.batches_seen
    }
}

impl Default for QuoteSampler {
    fn default() -> Self {
        Self::new()
    }
}
