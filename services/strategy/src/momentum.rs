//! Momentum trading strategy
//!
//! Maintains bounded price/volume histories over the Market-type portion
//! of the order stream, an open-position flag, and the last signal
//! record. Produces at most one signal order per batch. Single-owner
//! state: one pipeline lane owns the strategy.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use types::ids::OrderIdGenerator;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::time::monotonic_ns;

use crate::indicators;
use crate::signal::{Signal, SignalRecord};

/// History cap; the oldest point is evicted beyond this
const HISTORY_CAP: usize = 1000;

/// MACD periods (fast, slow, signal)
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

/// Momentum strategy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Minimum momentum score to open a long
    pub momentum_threshold: f64,
    /// RSI lower band
    pub rsi_oversold: f64,
    /// RSI upper band; entries require RSI below it, holdings exit above
    pub rsi_overbought: f64,
    /// Short SMA window
    pub short_period: usize,
    /// Long SMA window; also the minimum history before any signal
    pub long_period: usize,
    /// RSI window
    pub rsi_period: usize,
    /// Quantity used for every produced order
    pub position_size: u64,
    /// Exit band below entry, percent
    pub stop_loss_pct: f64,
    /// Exit band above entry, percent
    pub take_profit_pct: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            momentum_threshold: 0.3,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            short_period: 5,
            long_period: 20,
            rsi_period: 14,
            position_size: 50,
            stop_loss_pct: 2.0,
            take_profit_pct: 4.0,
        }
    }
}

/// Momentum strategy over the incoming order stream
pub struct MomentumStrategy {
    config: StrategyConfig,
    ids: Arc<OrderIdGenerator>,
    /// Prices of observed Market-type inputs, major units, newest last
    price_history: VecDeque<f64>,
    /// Matching volumes
    volume_history: VecDeque<u64>,
    /// Minor-unit price of the newest observation
    last_price: Price,
    in_position: bool,
    entry_price: f64,
    /// Signal produced by the most recent batch, taken by the caller
    pending_signal: Option<SignalRecord>,
    /// Cached last non-Hold signal
    last_signal: Option<SignalRecord>,
    signals_generated: u64,
}

impl MomentumStrategy {
    /// Create a strategy sharing the given order id generator
    pub fn new(config: StrategyConfig, ids: Arc<OrderIdGenerator>) -> Self {
        Self {
            config,
            ids,
            price_history: VecDeque::with_capacity(HISTORY_CAP),
            volume_history: VecDeque::with_capacity(HISTORY_CAP),
            last_price: Price::zero(),
            in_position: false,
            entry_price: 0.0,
            pending_signal: None,
            last_signal: None,
            signals_generated: 0,
        }
    }

    /// Consume a batch, then append at most one signal order to it
    ///
    /// Market-type inputs update the histories; Limit inputs pass through
    /// unobserved. The returned batch is the input batch plus the signal
    /// order, if any.
    pub fn process_batch(&mut self, mut orders: Vec<Order>) -> Vec<Order> {
        for order in &orders {
            if order.order_type == OrderType::Market {
                self.observe(order.price, order.quantity);
            }
        }

        if let Some(order) = self.evaluate() {
            orders.push(order);
        }
        orders
    }

    /// Record one traded price/volume observation
    fn observe(&mut self, price: Price, quantity: Quantity) {
        if self.price_history.len() == HISTORY_CAP {
            self.price_history.pop_front();
            self.volume_history.pop_front();
        }
        self.price_history.push_back(price.to_major());
        self.volume_history.push_back(quantity.as_u64());
        self.last_price = price;
    }

    /// Evaluate the indicator state and produce a signal order if
    /// actionable
    fn evaluate(&mut self) -> Option<Order> {
        if self.price_history.len() < self.config.long_period {
            // Insufficient history: no order, no signal
            return None;
        }
        let p = *self.price_history.back()?;

        let momentum = indicators::momentum_score(
            &self.price_history,
            self.config.short_period,
            self.config.long_period,
        );
        let rsi = indicators::rsi(&self.price_history, self.config.rsi_period);
        let (macd_line, signal_line) =
            indicators::macd(&self.price_history, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
        let short_sma = indicators::sma(&self.price_history, self.config.short_period);
        let macd_bullish = macd_line > signal_line;

        if self.in_position {
            let pnl_pct = (p - self.entry_price) / self.entry_price * 100.0;

            if pnl_pct <= -self.config.stop_loss_pct {
                let reason = format!("Stop Loss triggered at {:.2}%", pnl_pct);
                return Some(self.exit_position(reason, pnl_pct, momentum, rsi, macd_line, signal_line));
            }
            if pnl_pct >= self.config.take_profit_pct {
                let reason = format!("Take Profit triggered at {:.2}%", pnl_pct);
                return Some(self.exit_position(reason, pnl_pct, momentum, rsi, macd_line, signal_line));
            }

            // Soft exit: any one deteriorating indicator closes the long
            if momentum < 0.0
                || rsi > self.config.rsi_overbought
                || !macd_bullish
                || p < short_sma
            {
                let reason = indicator_reason(momentum, rsi, macd_bullish, p, short_sma);
                return Some(self.exit_position(reason, pnl_pct, momentum, rsi, macd_line, signal_line));
            }

            return None;
        }

        // Entry requires every condition aligned
        if momentum > self.config.momentum_threshold
            && rsi < self.config.rsi_overbought
            && macd_bullish
            && p > short_sma
        {
            self.in_position = true;
            self.entry_price = p;

            let record = SignalRecord {
                signal: Signal::Buy,
                reason: indicator_reason(momentum, rsi, macd_bullish, p, short_sma),
                confidence: self.confidence(momentum, rsi, macd_line, signal_line),
                realized_pnl_pct: None,
            };
            info!(price = p, confidence = record.confidence, "opening long");
            return Some(self.emit(Side::Buy, record));
        }

        None
    }

    /// Close the open position with a Sell signal order
    fn exit_position(
        &mut self,
        reason: String,
        pnl_pct: f64,
        momentum: f64,
        rsi: f64,
        macd_line: f64,
        signal_line: f64,
    ) -> Order {
        self.in_position = false;

        let record = SignalRecord {
            signal: Signal::Sell,
            reason,
            confidence: self.confidence(momentum, rsi, macd_line, signal_line),
            realized_pnl_pct: Some(pnl_pct),
        };
        info!(pnl_pct, "closing long");
        self.emit(Side::Sell, record)
    }

    /// Build the signal order and record the decision
    fn emit(&mut self, side: Side, record: SignalRecord) -> Order {
        self.pending_signal = Some(record.clone());
        self.last_signal = Some(record);
        self.signals_generated += 1;

        Order::new(
            self.ids.next_id(),
            side,
            OrderType::Market,
            self.last_price,
            Quantity::new(self.config.position_size),
            monotonic_ns(),
        )
    }

    /// Weighted signal confidence in [0, 1]
    ///
    /// Momentum 0.4, RSI distance from 50 0.3, MACD divergence 0.3; the
    /// MACD divergence saturates at 0.1 major units.
    fn confidence(&self, momentum: f64, rsi: f64, macd_line: f64, signal_line: f64) -> f64 {
        let momentum_component = momentum.abs().min(1.0);
        let rsi_component = ((rsi - 50.0).abs() / 50.0).min(1.0);
        let macd_component = ((macd_line - signal_line).abs() * 10.0).min(1.0);
        0.4 * momentum_component + 0.3 * rsi_component + 0.3 * macd_component
    }

    /// Take the signal produced by the most recent batch, if any
    pub fn take_signal(&mut self) -> Option<SignalRecord> {
        self.pending_signal.take()
    }

    /// Cached last non-Hold signal
    pub fn last_signal(&self) -> Option<&SignalRecord> {
        self.last_signal.as_ref()
    }

    pub fn is_in_position(&self) -> bool {
        self.in_position
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn price_history_len(&self) -> usize {
        self.price_history.len()
    }

    pub fn volume_history_len(&self) -> usize {
        self.volume_history.len()
    }

    pub fn signals_generated(&self) -> u64 {
        self.signals_generated
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }
}

/// Reason string enumerating the indicator values behind a decision
fn indicator_reason(momentum: f64, rsi: f64, macd_bullish: bool, price: f64, short_sma: f64) -> String {
    format!(
        "Momentum: {:.2}, RSI: {:.2}, MACD: {}, Price vs MA: {} ({:.2} vs {:.2})",
        momentum,
        rsi,
        if macd_bullish { "Bullish" } else { "Bearish" },
        if price > short_sma { "Above" } else { "Below" },
        price,
        short_sma,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::OrderId;

    fn strategy(config: StrategyConfig) -> MomentumStrategy {
        MomentumStrategy::new(config, Arc::new(OrderIdGenerator::new(10_000)))
    }

    fn market_order(id: u64, price_minor: u64, qty: u64) -> Order {
        Order::new(
            OrderId::from_u64(id),
            Side::Buy,
            OrderType::Market,
            Price::from_minor(price_minor),
            Quantity::new(qty),
            0,
        )
    }

    fn limit_order(id: u64, price_minor: u64, qty: u64) -> Order {
        Order::new(
            OrderId::from_u64(id),
            Side::Buy,
            OrderType::Limit,
            Price::from_minor(price_minor),
            Quantity::new(qty),
            0,
        )
    }

    /// Rising two-step series with accelerating up-legs: momentum > 0.25,
    /// RSI ≈ 65, MACD bullish, last price above the short SMA.
    fn aligned_buy_prices() -> Vec<u64> {
        let mut prices = Vec::new();
        let mut p: u64 = 10000;
        for i in 0..61u64 {
            if i % 2 == 0 {
                p += 40 + i;
            } else {
                p -= 50;
            }
            prices.push(p);
        }
        prices
    }

    #[test]
    fn test_no_signal_below_warmup() {
        let mut strategy = strategy(StrategyConfig::default());

        for i in 0..19 {
            let out = strategy.process_batch(vec![market_order(i, 10000, 1)]);
            assert_eq!(out.len(), 1, "warmup must not add orders");
        }
        assert!(strategy.take_signal().is_none());
        assert!(strategy.last_signal().is_none());
        assert_eq!(strategy.price_history_len(), 19);
    }

    #[test]
    fn test_limit_inputs_are_not_observed() {
        let mut strategy = strategy(StrategyConfig::default());
        strategy.process_batch(vec![limit_order(1, 10000, 1), market_order(2, 10100, 2)]);

        assert_eq!(strategy.price_history_len(), 1);
        assert_eq!(strategy.volume_history_len(), 1);
    }

    #[test]
    fn test_history_cap_evicts_oldest() {
        let mut strategy = strategy(StrategyConfig::default());
        // Alternate up/down so no position opens while filling
        for i in 0..1100u64 {
            let price = if i % 2 == 0 { 10000 } else { 9000 };
            strategy.process_batch(vec![market_order(i, price, 1)]);
        }
        assert_eq!(strategy.price_history_len(), 1000);
        assert_eq!(strategy.volume_history_len(), 1000);
    }

    #[test]
    fn test_all_conditions_buy_opens_position() {
        let config = StrategyConfig {
            momentum_threshold: 0.25,
            rsi_overbought: 75.0,
            position_size: 100,
            ..Default::default()
        };
        let mut strategy = strategy(config);

        let prices = aligned_buy_prices();
        let last = *prices.last().unwrap();
        let batch: Vec<Order> = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| market_order(i as u64, price, 1))
            .collect();
        let input_len = batch.len();

        let out = strategy.process_batch(batch);
        assert_eq!(out.len(), input_len + 1, "exactly one signal order appended");

        let signal_order = out.last().unwrap();
        assert_eq!(signal_order.side, Side::Buy);
        assert_eq!(signal_order.order_type, OrderType::Market);
        assert_eq!(signal_order.quantity, Quantity::new(100));
        assert_eq!(signal_order.price, Price::from_minor(last));

        assert!(strategy.is_in_position());
        assert_eq!(strategy.entry_price(), Price::from_minor(last).to_major());

        let record = strategy.take_signal().unwrap();
        assert_eq!(record.signal, Signal::Buy);
        assert!(record.reason.contains("MACD: Bullish"));
        assert!(record.reason.contains("Price vs MA: Above"));
        assert!((0.0..=1.0).contains(&record.confidence));
        assert!(record.realized_pnl_pct.is_none());

        // take_signal is one-shot; the cache persists
        assert!(strategy.take_signal().is_none());
        assert_eq!(strategy.last_signal().unwrap().signal, Signal::Buy);
    }

    #[test]
    fn test_stop_loss_exit() {
        let config = StrategyConfig {
            stop_loss_pct: 1.5,
            ..Default::default()
        };
        let mut strategy = strategy(config);

        // Flat warmup around the entry price
        for i in 0..30u64 {
            strategy.process_batch(vec![market_order(i, 10000, 1)]);
        }
        strategy.in_position = true;
        strategy.entry_price = 100.0;

        // 98.49: −1.51% breaches the 1.5% stop
        let out = strategy.process_batch(vec![market_order(99, 9849, 1)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].side, Side::Sell);
        assert!(!strategy.is_in_position());

        let record = strategy.take_signal().unwrap();
        assert_eq!(record.signal, Signal::Sell);
        assert!(record.reason.starts_with("Stop Loss triggered"));
        let pnl = record.realized_pnl_pct.unwrap();
        assert!((pnl + 1.51).abs() < 0.01, "got {}", pnl);
    }

    #[test]
    fn test_take_profit_exit() {
        let config = StrategyConfig {
            take_profit_pct: 3.0,
            ..Default::default()
        };
        let mut strategy = strategy(config);

        for i in 0..30u64 {
            strategy.process_batch(vec![market_order(i, 10000, 1)]);
        }
        strategy.in_position = true;
        strategy.entry_price = 100.0;

        let out = strategy.process_batch(vec![market_order(99, 10310, 1)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].side, Side::Sell);

        let record = strategy.take_signal().unwrap();
        assert!(record.reason.starts_with("Take Profit triggered"));
        let pnl = record.realized_pnl_pct.unwrap();
        assert!((pnl - 3.1).abs() < 0.01, "got {}", pnl);
    }

    #[test]
    fn test_soft_exit_on_deteriorating_indicators() {
        let mut strategy = strategy(StrategyConfig::default());

        // Flat series: momentum is negative (last not above the SMA), so
        // any open position is closed on the next evaluation
        for i in 0..30u64 {
            strategy.process_batch(vec![market_order(i, 10000, 1)]);
        }
        strategy.in_position = true;
        strategy.entry_price = 100.0;

        let out = strategy.process_batch(vec![market_order(99, 10000, 1)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].side, Side::Sell);

        let record = strategy.take_signal().unwrap();
        assert_eq!(record.signal, Signal::Sell);
        assert!(record.reason.contains("Momentum:"));
        assert!(record.realized_pnl_pct.is_some());
    }

    #[test]
    fn test_flat_market_produces_no_entry() {
        let mut strategy = strategy(StrategyConfig::default());

        for i in 0..100u64 {
            let out = strategy.process_batch(vec![market_order(i, 10000, 1)]);
            assert_eq!(out.len(), 1);
        }
        assert!(!strategy.is_in_position());
        assert_eq!(strategy.signals_generated(), 0);
    }

    #[test]
    fn test_signal_order_ids_are_fresh() {
        let config = StrategyConfig {
            momentum_threshold: 0.25,
            rsi_overbought: 75.0,
            ..Default::default()
        };
        let mut strategy = strategy(config);

        let batch: Vec<Order> = aligned_buy_prices()
            .iter()
            .enumerate()
            .map(|(i, &price)| market_order(i as u64, price, 1))
            .collect();

        let out = strategy.process_batch(batch);
        let signal_order = out.last().unwrap();
        assert!(signal_order.order_id.as_u64() >= 10_000);
    }
}
