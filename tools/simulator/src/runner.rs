//! Pipeline runner
//!
//! Wires the feed through the dispatcher into one pipeline lane that
//! owns the strategy and the risk filter, submits admitted orders to the
//! engine, and emits the textual status interface.
//!
//! The lane is the one-writer owner of strategy and risk state; batches
//! reach it only through its serialising mutex. No total ordering is
//! promised across batches processed by different workers.

use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::info;

use matching_engine::MatchingEngine;
use risk_engine::{RiskConfig, RiskFilter};
use strategy::{MomentumStrategy, Signal, SignalRecord, StrategyConfig};
use types::errors::FeedError;
use types::ids::OrderIdGenerator;
use types::order::Order;

use crate::consumer::{MarketDataConsumer, QuoteSampler};
use crate::dispatcher::WorkerPool;
use crate::feed::{FeedConfig, MarketDataFeed};
use crate::metrics::PipelineMetrics;

/// Top-level simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub feed: FeedConfig,
    pub strategy: StrategyConfig,
    pub risk: RiskConfig,
    /// Worker threads; 0 sizes the pool to the hardware concurrency
    pub workers: usize,
    /// Cadence of the status line
    pub status_interval: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            strategy: StrategyConfig {
                momentum_threshold: 0.25,
                ..Default::default()
            },
            risk: RiskConfig {
                max_order_quantity: Some(1_000),
                max_notional_per_order: Some(1_000_000),
                max_orders_per_batch: None,
                max_daily_volume: None,
            },
            workers: 0,
            status_interval: Duration::from_secs(5),
        }
    }
}

/// One worker task's view of the pipeline
///
/// Within a batch the steps run strictly in order: indicator update and
/// signal generation (consumers), risk filter, engine submission.
pub struct PipelineLane {
    consumers: Vec<MarketDataConsumer>,
    risk: RiskFilter,
}

impl PipelineLane {
    pub fn new(consumers: Vec<MarketDataConsumer>, risk: RiskFilter) -> Self {
        Self { consumers, risk }
    }

    /// Run one batch through consumers → risk filter → engine
    pub fn process_batch(
        &mut self,
        mut batch: Vec<Order>,
        engine: &MatchingEngine,
        metrics: &PipelineMetrics,
    ) {
        for consumer in &mut self.consumers {
            batch = consumer.on_batch(batch);
        }

        if let Some(record) = self
            .consumers
            .iter_mut()
            .find_map(MarketDataConsumer::take_signal)
        {
            print_signal(&record);
        }

        let admitted = self.risk.filter_orders(batch);
        for order in admitted {
            println!("Order: {} @ {} x {}", order.side, order.price, order.quantity);
            let result = engine.submit(order);
            metrics.record_event();
            for trade in result.trades() {
                for consumer in &mut self.consumers {
                    consumer.on_trade(trade);
                }
            }
        }

        let (bid, ask) = engine.best_bid_ask();
        for consumer in &mut self.consumers {
            consumer.on_quote(bid, ask);
        }
    }

    /// The risk filter bound to this lane
    pub fn risk(&self) -> &RiskFilter {
        &self.risk
    }

    /// The strategy consumer, if the lane carries one
    pub fn strategy(&self) -> Option<&MomentumStrategy> {
        self.consumers.iter().find_map(|c| match c {
            MarketDataConsumer::Strategy(strategy) => Some(strategy),
            _ => None,
        })
    }

    /// The sampler consumer, if the lane carries one
    pub fn sampler(&self) -> Option<&QuoteSampler> {
        self.consumers.iter().find_map(|c| match c {
            MarketDataConsumer::Sampler(sampler) => Some(sampler),
            _ => None,
        })
    }
}

/// Emit the signal line for a non-Hold decision
fn print_signal(record: &SignalRecord) {
    match record.signal {
        Signal::Buy => println!(
            "BUY Signal: {} (Confidence: {:.1}%)",
            record.reason,
            record.confidence * 100.0
        ),
        Signal::Sell => println!(
            "SELL Signal: {} (Confidence: {:.1}%, P&L: {:.2}%)",
            record.reason,
            record.confidence * 100.0,
            record.realized_pnl_pct.unwrap_or(0.0)
        ),
        Signal::Hold => {}
    }
}

/// Emit the periodic status line
fn print_status(engine: &MatchingEngine, metrics: &PipelineMetrics, started: Instant) {
    let (bid, ask) = engine.best_bid_ask();
    println!(
        "Status {}s | orders={} trades={} events/s={:.2} avg_ns={:.2} bid={} ask={}",
        started.elapsed().as_secs(),
        engine.orders_processed(),
        engine.trades_matched(),
        metrics.events_per_second(),
        engine.average_processing_ns(),
        bid,
        ask,
    );
}

/// The assembled simulator
pub struct Simulator {
    config: SimulatorConfig,
    engine: Arc<MatchingEngine>,
    metrics: Arc<PipelineMetrics>,
    lane: Arc<Mutex<PipelineLane>>,
    feed: MarketDataFeed,
    pool: Option<Arc<WorkerPool>>,
    status_tx: Option<mpsc::Sender<()>>,
    status_handle: Option<JoinHandle<()>>,
}

impl Simulator {
    /// Assemble the pipeline from configuration
    pub fn new(config: SimulatorConfig) -> Self {
        let ids = Arc::new(OrderIdGenerator::new(1));
        let engine = Arc::new(MatchingEngine::new());
        let metrics = Arc::new(PipelineMetrics::new());

        let momentum = MomentumStrategy::new(config.strategy.clone(), Arc::clone(&ids));
        let lane = Arc::new(Mutex::new(PipelineLane::new(
            vec![
                MarketDataConsumer::Strategy(momentum),
                MarketDataConsumer::Sampler(QuoteSampler::new()),
            ],
            RiskFilter::new(config.risk.clone()),
        )));
        let feed = MarketDataFeed::new(config.feed.clone(), ids);

        Self {
            config,
            engine,
            metrics,
            lane,
            feed,
            pool: None,
            status_tx: None,
            status_handle: None,
        }
    }

    /// Start the feed, the worker pool, and the status ticker
    pub fn start(&mut self) -> Result<(), FeedError> {
        let started = Instant::now();
        self.metrics.start();

        let pool = Arc::new(WorkerPool::new(self.config.workers));

        let (tx, rx) = mpsc::channel();
        let engine = Arc::clone(&self.engine);
        let metrics = Arc::clone(&self.metrics);
        let interval = self.config.status_interval;
        self.status_handle = Some(thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Err(mpsc::RecvTimeoutError::Timeout) => print_status(&engine, &metrics, started),
                Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }));
        self.status_tx = Some(tx);

        let lane = Arc::clone(&self.lane);
        let engine = Arc::clone(&self.engine);
        let metrics = Arc::clone(&self.metrics);
        let dispatcher = Arc::clone(&pool);
        self.feed.start(move |batch| {
            let lane = Arc::clone(&lane);
            let engine = Arc::clone(&engine);
            let metrics = Arc::clone(&metrics);
            dispatcher.execute(move || {
                let mut lane = lane.lock().expect("pipeline lane poisoned");
                lane.process_batch(batch, &engine, &metrics);
            });
        })?;

        self.pool = Some(pool);
        info!("simulator started");
        Ok(())
    }

    /// Stop the feed, drain the pool, freeze the metrics
    pub fn stop(&mut self) {
        self.feed.stop();
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
        self.metrics.stop();
        if let Some(tx) = self.status_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.status_handle.take() {
            let _ = handle.join();
        }
        info!("simulator stopped");
    }

    /// Emit the final summary
    pub fn print_summary(&self) {
        let (bid, ask) = self.engine.best_bid_ask();
        let lane = self.lane.lock().expect("pipeline lane poisoned");

        println!();
        println!("=== Final Summary ===");
        println!("Runtime: {:.1}s", self.metrics.elapsed_ns() as f64 / 1e9);
        println!("Processed orders: {}", self.engine.orders_processed());
        println!("Matched trades: {}", self.engine.trades_matched());
        println!("Orders rejected: {}", lane.risk().orders_rejected());
        println!("Events/sec: {:.2}", self.metrics.events_per_second());
        println!("Avg latency: {:.2} ns", self.engine.average_processing_ns());
        println!("Best bid: {} / Best ask: {}", bid, ask);

        if let Some(momentum) = lane.strategy() {
            println!("Signals generated: {}", momentum.signals_generated());
            println!(
                "In position: {}",
                if momentum.is_in_position() { "Yes" } else { "No" }
            );
        }

        if let Some(sampler) = lane.sampler() {
            if let Some(trade) = sampler.last_trade() {
                println!(
                    "Last trade: {} x {} ({} trades observed)",
                    trade.price,
                    trade.quantity,
                    sampler.trades_seen()
                );
            }
        }

        let recent = self.engine.recent_trades(10);
        if !recent.is_empty() {
            println!("Recent trades (last {}):", recent.len());
            for trade in recent.iter().rev() {
                println!(
                    "  Trade: Buy#{} Sell#{} @ {} x {}",
                    trade.buy_order_id, trade.sell_order_id, trade.price, trade.quantity
                );
            }
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop();
    }
}
