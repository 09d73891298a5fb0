//! End-to-end pipeline tests
//!
//! Exercises the full path feed → dispatcher → lane (strategy, risk) →
//! engine, including the counters the status interface reports.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use matching_engine::MatchingEngine;
use risk_engine::{RiskConfig, RiskFilter};
use simulator::consumer::{MarketDataConsumer, QuoteSampler};
use simulator::dispatcher::WorkerPool;
use simulator::feed::{generate_batch, FeedConfig};
use simulator::metrics::PipelineMetrics;
use simulator::runner::{PipelineLane, Simulator, SimulatorConfig};
use strategy::{MomentumStrategy, StrategyConfig};
use types::ids::{OrderId, OrderIdGenerator};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

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

/// Rising two-step series that satisfies every entry condition of the
/// momentum strategy on its final observation.
fn aligned_buy_batch() -> Vec<Order> {
    let mut p: u64 = 10000;
    let mut orders = Vec::new();
    for i in 0..61u64 {
        if i % 2 == 0 {
            p += 40 + i;
        } else {
            p -= 50;
        }
        orders.push(market_order(i + 1, p, 1));
    }
    orders
}

#[test]
fn test_notional_cap_blocks_strategy_order_before_engine() {
    let engine = MatchingEngine::new();
    let metrics = PipelineMetrics::new();
    metrics.start();

    let ids = Arc::new(OrderIdGenerator::new(10_000));
    let momentum = MomentumStrategy::new(
        StrategyConfig {
            momentum_threshold: 0.25,
            rsi_overbought: 75.0,
            // position notional ≈ 10670 × 200 = 2_134_000, over the cap
            position_size: 200,
            ..Default::default()
        },
        ids,
    );
    let mut lane = PipelineLane::new(
        vec![MarketDataConsumer::Strategy(momentum)],
        RiskFilter::new(RiskConfig {
            max_notional_per_order: Some(1_000_000),
            ..Default::default()
        }),
    );

    let batch = aligned_buy_batch();
    let input_len = batch.len() as u64;
    lane.process_batch(batch, &engine, &metrics);

    // The strategy produced an entry order, but it never reached the
    // engine: only the feed inputs were submitted.
    assert_eq!(lane.risk().orders_rejected(), 1);
    assert_eq!(engine.orders_processed(), input_len);
    assert_eq!(metrics.events(), input_len);
    assert_eq!(lane.strategy().unwrap().signals_generated(), 1);
}

#[test]
fn test_pipeline_counters_under_worker_pool() {
    let engine = Arc::new(MatchingEngine::new());
    let metrics = Arc::new(PipelineMetrics::new());
    metrics.start();

    let ids = Arc::new(OrderIdGenerator::new(1));
    let momentum = MomentumStrategy::new(StrategyConfig::default(), Arc::clone(&ids));
    let lane = Arc::new(Mutex::new(PipelineLane::new(
        vec![
            MarketDataConsumer::Strategy(momentum),
            MarketDataConsumer::Sampler(QuoteSampler::new()),
        ],
        RiskFilter::new(RiskConfig::default()),
    )));

    let pool = WorkerPool::new(4);
    let config = FeedConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let batches: u64 = 50;
    for _ in 0..batches {
        let batch = generate_batch(&mut rng, &ids, &config);
        let lane = Arc::clone(&lane);
        let engine = Arc::clone(&engine);
        let metrics = Arc::clone(&metrics);
        pool.execute(move || {
            let mut lane = lane.lock().unwrap();
            lane.process_batch(batch, &engine, &metrics);
        });
    }
    pool.shutdown();
    metrics.stop();

    let processed = engine.orders_processed();
    assert!(processed >= batches * config.batch_size as u64);
    assert_eq!(metrics.events(), processed);

    let lane = lane.lock().unwrap();
    assert_eq!(lane.sampler().unwrap().batches_seen(), batches);
    // Quotes were observed after every batch
    let (bid, ask) = lane.sampler().unwrap().last_quote();
    let (engine_bid, engine_ask) = engine.best_bid_ask();
    assert_eq!((bid, ask), (engine_bid, engine_ask));
}

#[test]
fn test_simulator_end_to_end_counters_agree() {
    let mut config = SimulatorConfig::default();
    config.feed.cadence = Duration::from_millis(1);

    let mut sim = Simulator::new(config);
    sim.start().unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while sim.engine().orders_processed() < 50 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }

    sim.stop();

    let processed = sim.engine().orders_processed();
    assert!(processed >= 50, "pipeline made no progress: {}", processed);
    assert_eq!(sim.metrics().events(), processed);
    assert!(sim.metrics().events_per_second() > 0.0);

    // Stop is idempotent; counters are frozen
    let frozen = sim.engine().orders_processed();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(sim.engine().orders_processed(), frozen);
}
