//! Synthetic market-data feed
//!
//! A single producer thread that emits a small batch of random orders on
//! a fixed cadence. The feed owns its seeded RNG, so runs are
//! reproducible and distinct instances are independent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use types::errors::FeedError;
use types::ids::OrderIdGenerator;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::time::monotonic_ns;

/// Configuration for the synthetic feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Orders per batch
    pub batch_size: usize,
    /// Pause between batches
    pub cadence: Duration,
    /// Lower bound of the price band (minor units, inclusive)
    pub min_price: Price,
    /// Upper bound of the price band (minor units, inclusive)
    pub max_price: Price,
    /// Smallest order quantity (inclusive)
    pub min_quantity: u64,
    /// Largest order quantity (inclusive)
    pub max_quantity: u64,
    /// RNG seed
    pub seed: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            cadence: Duration::from_millis(10),
            // Narrow band around the 100.00 reference mid
            min_price: Price::from_minor(9900),
            max_price: Price::from_minor(10100),
            min_quantity: 1,
            max_quantity: 10,
            seed: 42,
        }
    }
}

/// Generate one batch of synthetic orders
///
/// Side and type are uniform; price and quantity are uniform over the
/// configured bands. Ids come from the shared generator.
pub fn generate_batch(
    rng: &mut ChaCha8Rng,
    ids: &OrderIdGenerator,
    config: &FeedConfig,
) -> Vec<Order> {
    (0..config.batch_size)
        .map(|_| {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let price =
                Price::from_minor(rng.gen_range(config.min_price.as_minor()..=config.max_price.as_minor()));
            let quantity = Quantity::new(rng.gen_range(config.min_quantity..=config.max_quantity));
            let order_type = if rng.gen_bool(0.5) {
                OrderType::Limit
            } else {
                OrderType::Market
            };
            Order::new(ids.next_id(), side, order_type, price, quantity, monotonic_ns())
        })
        .collect()
}

/// Single-producer synthetic order feed
pub struct MarketDataFeed {
    config: FeedConfig,
    ids: Arc<OrderIdGenerator>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MarketDataFeed {
    /// Create a feed minting ids from the shared generator
    pub fn new(config: FeedConfig, ids: Arc<OrderIdGenerator>) -> Self {
        Self {
            config,
            ids,
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start the producer thread, delivering each batch to `callback`
    pub fn start<F>(&mut self, mut callback: F) -> Result<(), FeedError>
    where
        F: FnMut(Vec<Order>) + Send + 'static,
    {
        if self.handle.is_some() {
            return Err(FeedError::AlreadyRunning);
        }

        self.stop.store(false, Ordering::Relaxed);
        let stop = Arc::clone(&self.stop);
        let ids = Arc::clone(&self.ids);
        let config = self.config.clone();

        self.handle = Some(thread::spawn(move || {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
            info!(seed = config.seed, batch_size = config.batch_size, "feed started");

            while !stop.load(Ordering::Relaxed) {
                let batch = generate_batch(&mut rng, &ids, &config);
                callback(batch);
                thread::sleep(config.cadence);
            }
            info!("feed stopped");
        }));

        Ok(())
    }

    /// Signal the producer to stop and join it
    ///
    /// The thread returns from its loop at the next cadence tick.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Check whether the producer thread is live
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for MarketDataFeed {
    fn drop(&mut self) {
        self.stop();
    }
}
