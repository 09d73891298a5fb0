//! Error taxonomy for the simulator
//!
//! Policy rejections and lifecycle errors are typed here; invariant
//! violations inside the engine stay benign false/no-op returns and never
//! surface as errors.

use thiserror::Error;

/// Reason an order was discarded by the risk filter
///
/// Handled locally: the filter drops the order, increments its rejection
/// counter, and logs the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskReject {
    #[error("quantity {quantity} exceeds per-order limit {limit}")]
    QuantityLimit { quantity: u64, limit: u64 },

    #[error("notional {notional} exceeds per-order limit {limit}")]
    NotionalLimit { notional: u128, limit: u64 },

    #[error("batch admission limit {limit} reached")]
    BatchLimit { limit: usize },

    #[error("quantity {quantity} would exceed daily volume cap {limit}")]
    DailyVolumeLimit { quantity: u64, limit: u64 },
}

/// Feed lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("feed is already running")]
    AlreadyRunning,
}
