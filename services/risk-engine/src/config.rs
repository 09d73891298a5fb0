//! Risk limit configuration
//!
//! Every cap is optional; an unset cap admits everything.

use serde::{Deserialize, Serialize};

/// Configured risk limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Maximum quantity per order
    pub max_order_quantity: Option<u64>,
    /// Maximum notional (price × quantity, minor units) per order
    pub max_notional_per_order: Option<u64>,
    /// Maximum orders admitted from a single batch
    pub max_orders_per_batch: Option<usize>,
    /// Cumulative daily volume cap across admitted orders
    pub max_daily_volume: Option<u64>,
}
