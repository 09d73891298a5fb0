//! Pre-trade risk filter
//!
//! Rewrites a candidate batch into the admitted subset, in input order.
//! Each rejection increments the rejection counter; admitted orders
//! accrue daily volume. Single-owner state: the filter is bound to one
//! pipeline lane and needs no lock of its own.

use tracing::debug;
use types::errors::RiskReject;
use types::order::Order;

use crate::config::RiskConfig;

/// Stateful batch filter over configured risk limits
#[derive(Debug)]
pub struct RiskFilter {
    config: RiskConfig,
    orders_rejected: u64,
    daily_volume: u64,
}

impl RiskFilter {
    /// Create a filter with the given limits
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            orders_rejected: 0,
            daily_volume: 0,
        }
    }

    /// Filter a candidate batch, keeping admitted orders in input order
    ///
    /// Checks per candidate, first failing check wins:
    /// 1. quantity cap
    /// 2. per-order notional cap
    /// 3. per-batch admission cap
    /// 4. daily volume cap (admitted orders accrue volume)
    pub fn filter_orders(&mut self, orders: Vec<Order>) -> Vec<Order> {
        let mut admitted = Vec::with_capacity(orders.len());

        for order in orders {
            match self.check(&order, admitted.len()) {
                Ok(()) => {
                    if self.config.max_daily_volume.is_some() {
                        self.daily_volume += order.quantity.as_u64();
                    }
                    admitted.push(order);
                }
                Err(reason) => {
                    self.orders_rejected += 1;
                    debug!(order_id = %order.order_id, %reason, "order rejected");
                }
            }
        }

        admitted
    }

    fn check(&self, order: &Order, already_admitted: usize) -> Result<(), RiskReject> {
        let quantity = order.quantity.as_u64();

        if let Some(limit) = self.config.max_order_quantity {
            if quantity > limit {
                return Err(RiskReject::QuantityLimit { quantity, limit });
            }
        }

        if let Some(limit) = self.config.max_notional_per_order {
            let notional = order.notional();
            if notional > limit as u128 {
                return Err(RiskReject::NotionalLimit { notional, limit });
            }
        }

        if let Some(limit) = self.config.max_orders_per_batch {
            if already_admitted >= limit {
                return Err(RiskReject::BatchLimit { limit });
            }
        }

        if let Some(limit) = self.config.max_daily_volume {
            if self.daily_volume + quantity > limit {
                return Err(RiskReject::DailyVolumeLimit { quantity, limit });
            }
        }

        Ok(())
    }

    /// Orders discarded so far
    pub fn orders_rejected(&self) -> u64 {
        self.orders_rejected
    }

    /// Volume admitted against the daily cap
    pub fn daily_volume(&self) -> u64 {
        self.daily_volume
    }

    /// External daily reset
    pub fn reset_daily_volume(&mut self) {
        self.daily_volume = 0;
    }

    /// Reset all counters
    pub fn reset_counters(&mut self) {
        self.orders_rejected = 0;
        self.daily_volume = 0;
    }

    /// Configured limits
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::OrderId;
    use types::numeric::{Price, Quantity};
    use types::order::{OrderType, Side};

    fn order(id: u64, price: u64, qty: u64) -> Order {
        Order::new(
            OrderId::from_u64(id),
            Side::Buy,
            OrderType::Market,
            Price::from_minor(price),
            Quantity::new(qty),
            0,
        )
    }

    #[test]
    fn test_unlimited_config_admits_everything() {
        let mut filter = RiskFilter::new(RiskConfig::default());
        let batch = vec![order(1, 10000, 1000), order(2, 10000, 2000)];

        let admitted = filter.filter_orders(batch);
        assert_eq!(admitted.len(), 2);
        assert_eq!(filter.orders_rejected(), 0);
        assert_eq!(filter.daily_volume(), 0);
    }

    #[test]
    fn test_quantity_cap() {
        let mut filter = RiskFilter::new(RiskConfig {
            max_order_quantity: Some(100),
            ..Default::default()
        });

        let admitted = filter.filter_orders(vec![order(1, 10000, 100), order(2, 10000, 101)]);
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].order_id, OrderId::from_u64(1));
        assert_eq!(filter.orders_rejected(), 1);
    }

    #[test]
    fn test_notional_cap_rejects_oversized_order() {
        let mut filter = RiskFilter::new(RiskConfig {
            max_notional_per_order: Some(1_000_000),
            ..Default::default()
        });

        // price=10000 qty=200 → notional 2_000_000, over the cap
        let admitted = filter.filter_orders(vec![order(1, 10000, 200)]);
        assert!(admitted.is_empty());
        assert_eq!(filter.orders_rejected(), 1);

        // price=10000 qty=100 → notional 1_000_000, at the cap: admitted
        let admitted = filter.filter_orders(vec![order(2, 10000, 100)]);
        assert_eq!(admitted.len(), 1);
        assert_eq!(filter.orders_rejected(), 1);
    }

    #[test]
    fn test_batch_cap_keeps_input_order() {
        let mut filter = RiskFilter::new(RiskConfig {
            max_orders_per_batch: Some(2),
            ..Default::default()
        });

        let admitted =
            filter.filter_orders(vec![order(1, 10000, 1), order(2, 10000, 1), order(3, 10000, 1)]);
        let ids: Vec<u64> = admitted.iter().map(|o| o.order_id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(filter.orders_rejected(), 1);

        // The cap is per batch, not cumulative
        let admitted = filter.filter_orders(vec![order(4, 10000, 1)]);
        assert_eq!(admitted.len(), 1);
    }

    #[test]
    fn test_daily_volume_cap_accrues_and_resets() {
        let mut filter = RiskFilter::new(RiskConfig {
            max_daily_volume: Some(10),
            ..Default::default()
        });

        let admitted = filter.filter_orders(vec![order(1, 10000, 6), order(2, 10000, 5)]);
        assert_eq!(admitted.len(), 1, "second order would exceed the cap");
        assert_eq!(filter.daily_volume(), 6);
        assert_eq!(filter.orders_rejected(), 1);

        // A smaller order still fits under the cap
        let admitted = filter.filter_orders(vec![order(3, 10000, 4)]);
        assert_eq!(admitted.len(), 1);
        assert_eq!(filter.daily_volume(), 10);

        filter.reset_daily_volume();
        assert_eq!(filter.daily_volume(), 0);
        let admitted = filter.filter_orders(vec![order(4, 10000, 10)]);
        assert_eq!(admitted.len(), 1);
    }

    #[test]
    fn test_daily_volume_never_exceeds_cap() {
        let mut filter = RiskFilter::new(RiskConfig {
            max_daily_volume: Some(25),
            ..Default::default()
        });

        for i in 0..20 {
            filter.filter_orders(vec![order(i, 10000, 3)]);
            assert!(filter.daily_volume() <= 25);
        }
    }

    #[test]
    fn test_rejection_counter_one_per_discard() {
        let mut filter = RiskFilter::new(RiskConfig {
            max_order_quantity: Some(1),
            ..Default::default()
        });

        filter.filter_orders(vec![order(1, 10000, 2), order(2, 10000, 3), order(3, 10000, 1)]);
        assert_eq!(filter.orders_rejected(), 2);

        filter.reset_counters();
        assert_eq!(filter.orders_rejected(), 0);
    }
}
