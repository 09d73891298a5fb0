//! Trade record types
//!
//! A trade is immutable and append-only; it outlives the orders that
//! produced it.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// An executed match between a buy and a sell order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Monotonic sequence assigned in linearisation order
    pub sequence: u64,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    /// Execution price (the resting order's price)
    pub price: Price,
    pub quantity: Quantity,
    /// Monotonic nanoseconds at execution
    pub executed_at: i64,
}

impl Trade {
    pub fn new(
        sequence: u64,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            sequence,
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            executed_at,
        }
    }

    /// Trade value (price × quantity) in minor units
    pub fn trade_value(&self) -> u128 {
        self.price.notional(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_creation() {
        let trade = Trade::new(
            7,
            OrderId::from_u64(2),
            OrderId::from_u64(1),
            Price::from_minor(10050),
            Quantity::new(3),
            1_000,
        );

        assert_eq!(trade.sequence, 7);
        assert_eq!(trade.buy_order_id, OrderId::from_u64(2));
        assert_eq!(trade.sell_order_id, OrderId::from_u64(1));
        assert_eq!(trade.trade_value(), 30_150);
    }

    #[test]
    fn test_trade_serialization() {
        let trade = Trade::new(
            1,
            OrderId::from_u64(10),
            OrderId::from_u64(11),
            Price::from_minor(10000),
            Quantity::new(5),
            42,
        );
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }
}
