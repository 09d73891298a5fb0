//! Order lifecycle types
//!
//! An order is created by the feed or the strategy, owned by the book
//! while resting, and dropped once fully filled or cancelled.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Rests at its limit price when not immediately matched
    Limit,
    /// Matches at any price; an unfilled remainder is dropped, never rested
    Market,
}

/// A buy or sell order flowing through the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    /// Limit price in minor units; ignored for Market orders
    pub price: Price,
    /// Original quantity
    pub quantity: Quantity,
    /// Remaining quantity, decremented on fills
    pub remaining_quantity: Quantity,
    /// Monotonic nanoseconds at creation
    pub created_at: i64,
}

impl Order {
    /// Create a new order with its full quantity remaining
    pub fn new(
        order_id: OrderId,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: Quantity,
        created_at: i64,
    ) -> Self {
        Self {
            order_id,
            side,
            order_type,
            price,
            quantity,
            remaining_quantity: quantity,
            created_at,
        }
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Quantity filled so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining_quantity
    }

    /// Notional value (price × original quantity) in minor units
    pub fn notional(&self) -> u128 {
        self.price.notional(self.quantity)
    }

    /// Decrement the remaining quantity by a fill
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity
    pub fn fill(&mut self, fill_quantity: Quantity) {
        assert!(
            fill_quantity.as_u64() <= self.remaining_quantity.as_u64(),
            "Fill would exceed remaining quantity"
        );
        self.remaining_quantity = self.remaining_quantity - fill_quantity;
    }
}
