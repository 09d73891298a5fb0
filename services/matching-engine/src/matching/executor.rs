//! Trade execution logic
//!
//! Builds trade records with a monotonic sequence, assigning the buy and
//! sell order ids from the sides of the two matched orders.

use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};
use types::trade::Trade;

/// Trade executor with monotonic sequence generation
#[derive(Debug)]
pub struct TradeExecutor {
    sequence_counter: u64,
}

impl TradeExecutor {
    /// Create a new executor with a starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Execute one match step between the incoming aggressor and a
    /// resting order
    ///
    /// The trade price is the resting order's price (price improvement
    /// for the aggressor). Buy/sell ids are assigned from the sides of
    /// the two orders.
    pub fn execute(
        &mut self,
        incoming: &Order,
        resting_order_id: OrderId,
        resting_price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Trade {
        let (buy_order_id, sell_order_id) = match incoming.side {
            Side::Buy => (incoming.order_id, resting_order_id),
            Side::Sell => (resting_order_id, incoming.order_id),
        };

        Trade::new(
            self.next_sequence(),
            buy_order_id,
            sell_order_id,
            resting_price,
            quantity,
            timestamp,
        )
    }
}
