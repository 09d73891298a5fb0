//! Crossing detection logic
//!
//! Determines when an incoming order may trade against the front resting
//! order on the opposite side.

use types::numeric::Price;
use types::order::{Order, OrderType, Side};

/// Check whether an incoming order crosses a resting price
///
/// Market orders cross at any price. A limit Buy crosses when its price
/// is at or above the resting ask; a limit Sell crosses when its price is
/// at or below the resting bid.
pub fn crosses(incoming: &Order, resting_price: Price) -> bool {
    if incoming.order_type == OrderType::Market {
        return true;
    }
    match incoming.side {
        Side::Buy => incoming.price >= resting_price,
        Side::Sell => incoming.price <= resting_price,
    }
}
