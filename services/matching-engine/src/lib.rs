//! Matching engine
//!
//! Order matching under strict price-time priority.
//!
//! **Key invariants:**
//! - Better prices match first, FIFO within a price level
//! - Trades execute at the resting order's price
//! - No price level is ever empty; the order index maps exactly the
//!   resting ids
//! - Deterministic matching (same inputs → same outputs)

pub mod book;
pub mod engine;
pub mod matching;

pub use engine::{MatchingEngine, SubmitResult};
