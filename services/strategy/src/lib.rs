//! Strategy engine
//!
//! Rolling-window technical indicators and the momentum strategy that
//! turns the incoming order stream into at most one trading signal per
//! batch.

pub mod indicators;
pub mod momentum;
pub mod signal;

pub use momentum::{MomentumStrategy, StrategyConfig};
pub use signal::{Signal, SignalRecord};
