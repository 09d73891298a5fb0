//! Trading signal model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision produced by the strategy for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Diagnostic record of a non-Hold decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal: Signal,
    /// Human-readable enumeration of the indicator values behind the
    /// decision
    pub reason: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Realised pnl percent, set on exits only
    pub realized_pnl_pct: Option<f64>,
}
