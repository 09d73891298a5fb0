//! Rolling-window technical indicators
//!
//! All functions are pure over a bounded window of prices ordered
//! newest-last, and return a neutral default when the window is shorter
//! than the period.

use std::collections::VecDeque;

/// Simple moving average of the last `period` values
///
/// Returns 0 when the window is shorter than the period.
pub fn sma(values: &VecDeque<f64>, period: usize) -> f64 {
    sma_ending_at(values, values.len(), period)
}

/// SMA of the `period` values ending at index `end` (exclusive)
fn sma_ending_at(values: &VecDeque<f64>, end: usize, period: usize) -> f64 {
    if period == 0 || end < period || end > values.len() {
        return 0.0;
    }
    let sum: f64 = values.iter().skip(end - period).take(period).sum();
    sum / period as f64
}

/// Relative strength index over the last `period` price changes
///
/// Returns the neutral 50 when fewer than `period + 1` prices are
/// available, and 100 when the average loss is zero.
pub fn rsi(prices: &VecDeque<f64>, period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 50.0;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    let window: Vec<f64> = prices.iter().skip(prices.len() - period - 1).copied().collect();
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// MACD line and signal line
///
/// `macd_line = sma(fast) − sma(slow)`; the signal line is the SMA of the
/// last `signal` historical macd-line values. Both are 0 while the window
/// is too short. Bullish ⇔ `macd_line > signal_line`.
pub fn macd(prices: &VecDeque<f64>, fast: usize, slow: usize, signal: usize) -> (f64, f64) {
    let len = prices.len();
    if len < slow {
        return (0.0, 0.0);
    }

    let macd_line = sma_ending_at(prices, len, fast) - sma_ending_at(prices, len, slow);
    if signal == 0 || len < slow + signal - 1 {
        return (macd_line, 0.0);
    }

    let mut history_sum = 0.0;
    for end in (len - signal + 1)..=len {
        history_sum += sma_ending_at(prices, end, fast) - sma_ending_at(prices, end, slow);
    }
    (macd_line, history_sum / signal as f64)
}

/// Percent change over the last `period` steps
///
/// Returns 0 when fewer than `period + 1` prices are available.
pub fn price_change_percent(prices: &VecDeque<f64>, period: usize) -> f64 {
    if prices.len() < period + 1 {
        return 0.0;
    }
    let last = prices[prices.len() - 1];
    let base = prices[prices.len() - 1 - period];
    if base == 0.0 {
        return 0.0;
    }
    (last - base) / base * 100.0
}

/// Composite momentum score in roughly [−1, 1]
///
/// Mean of three components: price vs short SMA (±1), short SMA vs long
/// SMA (±1), and `tanh(price_change_percent(short) / 10)`. Returns 0 when
/// the window is shorter than the long period.
pub fn momentum_score(prices: &VecDeque<f64>, short_period: usize, long_period: usize) -> f64 {
    if prices.len() < long_period {
        return 0.0;
    }

    let last = prices[prices.len() - 1];
    let short_sma = sma(prices, short_period);
    let long_sma = sma(prices, long_period);

    let price_vs_short = if last > short_sma { 1.0 } else { -1.0 };
    let short_vs_long = if short_sma > long_sma { 1.0 } else { -1.0 };
    let change = (price_change_percent(prices, short_period) / 10.0).tanh();

    (price_vs_short + short_vs_long + change) / 3.0
}
