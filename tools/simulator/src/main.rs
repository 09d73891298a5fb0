//! Simulator binary
//!
//! Runs the matching pipeline until a line (or EOF) arrives on standard
//! input, then prints the final summary.

use std::io;

use simulator::{Simulator, SimulatorConfig};
use types::errors::FeedError;

fn main() -> Result<(), FeedError> {
    tracing_subscriber::fmt::init();

    let config = SimulatorConfig::default();

    println!("=== Exchange Simulator ===");
    println!();
    println!("=== Momentum Strategy Configuration ===");
    println!("Momentum Threshold: {}", config.strategy.momentum_threshold);
    println!(
        "RSI Levels: {} - {}",
        config.strategy.rsi_oversold, config.strategy.rsi_overbought
    );
    println!(
        "MA Periods: {}/{}",
        config.strategy.short_period, config.strategy.long_period
    );
    println!("Position Size: {}", config.strategy.position_size);
    println!(
        "Risk Management: {}% / {}%",
        config.strategy.stop_loss_pct, config.strategy.take_profit_pct
    );
    println!("=====================================");
    println!();

    let mut sim = Simulator::new(config);
    sim.start()?;
    println!("Simulator running. Press Enter to stop...");

    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line);

    sim.stop();
    sim.print_summary();
    Ok(())
}
