//! Pipeline throughput metrics
//!
//! Counts submitted-order events between start and stop, and derives
//! events/second from monotonic nanoseconds. The elapsed window is
//! clamped to one nanosecond so sub-second runs never divide by zero.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Event counter with wall-time bookkeeping
#[derive(Debug)]
pub struct PipelineMetrics {
    events: AtomicU64,
    running: AtomicBool,
    started_at: Mutex<Option<Instant>>,
    stopped_elapsed_ns: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            events: AtomicU64::new(0),
            running: AtomicBool::new(false),
            started_at: Mutex::new(None),
            stopped_elapsed_ns: AtomicU64::new(0),
        }
    }

    /// Reset counters and start the clock
    pub fn start(&self) {
        self.events.store(0, Ordering::Relaxed);
        self.stopped_elapsed_ns.store(0, Ordering::Relaxed);
        *self.started_at.lock().expect("metrics lock poisoned") = Some(Instant::now());
        self.running.store(true, Ordering::Relaxed);
    }

    /// Stop the clock, freezing the elapsed window
    ///
    /// A second stop is a no-op; the frozen window is kept.
    pub fn stop(&self) {
        if !self.running.load(Ordering::Relaxed) {
            return;
        }
        let started = self.started_at.lock().expect("metrics lock poisoned");
        if let Some(start) = *started {
            self.stopped_elapsed_ns
                .store(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
        }
        self.running.store(false, Ordering::Relaxed);
    }

    /// Count one event; ignored while stopped
    pub fn record_event(&self) {
        if self.running.load(Ordering::Relaxed) {
            self.events.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Events counted so far
    pub fn events(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }

    /// Elapsed nanoseconds, live while running, clamped to ≥ 1
    pub fn elapsed_ns(&self) -> u64 {
        let ns = if self.running.load(Ordering::Relaxed) {
            let started = self.started_at.lock().expect("metrics lock poisoned");
            started.map(|s| s.elapsed().as_nanos() as u64).unwrap_or(0)
        } else {
            self.stopped_elapsed_ns.load(Ordering::Relaxed)
        };
        ns.max(1)
    }

    /// Events per second over the elapsed window
    pub fn events_per_second(&self) -> f64 {
        self.events() as f64 * 1_000_000_000.0 / self.elapsed_ns() as f64
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}
