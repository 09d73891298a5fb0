//! Monotonic nanosecond clock
//!
//! Timestamps are nanoseconds since an arbitrary process-local anchor.
//! They order events within one run; they are not wall-clock times.

use std::sync::OnceLock;
use std::time::Instant;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Nanoseconds since the process-local monotonic anchor
pub fn monotonic_ns() -> i64 {
    let anchor = ANCHOR.get_or_init(Instant::now);
    anchor.elapsed().as_nanos() as i64
}
