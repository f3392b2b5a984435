//! # Utility Functions (utils.rs)
//!
//! Time helpers for the limiter.
//!
//! ## Clock
//!
//! ```text
//!     process start ──► first call pins CLOCK_BASE (Instant)
//!                          │
//!                          ▼
//!     current_time_ms() = CLOCK_BASE.elapsed()   (never decreases)
//! ```
//!
//! Window arithmetic only ever compares two readings of this clock, so wall
//! clock adjustments cannot stretch or shrink a window.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

static CLOCK_BASE: OnceLock<Instant> = OnceLock::new();

/// Returns monotonic milliseconds since the first call in this process.
///
/// The value is only meaningful relative to other readings.
///
/// # Example
///
/// ```rust
/// use window_gate::current_time_ms;
///
/// let a = current_time_ms();
/// let b = current_time_ms();
/// assert!(b >= a);
/// ```
#[inline]
pub fn current_time_ms() -> u64 {
    let base = CLOCK_BASE.get_or_init(Instant::now);
    duration_to_ms(base.elapsed())
}

/// Milliseconds elapsed from `earlier` to `now`, clamped at zero.
#[inline]
pub(crate) fn elapsed_ms(now: u64, earlier: u64) -> u64 {
    now.saturating_sub(earlier)
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
#[inline]
pub(crate) fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
