//! Point-in-time counters for a limiter.
//!
//! ```text
//!     Metrics Snapshot:
//!     ┌─────────────────────────────────────┐
//!     │  Window: 4/5 permits used           │
//!     │  ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓░░░░  (80%)        │
//!     │                                     │
//!     │  Granted: 1204   Waited: 310        │
//!     │  Rolls: 241      Max Wait: 998ms    │
//!     └─────────────────────────────────────┘
//! ```

use std::fmt;

/// Snapshot of a limiter's counters, taken under its lock.
///
/// Every field is a copy; holding a snapshot never blocks the limiter.
///
/// ```rust
/// use window_gate::{RateLimiter, TimeUnit};
///
/// let limiter = RateLimiter::new(TimeUnit::Second, 5).unwrap();
/// limiter.acquire();
///
/// let metrics = limiter.metrics();
/// assert_eq!(metrics.total_acquired, 1);
/// assert_eq!(metrics.current_count, 1);
/// println!("{}", metrics.summary());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterMetrics {
    /// Permits granted since construction.
    pub total_acquired: u64,

    /// Granted acquisitions that had to block at least once.
    pub total_waited: u64,

    /// Window rolls, including the one that opens the first window.
    pub total_rolls: u64,

    /// Non-blocking attempts that found the window exhausted.
    pub total_rejected: u64,

    /// Acquisitions abandoned through cancellation or timeout.
    pub total_abandoned: u64,

    /// Permits used in the current window.
    pub current_count: u64,

    /// Permits per window.
    pub limit: u64,

    /// Longest time any caller spent blocked, in nanoseconds.
    pub max_wait_time_ns: u64,
}

impl RateLimiterMetrics {
    /// Fraction of the current window's budget already used (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.limit == 0 {
            0.0
        } else {
            self.current_count as f64 / self.limit as f64
        }
    }

    /// Permits still available in the current window.
    ///
    /// This does not account for a roll that is due but has not happened yet.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.current_count)
    }

    /// `true` when the current window has no permits left.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.current_count >= self.limit
    }

    /// Fraction of granted permits whose caller had to block.
    #[inline]
    pub fn wait_ratio(&self) -> f64 {
        if self.total_acquired == 0 {
            0.0
        } else {
            self.total_waited as f64 / self.total_acquired as f64
        }
    }

    /// Longest observed wait in milliseconds.
    #[inline]
    pub fn max_wait_time_ms(&self) -> f64 {
        self.max_wait_time_ns as f64 / 1_000_000.0
    }

    /// Human-readable report suitable for logging.
    pub fn summary(&self) -> String {
        format!(
            "RateLimiter Metrics:\n\
             ├─ Window:\n\
             │  ├─ Used: {}/{}\n\
             │  └─ Utilization: {:.2}%\n\
             ├─ Counters:\n\
             │  ├─ Total Acquired: {}\n\
             │  ├─ Total Waited: {}\n\
             │  ├─ Total Rolls: {}\n\
             │  ├─ Total Rejected: {}\n\
             │  └─ Total Abandoned: {}\n\
             └─ Waiting:\n\
                ├─ Wait Ratio: {:.2}%\n\
                └─ Max Wait Time: {:.3}ms",
            self.current_count,
            self.limit,
            self.utilization() * 100.0,
            self.total_acquired,
            self.total_waited,
            self.total_rolls,
            self.total_rejected,
            self.total_abandoned,
            self.wait_ratio() * 100.0,
            self.max_wait_time_ms(),
        )
    }
}

impl fmt::Display for RateLimiterMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current_count: u64, limit: u64) -> RateLimiterMetrics {
        RateLimiterMetrics {
            total_acquired: 80,
            total_waited: 20,
            total_rolls: 16,
            total_rejected: 3,
            total_abandoned: 1,
            current_count,
            limit,
            max_wait_time_ns: 1_500_000,
        }
    }

    #[test]
    fn test_metrics_calculations() {
        let metrics = snapshot(3, 4);

        assert_eq!(metrics.utilization(), 0.75);
        assert_eq!(metrics.remaining(), 1);
        assert!(!metrics.is_saturated());
        assert_eq!(metrics.wait_ratio(), 0.25);
        assert_eq!(metrics.max_wait_time_ms(), 1.5);
    }

    #[test]
    fn test_saturation() {
        let metrics = snapshot(4, 4);
        assert!(metrics.is_saturated());
        assert_eq!(metrics.remaining(), 0);
    }

    #[test]
    fn test_edge_cases() {
        let metrics = RateLimiterMetrics {
            total_acquired: 0,
            total_waited: 0,
            total_rolls: 0,
            total_rejected: 0,
            total_abandoned: 0,
            current_count: 0,
            limit: 0,
            max_wait_time_ns: 0,
        };

        assert_eq!(metrics.utilization(), 0.0);
        assert_eq!(metrics.wait_ratio(), 0.0);
    }

    #[test]
    fn test_metrics_display() {
        let display = format!("{}", snapshot(2, 4));
        assert!(display.contains("RateLimiter Metrics"));
        assert!(display.contains("Used: 2/4"));
        assert!(display.contains("Max Wait Time: 1.500ms"));
    }
}
