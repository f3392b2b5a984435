//! # Rate Limiter Configuration
//!
//! This module provides the configuration structures for the window limiter.
//! Think of this as the "settings panel": how many permits, and how long a
//! window lasts.
//!
//! ## Key Concepts
//!
//! ```text
//!     Window Configuration:
//!
//!     ┌──────────────────────────────┐
//!     │   limit: 5                   │ ← Permits per window
//!     │   ┌─────────────────────┐    │
//!     │   │ ✔ ✔ ✔ · ·           │    │ ← Granted so far
//!     │   └─────────────────────┘    │
//!     │                              │
//!     │   interval_ms: 1000          │ ← Window length
//!     └──────────────────────────────┘
//! ```
//!
//! The window is not aligned to the wall clock. It starts at the first
//! acquisition after the previous window elapsed.

use crate::error::RateLimitError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Granularity of the rolling window.
///
/// A limiter built from a unit uses exactly one unit as its window length,
/// so `TimeUnit::Minute` with a limit of 100 means "100 calls per minute".
///
/// ## Example
///
/// ```rust
/// use window_gate::TimeUnit;
///
/// assert_eq!(TimeUnit::Second.as_millis(), 1_000);
/// assert_eq!(TimeUnit::Hour.as_millis(), 3_600_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// One millisecond.
    Millisecond,
    /// One second.
    Second,
    /// One minute.
    Minute,
    /// One hour.
    Hour,
    /// One day.
    Day,
}

impl TimeUnit {
    /// Length of one unit in milliseconds.
    #[inline]
    pub const fn as_millis(self) -> u64 {
        match self {
            Self::Millisecond => 1,
            Self::Second => 1_000,
            Self::Minute => 60_000,
            Self::Hour => 3_600_000,
            Self::Day => 86_400_000,
        }
    }

    /// Length of one unit as a [`Duration`].
    #[inline]
    pub const fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }
}

/// Configuration for rate limiter instances.
///
/// ## Examples
///
/// ```rust
/// use window_gate::{RateLimiterConfig, TimeUnit};
///
/// // 50 calls per second
/// let config = RateLimiterConfig::per_second(50);
///
/// // 1000 calls per minute
/// let config = RateLimiterConfig::per_minute(1000);
///
/// // 3 calls per 250ms
/// let config = RateLimiterConfig::new(3, 250);
///
/// // 10 calls per hour, from a unit
/// let config = RateLimiterConfig::from_unit(TimeUnit::Hour, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimiterConfig {
    /// Maximum number of permits granted within one window.
    pub limit: u64,

    /// Window length in milliseconds.
    ///
    /// Common values:
    /// - 1000 ms for per-second limiting
    /// - 60000 ms for per-minute limiting
    pub interval_ms: u64,
}

impl Default for RateLimiterConfig {
    /// 10 permits per second.
    fn default() -> Self {
        Self {
            limit: 10,
            interval_ms: TimeUnit::Second.as_millis(),
        }
    }
}

impl RateLimiterConfig {
    /// Creates a configuration with an explicit window length.
    pub fn new(limit: u64, interval_ms: u64) -> Self {
        Self { limit, interval_ms }
    }

    /// `limit` permits per one `unit`.
    pub fn from_unit(unit: TimeUnit, limit: u64) -> Self {
        Self::new(limit, unit.as_millis())
    }

    /// Per-second limiting.
    pub fn per_second(limit: u64) -> Self {
        Self::from_unit(TimeUnit::Second, limit)
    }

    /// Per-minute limiting. Useful for APIs with minute-based quotas.
    pub fn per_minute(limit: u64) -> Self {
        Self::from_unit(TimeUnit::Minute, limit)
    }

    /// Per-hour limiting.
    pub fn per_hour(limit: u64) -> Self {
        Self::from_unit(TimeUnit::Hour, limit)
    }

    /// Window length as a [`Duration`].
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validates the configuration.
    ///
    /// This is automatically called when creating a rate limiter.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::InvalidArgument`] if:
    /// - `limit` is 0
    /// - `interval_ms` is 0
    ///
    /// # Example
    ///
    /// ```rust
    /// use window_gate::RateLimiterConfig;
    ///
    /// let config = RateLimiterConfig::new(0, 1000);  // Invalid!
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.limit == 0 {
            return Err(RateLimitError::InvalidArgument(
                "limit must be greater than 0",
            ));
        }

        if self.interval_ms == 0 {
            return Err(RateLimitError::InvalidArgument(
                "interval_ms must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(TimeUnit::Millisecond.as_millis(), 1);
        assert_eq!(TimeUnit::Minute.as_millis(), 60_000);
        assert_eq!(TimeUnit::Day.as_duration(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_config_validation() {
        assert!(RateLimiterConfig::default().validate().is_ok());
        assert!(RateLimiterConfig::new(1, 1).validate().is_ok());

        assert_eq!(
            RateLimiterConfig::new(0, 1000).validate(),
            Err(RateLimitError::InvalidArgument("limit must be greater than 0"))
        );
        assert_eq!(
            RateLimiterConfig::new(5, 0).validate(),
            Err(RateLimitError::InvalidArgument(
                "interval_ms must be greater than 0"
            ))
        );
    }

    #[test]
    fn test_factory_methods() {
        let config = RateLimiterConfig::per_minute(100);
        assert_eq!(config.limit, 100);
        assert_eq!(config.interval_ms, 60_000);
        assert_eq!(config.interval(), Duration::from_secs(60));

        assert_eq!(RateLimiterConfig::per_second(7).interval_ms, 1_000);
        assert_eq!(RateLimiterConfig::per_hour(7).interval_ms, 3_600_000);
    }

    #[test]
    fn test_config_deserialize() {
        let config: RateLimiterConfig =
            serde_json::from_str(r#"{ "limit": 3, "interval_ms": 250 }"#).unwrap();
        assert_eq!(config, RateLimiterConfig::new(3, 250));

        // Missing fields fall back to defaults
        let config: RateLimiterConfig = serde_json::from_str(r#"{ "limit": 3 }"#).unwrap();
        assert_eq!(config.interval_ms, 1_000);

        let unit: TimeUnit = serde_json::from_str(r#""minute""#).unwrap();
        assert_eq!(unit, TimeUnit::Minute);
    }
}
