//! # window-gate - Blocking Window Rate Limiter
//!
//! Keeps calls to a downstream API under a fixed budget per rolling window:
//! no more than `limit` calls in any window of `interval` length. Callers
//! that would exceed the budget block until the window rolls over.
//!
//! ## The Window Algorithm
//!
//! ```text
//!     limit = 2, interval = 1s
//!
//!     t=0.0s   call 1 ──► [✔ ·]   window opens
//!     t=0.1s   call 2 ──► [✔ ✔]
//!     t=0.2s   call 3 ──► [✔ ✔]   blocked ...
//!     t=1.0s            ──► [✔ ·]   window rolls, call 3 proceeds
//! ```
//!
//! - **Permit** = the right to make one call in the current window
//! - **Window** = starts at the first call after the previous one elapsed
//! - **Roll** = resetting the count once the window has elapsed
//!
//! ## Quick Start
//!
//! ### Blocking acquisition
//!
//! ```rust
//! use window_gate::{RateLimiter, TimeUnit};
//!
//! // At most 5 calls per second
//! let limiter = RateLimiter::new(TimeUnit::Second, 5).unwrap();
//!
//! limiter.acquire();
//! // ... call the downstream API ...
//! ```
//!
//! ### Gating an action
//!
//! ```rust
//! use window_gate::{GatedInvoker, RateLimiter, TimeUnit};
//!
//! let invoker = GatedInvoker::new(RateLimiter::new(TimeUnit::Minute, 100).unwrap());
//!
//! let result: Result<String, std::io::Error> = invoker.execute(|| {
//!     // The protected side effect; its error comes back unchanged
//!     Ok("created".to_string())
//! });
//! assert_eq!(result.unwrap(), "created");
//! ```
//!
//! ### Submitting documents
//!
//! ```rust,no_run
//! use window_gate::{ClientConfig, Document, DocumentClient, RateLimiterConfig};
//!
//! let client = DocumentClient::new(ClientConfig::new(RateLimiterConfig::per_second(3)))?;
//! let document = Document::builder("doc-1", "LP_INTRODUCE_GOODS").build();
//! client.create_document(&document, "signature")?;
//! # Ok::<(), window_gate::ClientError>(())
//! ```
//!
//! ## Architecture Overview
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │     DocumentClient      │
//!                    └──────────┬──────────────┘
//!                               │ execute(send)
//!                    ┌──────────▼──────────────┐
//!                    │      GatedInvoker       │
//!                    └──────────┬──────────────┘
//!                               │ acquire()
//!                    ┌──────────▼──────────────┐
//!                    │      RateLimiter        │
//!                    ├─────────────────────────┤
//!                    │ • Mutex<count, start>   │
//!                    │ • Condvar on roll       │
//!                    │ • Lazy window roll      │
//!                    └─────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - The number of permits granted within one window never exceeds `limit`.
//! - A permit is spent even if the gated action fails; there is no refund.
//! - Waiters are woken on every roll; there is no FIFO ordering among them.
//! - Time is measured with a monotonic clock, so wall clock changes do not
//!   affect windows.
//!
//! ## Thread Safety
//!
//! All types are thread-safe and can be shared across threads:
//! - `RateLimiter` - Safe to share via `Arc<RateLimiter>`
//! - `GatedInvoker` / `DocumentClient` - Cheap to clone, clones share state

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

mod document;
mod error;
mod rate_limiter;

pub use document::{
    ClientConfig, Description, Document, DocumentBuilder, DocumentClient, Product,
    SubmitResponse, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_MS, SIGNATURE_HEADER,
};
pub use error::{ClientError, GateError, RateLimitError};
pub use rate_limiter::{
    current_time_ms, CancellationToken, GatedInvoker, RateLimiter, RateLimiterConfig,
    RateLimiterMetrics, TimeUnit,
};

/// A rate limiter wrapped in `Arc` for convenient thread-safe sharing.
///
/// # Example
/// ```rust
/// use window_gate::{GatedInvoker, RateLimiter, SharedRateLimiter, TimeUnit};
/// use std::sync::Arc;
///
/// let shared: SharedRateLimiter = Arc::new(RateLimiter::new(TimeUnit::Second, 10).unwrap());
///
/// // Two invokers drawing from one budget
/// let a = GatedInvoker::shared(shared.clone());
/// let b = GatedInvoker::shared(shared.clone());
/// std::thread::spawn(move || {
///     let _: Result<(), ()> = a.execute(|| Ok(()));
/// });
/// ```
pub type SharedRateLimiter = std::sync::Arc<RateLimiter>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use window_gate::prelude::*;
/// ```
pub mod prelude {
    //! Common imports for typical rate limiting use cases.
    //!
    //! # Example
    //! ```rust
    //! use window_gate::prelude::*;
    //!
    //! let limiter = RateLimiter::new(TimeUnit::Second, 10).unwrap();
    //! let invoker = GatedInvoker::new(limiter);
    //! let config = RateLimiterConfig::per_minute(50);
    //! ```

    pub use crate::{
        CancellationToken, GateError, GatedInvoker, RateLimitError, RateLimiter,
        RateLimiterBuilder, RateLimiterConfig, RateLimiterMetrics, SharedRateLimiter, TimeUnit,
    };
}

/// Builder pattern for creating rate limiters with custom configuration.
///
/// # Example
///
/// ```rust
/// use window_gate::{RateLimiterBuilder, TimeUnit};
///
/// // 100 calls per minute
/// let limiter = RateLimiterBuilder::new()
///     .limit(100)
///     .interval(TimeUnit::Minute)
///     .try_build()
///     .unwrap();
/// assert_eq!(limiter.limit(), 100);
///
/// let result = RateLimiterBuilder::new()
///     .limit(0)  // Invalid!
///     .try_build();
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateLimiterBuilder {
    config: RateLimiterConfig,
}

impl RateLimiterBuilder {
    /// Creates a new builder with the default configuration
    /// (10 permits per second).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of permits per window. Must be > 0.
    pub fn limit(mut self, limit: u64) -> Self {
        self.config.limit = limit;
        self
    }

    /// Sets the window length to one `unit`.
    pub fn interval(mut self, unit: TimeUnit) -> Self {
        self.config.interval_ms = unit.as_millis();
        self
    }

    /// Sets the window length in milliseconds. Must be > 0.
    ///
    /// Common values:
    /// - 1000 ms = per second
    /// - 60000 ms = per minute
    /// - 100 ms = ten windows per second
    pub fn interval_ms(mut self, ms: u64) -> Self {
        self.config.interval_ms = ms;
        self
    }

    /// The configuration assembled so far.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Builds the rate limiter.
    ///
    /// # Errors
    ///
    /// [`RateLimitError::InvalidArgument`] if the limit or interval is 0.
    pub fn try_build(self) -> Result<RateLimiter, RateLimitError> {
        RateLimiter::with_config(self.config)
    }

    /// Builds a [`GatedInvoker`] around a new limiter.
    ///
    /// # Errors
    ///
    /// Same as [`try_build`](Self::try_build).
    pub fn try_build_invoker(self) -> Result<GatedInvoker, RateLimitError> {
        self.try_build().map(GatedInvoker::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_functionality() {
        let limiter = RateLimiter::new(TimeUnit::Hour, 10).unwrap();

        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());

        let metrics = limiter.metrics();
        assert_eq!(metrics.total_acquired, 10);
        assert_eq!(metrics.total_rejected, 1);
        assert!(metrics.is_saturated());
    }

    #[test]
    fn test_builder() {
        let limiter = RateLimiterBuilder::new()
            .limit(50)
            .interval_ms(250)
            .try_build()
            .unwrap();

        assert_eq!(limiter.limit(), 50);
        assert_eq!(limiter.interval(), std::time::Duration::from_millis(250));
        assert_eq!(limiter.available_permits(), 50);
    }

    #[test]
    fn test_builder_validation() {
        assert!(RateLimiterBuilder::new().limit(0).try_build().is_err());
        assert!(RateLimiterBuilder::new().interval_ms(0).try_build().is_err());
        assert!(RateLimiterBuilder::new().limit(0).try_build_invoker().is_err());
    }

    #[test]
    fn test_builder_default() {
        let builder = RateLimiterBuilder::default();
        assert_eq!(builder.config(), &RateLimiterConfig::default());

        let invoker = builder.interval(TimeUnit::Minute).try_build_invoker().unwrap();
        assert_eq!(invoker.limiter().interval().as_secs(), 60);
    }

    #[test]
    fn test_thread_safety() {
        let limiter: SharedRateLimiter = Arc::new(RateLimiter::new(TimeUnit::Hour, 100).unwrap());
        let mut handles = vec![];

        for _ in 0..10 {
            let limiter = limiter.clone();
            handles.push(thread::spawn(move || {
                (0..20).filter(|_| limiter.try_acquire()).count()
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let limiter = RateLimiter::new(TimeUnit::Second, 1).unwrap();
        let _invoker = GatedInvoker::new(limiter);
        let _config = RateLimiterConfig::default();
        let _token = CancellationToken::new();
    }

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
    }
}
