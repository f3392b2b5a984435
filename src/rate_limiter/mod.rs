//! # Rate Limiter Module
//!
//! Internal implementation of the window limiter.
//!
//! ## Module Structure
//!
//! ```text
//!     rate_limiter/
//!     ├── mod.rs          (You are here - Module organization)
//!     ├── cancel.rs       (Cancellation token for blocked callers)
//!     ├── config.rs       (Time units, configuration and validation)
//!     ├── core.rs         (Blocking window limiter)
//!     ├── gate.rs         (Acquire-then-run wrapper)
//!     ├── metrics.rs      (Counter snapshots)
//!     └── utils.rs        (Monotonic clock helpers)
//! ```
//!
//! ## Architecture Flow
//!
//! ```text
//!     Caller
//!        │
//!        ▼
//!     ┌──────────────┐
//!     │ GatedInvoker │ ◄── acquire, then run the action once
//!     └──────┬───────┘
//!            │
//!            ▼
//!     ┌──────────────┐
//!     │ RateLimiter  │ ◄── count / window start behind one mutex
//!     └──────┬───────┘
//!            │
//!            ▼
//!     ┌──────────────┐
//!     │    Utils     │ ◄── monotonic milliseconds
//!     └──────────────┘
//! ```

mod cancel;
mod config;
mod core;
mod gate;
mod metrics;
mod utils;

/// Cooperative cancellation for blocked acquisitions
pub use cancel::CancellationToken;

/// Configuration types
pub use config::{RateLimiterConfig, TimeUnit};

/// Blocking window rate limiter
pub use self::core::RateLimiter;

/// Wrapper that runs an action only after a permit is granted
pub use gate::GatedInvoker;

/// Counter snapshots for observability
pub use metrics::RateLimiterMetrics;

/// Clock used for window arithmetic
pub use utils::current_time_ms;
