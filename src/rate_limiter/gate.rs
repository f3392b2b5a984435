//! Acquire-then-run wrapper around a shared [`RateLimiter`].
//!
//! ```text
//!     execute(action)
//!          │
//!          ▼
//!     limiter.acquire() ── blocks while the window is saturated
//!          │
//!          ▼
//!     action() ──► Ok(T) / Err(E)   (returned as-is, permit not refunded)
//! ```

use super::{cancel::CancellationToken, core::RateLimiter};
use crate::error::GateError;
use std::sync::Arc;

/// Runs actions only after the limiter granted a permit.
///
/// A permit is never taken without running the action exactly once, and an
/// action never runs without a permit. Failed actions still count against
/// the window.
///
/// Clones share the same limiter.
///
/// ```rust
/// use window_gate::{GatedInvoker, RateLimiter, TimeUnit};
///
/// let invoker = GatedInvoker::new(RateLimiter::new(TimeUnit::Second, 5).unwrap());
///
/// let answer: Result<u32, String> = invoker.execute(|| Ok(42));
/// assert_eq!(answer, Ok(42));
///
/// let failure: Result<u32, String> = invoker.execute(|| Err("downstream said no".into()));
/// assert_eq!(failure, Err("downstream said no".to_string()));
///
/// // Both calls used a permit
/// assert_eq!(invoker.limiter().metrics().total_acquired, 2);
/// ```
#[derive(Debug, Clone)]
pub struct GatedInvoker {
    limiter: Arc<RateLimiter>,
}

impl GatedInvoker {
    /// Wraps a limiter owned by this invoker (and its clones).
    pub fn new(limiter: RateLimiter) -> Self {
        Self::shared(Arc::new(limiter))
    }

    /// Wraps a limiter that is also used elsewhere.
    pub fn shared(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }

    /// The limiter guarding this invoker.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Blocks for a permit, then runs `action` and returns its result unchanged.
    pub fn execute<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.limiter.acquire();
        action()
    }

    /// Like [`execute`](Self::execute), but stops waiting once `token` is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// - [`GateError::Cancelled`]: no permit was granted and `action` never ran.
    /// - [`GateError::Action`]: `action` ran and failed.
    pub fn execute_cancellable<T, E, F>(
        &self,
        token: &CancellationToken,
        action: F,
    ) -> Result<T, GateError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.limiter
            .acquire_cancellable(token)
            .map_err(|_| GateError::Cancelled)?;
        action().map_err(GateError::Action)
    }

    /// Runs `action` only if a permit is available right now.
    ///
    /// # Errors
    ///
    /// - [`GateError::Saturated`]: the window is exhausted and `action` never ran.
    /// - [`GateError::Action`]: `action` ran and failed.
    pub fn try_execute<T, E, F>(&self, action: F) -> Result<T, GateError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if !self.limiter.try_acquire() {
            return Err(GateError::Saturated);
        }
        action().map_err(GateError::Action)
    }
}

impl From<RateLimiter> for GatedInvoker {
    fn from(limiter: RateLimiter) -> Self {
        Self::new(limiter)
    }
}

impl From<Arc<RateLimiter>> for GatedInvoker {
    fn from(limiter: Arc<RateLimiter>) -> Self {
        Self::shared(limiter)
    }
}
