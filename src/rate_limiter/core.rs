//! # Core Rate Limiter Implementation
//!
//! This module implements the blocking window limiter. At most `limit`
//! permits are granted per window; callers beyond that are parked on a
//! condition variable until the window rolls over.
//!
//! ## The Window Algorithm
//!
//! ```text
//!     limit = 3, interval = 1000ms
//!
//!     t=0     acquire ──► roll (count=0, start=0) ──► count=1 ✔
//!     t=10    acquire ──────────────────────────────► count=2 ✔
//!     t=20    acquire ──────────────────────────────► count=3 ✔
//!     t=30    acquire ──► count >= limit
//!                         wait up to 1000-(30-0) = 970ms
//!     t=1000  wake ──► roll (count=0, start=1000) ──► count=1 ✔
//! ```
//!
//! The window is reset lazily by whichever caller first observes that it has
//! elapsed; there is no background timer. A roll snaps the window start to
//! the present instant, so an idle limiter does not "catch up" on missed
//! windows.
//!
//! ## Waking
//!
//! ```text
//!     Thread A ──┐                    ┌──► re-check ──► ✔ / wait again
//!     Thread B ──┼──► Condvar ──wake──┼──► re-check ──► ✔ / wait again
//!     Thread C ──┘       ▲            └──► re-check ──► ✔ / wait again
//!                        │
//!                  roll: notify_all
//! ```
//!
//! Every wake re-tests the predicate. Whichever thread reacquires the lock
//! first claims the fresh permits; there is no FIFO ordering among waiters.

use super::{
    cancel::{CancellationToken, Wake},
    config::{RateLimiterConfig, TimeUnit},
    metrics::RateLimiterMetrics,
    utils::{current_time_ms, duration_to_ms, elapsed_ms},
};
use crate::error::RateLimitError;
use parking_lot::{Condvar, Mutex};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Mutable state guarded by the limiter's lock.
#[derive(Debug, Default)]
struct WindowState {
    /// Permits granted in the current window.
    count: u64,

    /// Start of the current window; `None` until the first acquisition.
    window_start: Option<u64>,

    total_acquired: u64,
    total_waited: u64,
    total_rolls: u64,
    total_rejected: u64,
    total_abandoned: u64,
    max_wait_time_ns: u64,
}

/// Lock and condition variable, reachable from cancellation tokens.
#[derive(Debug, Default)]
struct Shared {
    state: Mutex<WindowState>,

    /// Signalled on every window roll and on cancellation.
    window_rolled: Condvar,
}

impl Wake for Shared {
    fn wake(&self) {
        // Taking the lock orders this notify after any waiter's last
        // cancellation check.
        let _state = self.state.lock();
        self.window_rolled.notify_all();
    }
}

/// Blocking, thread-safe window rate limiter.
///
/// Shared between threads via `Arc<RateLimiter>`. The only state is the
/// permit count and the window start, both behind one mutex.
///
/// ## Example
///
/// ```rust
/// use window_gate::{RateLimiter, TimeUnit};
/// use std::sync::Arc;
/// use std::thread;
///
/// let limiter = Arc::new(RateLimiter::new(TimeUnit::Second, 10).unwrap());
///
/// let mut handles = vec![];
/// for _ in 0..4 {
///     let limiter = limiter.clone();
///     handles.push(thread::spawn(move || {
///         for _ in 0..2 {
///             limiter.acquire();
///             // Call the downstream API here
///         }
///     }));
/// }
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(limiter.metrics().total_acquired, 8);
/// ```
pub struct RateLimiter {
    shared: Arc<Shared>,
    limit: u64,
    interval_ms: u64,
}

impl RateLimiter {
    /// Creates a limiter granting `limit` permits per one `unit`.
    ///
    /// # Errors
    ///
    /// [`RateLimitError::InvalidArgument`] if `limit <= 0`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use window_gate::{RateLimiter, RateLimitError, TimeUnit};
    ///
    /// let limiter = RateLimiter::new(TimeUnit::Minute, 100).unwrap();
    /// assert_eq!(limiter.limit(), 100);
    ///
    /// assert!(matches!(
    ///     RateLimiter::new(TimeUnit::Second, -5),
    ///     Err(RateLimitError::InvalidArgument(_))
    /// ));
    /// ```
    pub fn new(unit: TimeUnit, limit: i64) -> Result<Self, RateLimitError> {
        let limit = u64::try_from(limit)
            .map_err(|_| RateLimitError::InvalidArgument("limit must be greater than 0"))?;
        Self::with_config(RateLimiterConfig::from_unit(unit, limit))
    }

    /// Creates a limiter from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Whatever [`RateLimiterConfig::validate`] rejects.
    pub fn with_config(config: RateLimiterConfig) -> Result<Self, RateLimitError> {
        config.validate()?;

        Ok(Self {
            shared: Arc::default(),
            limit: config.limit,
            interval_ms: config.interval_ms,
        })
    }

    /// Blocks until a permit is granted.
    ///
    /// Returns immediately while the current window has budget left;
    /// otherwise parks the calling thread until the window rolls over.
    pub fn acquire(&self) {
        let granted = self.acquire_inner(None, None);
        debug_assert!(granted.is_ok(), "unbounded acquisition cannot fail");
    }

    /// Takes a permit if one is available right now. Never blocks.
    ///
    /// ```rust
    /// use window_gate::{RateLimiter, TimeUnit};
    ///
    /// let limiter = RateLimiter::new(TimeUnit::Hour, 1).unwrap();
    /// assert!(limiter.try_acquire());
    /// assert!(!limiter.try_acquire());
    /// ```
    pub fn try_acquire(&self) -> bool {
        let mut state = self.shared.state.lock();
        self.roll_if_elapsed(&mut state, current_time_ms());

        if state.count < self.limit {
            self.grant(&mut state, None);
            true
        } else {
            state.total_rejected += 1;
            false
        }
    }

    /// Like [`acquire`](Self::acquire), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// [`RateLimitError::TimedOut`] if no permit was granted in time. No
    /// permit is consumed in that case.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<(), RateLimitError> {
        let deadline = current_time_ms().saturating_add(duration_to_ms(timeout));
        self.acquire_inner(Some(deadline), None)
    }

    /// Like [`acquire`](Self::acquire), but returns early once `token` is
    /// cancelled.
    ///
    /// A token that is already cancelled still gets a permit if one is
    /// available without waiting. Cancelling wakes the waiter directly;
    /// it does not poll the token.
    ///
    /// # Errors
    ///
    /// [`RateLimitError::Cancelled`] if the token fired before a permit was
    /// granted. No permit is consumed in that case.
    ///
    /// ```rust
    /// use window_gate::{CancellationToken, RateLimiter, RateLimitError, TimeUnit};
    ///
    /// let limiter = RateLimiter::new(TimeUnit::Hour, 1).unwrap();
    /// let token = CancellationToken::new();
    /// limiter.acquire_cancellable(&token).unwrap();
    ///
    /// token.cancel();
    /// assert_eq!(limiter.acquire_cancellable(&token), Err(RateLimitError::Cancelled));
    /// ```
    pub fn acquire_cancellable(&self, token: &CancellationToken) -> Result<(), RateLimitError> {
        self.acquire_inner(None, Some(token))
    }

    fn acquire_inner(
        &self,
        deadline_ms: Option<u64>,
        token: Option<&CancellationToken>,
    ) -> Result<(), RateLimitError> {
        let mut state = self.shared.state.lock();
        let mut now = current_time_ms();
        self.roll_if_elapsed(&mut state, now);

        let mut wait_started: Option<Instant> = None;
        let mut registered = false;

        while state.count >= self.limit {
            if let Some(token) = token {
                if !registered {
                    let waker: Weak<Shared> = Arc::downgrade(&self.shared);
                    token.register(waker);
                    registered = true;
                }
            }
            if token.is_some_and(CancellationToken::is_cancelled) {
                state.total_abandoned += 1;
                debug!("Acquisition cancelled while window saturated");
                return Err(RateLimitError::Cancelled);
            }

            let window_start = state.window_start.unwrap_or(now);
            let mut remaining = self
                .interval_ms
                .saturating_sub(elapsed_ms(now, window_start));

            if let Some(deadline) = deadline_ms {
                if now >= deadline {
                    state.total_abandoned += 1;
                    debug!("Acquisition timed out while window saturated");
                    return Err(RateLimitError::TimedOut);
                }
                remaining = remaining.min(deadline - now);
            }

            if remaining > 0 {
                if wait_started.is_none() {
                    debug!(
                        limit = self.limit,
                        remaining_ms = remaining,
                        "Window saturated, waiting for roll"
                    );
                    wait_started = Some(Instant::now());
                }
                self.shared
                    .window_rolled
                    .wait_for(&mut state, Duration::from_millis(remaining));
            }

            now = current_time_ms();
            self.roll_if_elapsed(&mut state, now);
        }

        self.grant(&mut state, wait_started);
        Ok(())
    }

    /// Starts a new window if none is open or the current one has elapsed.
    ///
    /// Must be called with the lock held. Wakes all waiters on a roll.
    fn roll_if_elapsed(&self, state: &mut WindowState, now: u64) {
        let elapsed = match state.window_start {
            Some(start) if elapsed_ms(now, start) < self.interval_ms => return,
            Some(start) => Some(elapsed_ms(now, start)),
            None => None,
        };

        if state.count > 0 {
            debug!(
                used = state.count,
                limit = self.limit,
                elapsed_ms = elapsed,
                "Window rolled"
            );
        }
        state.count = 0;
        state.window_start = Some(now);
        state.total_rolls += 1;

        self.shared.window_rolled.notify_all();
    }

    fn grant(&self, state: &mut WindowState, wait_started: Option<Instant>) {
        debug_assert!(state.count < self.limit);
        state.count += 1;
        state.total_acquired += 1;

        if let Some(started) = wait_started {
            let waited_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
            state.total_waited += 1;
            state.max_wait_time_ns = state.max_wait_time_ns.max(waited_ns);
        }

        trace!(used = state.count, limit = self.limit, "Permit granted");
    }

    /// Permits still available without waiting.
    ///
    /// Accounts for a window that has elapsed but not yet been rolled.
    pub fn available_permits(&self) -> u64 {
        let state = self.shared.state.lock();
        match state.window_start {
            Some(start) if elapsed_ms(current_time_ms(), start) < self.interval_ms => {
                self.limit - state.count
            }
            _ => self.limit,
        }
    }

    /// Permits per window.
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Window length.
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Takes a consistent snapshot of the counters.
    pub fn metrics(&self) -> RateLimiterMetrics {
        let state = self.shared.state.lock();
        RateLimiterMetrics {
            total_acquired: state.total_acquired,
            total_waited: state.total_waited,
            total_rolls: state.total_rolls,
            total_rejected: state.total_rejected,
            total_abandoned: state.total_abandoned,
            current_count: state.count,
            limit: self.limit,
            max_wait_time_ns: state.max_wait_time_ns,
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limit", &self.limit)
            .field("interval_ms", &self.interval_ms)
            .field("available_permits", &self.available_permits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn limiter(limit: u64, interval_ms: u64) -> RateLimiter {
        RateLimiter::with_config(RateLimiterConfig::new(limit, interval_ms)).unwrap()
    }

    #[test]
    fn test_basic_acquisition() {
        let limiter = limiter(3, 60_000);

        for _ in 0..3 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.available_permits(), 0);
    }

    #[test]
    fn test_invalid_construction() {
        for limit in [0, -5, i64::MIN] {
            assert!(matches!(
                RateLimiter::new(TimeUnit::Second, limit),
                Err(RateLimitError::InvalidArgument(_))
            ));
        }
        assert!(RateLimiter::new(TimeUnit::Second, 1).is_ok());
        assert!(matches!(
            RateLimiter::with_config(RateLimiterConfig::new(1, 0)),
            Err(RateLimitError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_window_not_started_until_first_acquire() {
        let limiter = limiter(2, 50);
        assert_eq!(limiter.metrics().total_rolls, 0);

        // Construction time does not count toward the first window
        thread::sleep(Duration::from_millis(60));
        limiter.acquire();
        assert_eq!(limiter.metrics().total_rolls, 1);
        assert_eq!(limiter.available_permits(), 1);
    }

    #[test]
    fn test_window_roll_restores_budget() {
        let limiter = limiter(2, 100);

        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        thread::sleep(Duration::from_millis(110));

        assert_eq!(limiter.available_permits(), 2);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_acquire_blocks_until_roll() {
        let limiter = limiter(1, 200);

        let start = Instant::now();
        limiter.acquire();
        limiter.acquire();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(190), "returned after {:?}", elapsed);
        let metrics = limiter.metrics();
        assert_eq!(metrics.total_acquired, 2);
        assert_eq!(metrics.total_waited, 1);
        assert!(metrics.max_wait_time_ns > 0);
    }

    #[test]
    fn test_acquire_timeout() {
        let limiter = limiter(1, 60_000);
        limiter.acquire();

        let start = Instant::now();
        assert_eq!(
            limiter.acquire_timeout(Duration::from_millis(50)),
            Err(RateLimitError::TimedOut)
        );
        assert!(start.elapsed() >= Duration::from_millis(45));

        // Zero timeout fails fast on a saturated window
        assert_eq!(
            limiter.acquire_timeout(Duration::ZERO),
            Err(RateLimitError::TimedOut)
        );

        let metrics = limiter.metrics();
        assert_eq!(metrics.total_acquired, 1);
        assert_eq!(metrics.total_abandoned, 2);
        assert_eq!(metrics.current_count, 1);
    }

    #[test]
    fn test_acquire_timeout_succeeds_after_roll() {
        let limiter = limiter(1, 50);
        limiter.acquire();
        assert!(limiter.acquire_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_cancel_wakes_waiter() {
        let limiter = Arc::new(limiter(1, 60_000));
        limiter.acquire();

        let token = CancellationToken::new();
        let waiter = {
            let limiter = limiter.clone();
            let token = token.clone();
            thread::spawn(move || limiter.acquire_cancellable(&token))
        };

        thread::sleep(Duration::from_millis(50));
        token.cancel();

        assert_eq!(waiter.join().unwrap(), Err(RateLimitError::Cancelled));
        let metrics = limiter.metrics();
        assert_eq!(metrics.current_count, 1);
        assert_eq!(metrics.total_abandoned, 1);
    }

    #[test]
    fn test_cancel_wakes_waiter_without_polling() {
        let limiter = Arc::new(limiter(1, 60_000));
        limiter.acquire();

        let token = CancellationToken::new();
        let waiter = {
            let limiter = limiter.clone();
            let token = token.clone();
            thread::spawn(move || limiter.acquire_cancellable(&token))
        };

        // The blocked waiter has handed its limiter to the token
        let deadline = Instant::now() + Duration::from_secs(2);
        while token.registered() == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(token.registered(), 1);

        let cancelled_at = Instant::now();
        token.cancel();
        assert_eq!(waiter.join().unwrap(), Err(RateLimitError::Cancelled));
        assert!(
            cancelled_at.elapsed() < Duration::from_millis(200),
            "waiter returned after {:?}",
            cancelled_at.elapsed()
        );
        assert_eq!(limiter.metrics().total_acquired, 1);
    }

    #[test]
    fn test_cancelled_token_still_takes_free_permit() {
        let limiter = limiter(1, 60_000);
        let token = CancellationToken::new();
        token.cancel();

        assert!(limiter.acquire_cancellable(&token).is_ok());
        assert_eq!(
            limiter.acquire_cancellable(&token),
            Err(RateLimitError::Cancelled)
        );
    }

    #[test]
    fn test_budget_never_exceeded_under_contention() {
        let limiter = Arc::new(limiter(25, 60_000));
        let mut handles = vec![];

        for _ in 0..8 {
            let limiter = limiter.clone();
            handles.push(thread::spawn(move || {
                (0..10).filter(|_| limiter.try_acquire()).count()
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 25);

        let metrics = limiter.metrics();
        assert_eq!(metrics.total_acquired, 25);
        assert_eq!(metrics.total_rejected, 55);
    }

    #[test]
    fn test_debug_output() {
        let limiter = limiter(4, 1000);
        let debug = format!("{:?}", limiter);
        assert!(debug.contains("limit: 4"));
        assert!(debug.contains("interval_ms: 1000"));
    }
}
