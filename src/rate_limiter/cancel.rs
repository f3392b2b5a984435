//! Cooperative cancellation for blocked acquisitions.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Something a token can rouse when it is cancelled.
pub(crate) trait Wake: Send + Sync {
    fn wake(&self);
}

#[derive(Default)]
struct TokenState {
    cancelled: AtomicBool,

    /// Limiters a clone of this token is currently blocked on.
    waiters: Mutex<Vec<Weak<dyn Wake>>>,
}

/// Shared flag that asks blocked acquisitions to give up.
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
/// Cancelling wakes every limiter a clone is blocked on, so waiters return
/// promptly without polling.
///
/// ```rust
/// use window_gate::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation and wakes blocked waiters.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);

        // Release the list before waking: a waiter registers while holding
        // its limiter's lock, and `wake` takes that same lock.
        let waiters: Vec<Arc<dyn Wake>> = {
            let mut waiters = self.state.waiters.lock();
            waiters.drain(..).filter_map(|w| w.upgrade()).collect()
        };
        for waiter in waiters {
            waiter.wake();
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Asks to be woken on cancellation. Must be called before the waiter
    /// last checks [`is_cancelled`](Self::is_cancelled).
    pub(crate) fn register(&self, waiter: Weak<dyn Wake>) {
        let mut waiters = self.state.waiters.lock();
        waiters.retain(|w| w.strong_count() > 0);
        if !waiters.iter().any(|w| w.ptr_eq(&waiter)) {
            waiters.push(waiter);
        }
    }

    #[cfg(test)]
    pub(crate) fn registered(&self) -> usize {
        self.state.waiters.lock().len()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
