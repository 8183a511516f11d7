//! One-shot "fully stopped" signal for the worker pool.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tokio::sync::watch;

use super::error::PoolError;

/// Signal fired once every worker of a pool has exited.
///
/// Cloning is cheap; every clone observes the same signal. Thread waiters
/// park on a Condvar, async waiters on a `watch` channel. Neither polls.
#[derive(Debug, Clone, Default)]
pub struct StoppedSignal {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    stopped: Mutex<bool>,
    condvar: Condvar,
    watch: watch::Sender<bool>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            stopped: Mutex::new(false),
            condvar: Condvar::new(),
            watch: watch::channel(false).0,
        }
    }
}

impl StoppedSignal {
    /// Create an unfired signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the signal fired and wake every waiter. Firing twice is harmless.
    pub(crate) fn fire(&self) {
        *self.inner.stopped.lock() = true;
        self.inner.condvar.notify_all();
        // send_replace stores the value even with no receiver subscribed.
        self.inner.watch.send_replace(true);
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.inner.stopped.lock()
    }

    /// Block the current thread until the signal fires.
    pub fn wait(&self) {
        let mut guard = self.inner.stopped.lock();
        while !*guard {
            self.inner.condvar.wait(&mut guard);
        }
    }

    /// Block for at most `timeout`. Returns `true` if the signal fired.
    #[must_use]
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let mut guard = self.inner.stopped.lock();
        if *guard {
            return true;
        }
        // wait_while_for re-checks the flag across spurious wakeups.
        let _ = self.inner.condvar.wait_while_for(&mut guard, |fired| !*fired, timeout);
        *guard
    }

    /// Wait from async code.
    ///
    /// Cancel-safe: dropping the future (for example when an outer
    /// `tokio::time::timeout` expires) leaves no thread or task behind.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Internal` if the signal's sender is gone, which
    /// cannot happen while `self` is alive.
    pub async fn wait_async(&self) -> Result<(), PoolError> {
        let mut rx = self.inner.watch.subscribe();
        let fired = rx.wait_for(|fired| *fired).await.map(|_| ());
        fired.map_err(|e| PoolError::Internal(format!("stop waiter failed: {e}")))
    }
}
