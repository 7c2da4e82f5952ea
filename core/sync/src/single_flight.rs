//! At-most-one-in-flight guard for async sync operations.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use storefront_common::{Error, Result};

/// Rejects overlapping sync requests instead of queuing them.
///
/// The slot is claimed with a compare-and-swap at the moment [`run`] is
/// called, before the returned future is first polled. A second call made
/// while the first future is still pending therefore observes the running
/// state even if neither has been awaited yet.
///
/// [`run`]: SingleFlightSync::run
#[derive(Debug, Default)]
pub struct SingleFlightSync {
    in_progress: AtomicBool,
}

impl SingleFlightSync {
    /// Create a new guard in the idle state.
    pub fn new() -> Self {
        Self {
            in_progress: AtomicBool::new(false),
        }
    }

    /// Whether an accepted operation has not settled yet.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Run `operation` unless another one is in flight.
    ///
    /// A rejected call resolves to `Error::AlreadyInProgress` without
    /// invoking `operation`. An accepted call resolves to the operation's own
    /// result, unchanged. The guard returns to idle once the operation
    /// settles or the returned future is dropped.
    pub fn run<'a, F, Fut, T>(&'a self, operation: F) -> impl Future<Output = Result<T>> + 'a
    where
        F: FnOnce() -> Fut + 'a,
        Fut: Future<Output = Result<T>> + 'a,
        T: 'a,
    {
        let claim = self.try_claim();
        async move {
            let _guard = claim?;
            operation().await
        }
    }

    /// Claim the slot, or fail if it is already taken.
    pub(crate) fn try_claim(&self) -> Result<FlightGuard<'_>> {
        match self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(FlightGuard {
                flag: &self.in_progress,
            }),
            Err(_) => {
                debug!("Rejecting sync request: sync already in progress");
                Err(Error::AlreadyInProgress)
            }
        }
    }
}

/// Holds the single-flight slot; releases it on drop.
#[derive(Debug)]
pub(crate) struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
