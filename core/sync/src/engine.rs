//! Data sync facade combining the single-flight guard with retries.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use storefront_common::{Error, Result, TableName};

use crate::backend::{SyncBackend, SyncReport};
use crate::config::SyncConfig;
use crate::retry::RetryRunner;
use crate::single_flight::SingleFlightSync;
use crate::state::{SyncOutcome, SyncStats};

/// Synchronizes backend tables, one sync at a time.
pub struct DataSync {
    /// Backend performing the table copy.
    backend: Arc<dyn SyncBackend>,
    /// Rejects overlapping calls.
    flight: SingleFlightSync,
    /// Retries transient backend failures.
    retry: RetryRunner,
    /// Counters across calls.
    stats: RwLock<SyncStats>,
}

impl DataSync {
    /// Create a new data sync over `backend`.
    ///
    /// # Errors
    /// - `InvalidConfig` if the configuration fails validation
    pub fn new(backend: Arc<dyn SyncBackend>, config: SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            flight: SingleFlightSync::new(),
            retry: RetryRunner::new(config.retry),
            stats: RwLock::new(SyncStats::default()),
        })
    }

    /// Sync `source` into `target`.
    ///
    /// The single-flight slot is claimed when this method is called, so a
    /// second call made before the first future is awaited resolves
    /// immediately with `success: false` and an "already in progress"
    /// message. Failures never surface as errors; they are reported in the
    /// returned outcome.
    pub fn sync_data<'a>(
        &'a self,
        source: &str,
        target: &str,
    ) -> impl Future<Output = SyncOutcome> + 'a {
        let source = source.to_string();
        let target = target.to_string();
        let (from, to) = (source.clone(), target.clone());
        let flight = self.flight.run(move || self.sync_tables(from, to));

        async move {
            let result = flight.await;
            let rejected = matches!(result, Err(Error::AlreadyInProgress));
            let outcome = SyncOutcome::from_result(&result, &source, &target);

            if outcome.success {
                info!("Sync finished: {}", outcome.message);
            } else if !rejected {
                warn!("Sync from {} to {} failed: {}", source, target, outcome.message);
            }

            self.stats.write().await.record(&outcome, rejected);
            outcome
        }
    }

    async fn sync_tables(&self, source: String, target: String) -> Result<SyncReport> {
        let source = TableName::new(source)?;
        let target = TableName::new(target)?;

        info!(
            "Starting sync from {} to {} via {}",
            source,
            target,
            self.backend.name()
        );
        self.retry
            .run(|| self.backend.sync(&source, &target))
            .await
    }

    /// Whether a sync is currently running.
    pub fn is_in_progress(&self) -> bool {
        self.flight.is_in_progress()
    }

    /// Snapshot of the counters.
    pub async fn stats(&self) -> SyncStats {
        self.stats.read().await.clone()
    }
}
