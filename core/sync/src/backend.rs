//! Sync backend trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use storefront_common::{Result, TableName};

/// Summary of one successful synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Number of records written to the target table.
    pub records_synced: usize,
}

/// Backend that performs the actual table synchronization.
///
/// In the application this is a thin wrapper over the hosted relational
/// store. Implementations must handle their own authentication and rate
/// limiting; transient failures are retried by the caller.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// Get the backend name (e.g., "memory", "hosted").
    fn name(&self) -> &str;

    /// Synchronize records from `source` into `target`.
    ///
    /// # Postconditions
    /// - `target` reflects the records of `source` at the time of the call
    ///
    /// # Errors
    /// - `source` does not exist
    /// - Network/backend errors
    async fn sync(&self, source: &TableName, target: &TableName) -> Result<SyncReport>;
}
