//! In-memory sync backend for testing and local runs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use storefront_common::{Error, Result, TableName};

use crate::backend::{SyncBackend, SyncReport};

/// In-memory backend holding tables of JSON records.
///
/// All data is stored in memory and lost on drop. Failures and latency can
/// be injected to exercise retry and single-flight behavior.
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    remaining_failures: AtomicU32,
    latency: Option<Duration>,
}

impl MemoryBackend {
    /// Create a new empty memory backend.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            remaining_failures: AtomicU32::new(0),
            latency: None,
        }
    }

    /// Make the next `count` sync calls fail with a backend error.
    pub fn with_failures(self, count: u32) -> Self {
        self.remaining_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Delay every sync call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Append records to a table, creating it if needed.
    pub async fn insert(&self, table: &TableName, records: impl IntoIterator<Item = Value>) {
        let mut tables = self.tables.write().await;
        tables
            .entry(table.as_str().to_string())
            .or_default()
            .extend(records);
    }

    /// Snapshot of a table's records, if the table exists.
    pub async fn records(&self, table: &TableName) -> Option<Vec<Value>> {
        self.tables.read().await.get(table.as_str()).cloned()
    }

    fn take_failure(&self) -> bool {
        self.remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn sync(&self, source: &TableName, target: &TableName) -> Result<SyncReport> {
        if let Some(latency) = self.latency.filter(|l| !l.is_zero()) {
            tokio::time::sleep(latency).await;
        }

        if self.take_failure() {
            return Err(Error::Backend("injected failure".to_string()));
        }

        let mut tables = self.tables.write().await;
        let records = tables
            .get(source.as_str())
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("table '{}'", source)))?;
        let records_synced = records.len();
        tables.insert(target.as_str().to_string(), records);

        debug!("Copied {} records from {} to {}", records_synced, source, target);
        Ok(SyncReport { records_synced })
    }
}
