//! Sync outcomes and run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_common::Result;

use crate::backend::SyncReport;

/// Structured result of one `sync_data` call.
///
/// Every failure, including a rejected overlapping call, is reported here
/// rather than as an error so callers can surface it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Whether the sync completed.
    pub success: bool,
    /// Human-readable summary or failure reason.
    pub message: String,
    /// Records written to the target; zero on failure.
    pub records_synced: usize,
    /// When the call settled.
    pub finished_at: DateTime<Utc>,
}

impl SyncOutcome {
    /// Build an outcome from a sync result.
    pub fn from_result(result: &Result<SyncReport>, source: &str, target: &str) -> Self {
        match result {
            Ok(report) => Self {
                success: true,
                message: format!(
                    "synced {} records from {} to {}",
                    report.records_synced, source, target
                ),
                records_synced: report.records_synced,
                finished_at: Utc::now(),
            },
            Err(err) => Self {
                success: false,
                message: err.to_string(),
                records_synced: 0,
                finished_at: Utc::now(),
            },
        }
    }
}

/// Counters kept across sync calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Accepted calls that succeeded.
    pub completed: u64,
    /// Accepted calls that failed.
    pub failed: u64,
    /// Calls rejected because a sync was already running.
    pub rejected: u64,
    /// Time of the last successful sync.
    pub last_success: Option<DateTime<Utc>>,
}

impl SyncStats {
    /// Record a settled call.
    pub fn record(&mut self, outcome: &SyncOutcome, rejected: bool) {
        if rejected {
            self.rejected += 1;
        } else if outcome.success {
            self.completed += 1;
            self.last_success = Some(outcome.finished_at);
        } else {
            self.failed += 1;
        }
    }
}
