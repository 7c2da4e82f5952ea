//! Sync configuration and loading.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use storefront_common::Result;

use crate::retry::RetryConfig;

/// Configuration for the data sync.
///
/// Stored as JSON alongside the application's other settings:
///
/// ```json
/// { "retry": { "max_attempts": 3, "delay_ms": 1000 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Retry behavior for backend calls.
    pub retry: RetryConfig,
}

impl SyncConfig {
    /// Check that the configuration can drive a sync.
    pub fn validate(&self) -> Result<()> {
        self.retry.validate()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    /// - File cannot be read
    /// - Content is not valid JSON or fails validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading sync config from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }
}
