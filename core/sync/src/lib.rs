//! Storefront Sync Core
//!
//! This module provides the concurrency utilities behind data synchronization:
//! - Fixed-delay retry of fallible async operations
//! - Single-flight guard rejecting overlapping sync requests
//! - A data sync facade driving a pluggable backend
//! - JSON configuration

pub mod backend;
pub mod config;
pub mod engine;
pub mod memory;
pub mod retry;
pub mod single_flight;
pub mod state;

// Re-export main types
pub use backend::{SyncBackend, SyncReport};
pub use config::SyncConfig;
pub use engine::DataSync;
pub use memory::MemoryBackend;
pub use retry::{with_retry, RetryConfig, RetryRunner};
pub use single_flight::SingleFlightSync;
pub use state::{SyncOutcome, SyncStats};
