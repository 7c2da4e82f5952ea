//! Common utilities and types shared across the storefront crates.
//!
//! This module provides the error type and the identifier types used by
//! the sync core and the CLI.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::TableName;
