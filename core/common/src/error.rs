//! Common error types for the storefront sync core.

use thiserror::Error;

/// Top-level error type for storefront operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A single attempt of an operation failed.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// Every configured attempt failed; carries the final failure.
    #[error("Retry exhausted after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: Box<Error> },

    /// A sync was requested while another one is still running.
    #[error("sync already in progress")]
    AlreadyInProgress,

    /// Configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The hosted backend rejected or failed a request.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The innermost error, looking through `RetryExhausted`.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::RetryExhausted { last, .. } => last.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_in_progress_message() {
        assert!(Error::AlreadyInProgress.to_string().contains("already"));
    }

    #[test]
    fn test_retry_exhausted_mentions_last_error() {
        let err = Error::RetryExhausted {
            attempts: 2,
            last: Box::new(Error::OperationFailed("fail".to_string())),
        };
        let msg = err.to_string();
        assert!(msg.contains("2 attempts"));
        assert!(msg.contains("fail"));
        assert!(matches!(err.root_cause(), Error::OperationFailed(m) if m == "fail"));
    }

    #[test]
    fn test_json_error_conversion() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
