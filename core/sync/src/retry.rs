//! Fixed-delay retry for fallible async operations.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use storefront_common::{Error, Result};

/// Configuration for retry behavior.
///
/// The delay is constant between attempts: no backoff growth, no jitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Pause between two consecutive attempts.
    #[serde(rename = "delay_ms", with = "duration_ms")]
    pub delay: Duration,
}

impl RetryConfig {
    /// Create a new retry configuration with the default delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Set the number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reject configurations that cannot run an operation at all.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(delay.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Runs operations with bounded, fixed-delay retries.
#[derive(Debug, Clone, Default)]
pub struct RetryRunner {
    config: RetryConfig,
}

impl RetryRunner {
    /// Create a new retry runner.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute an operation, retrying every failure until it succeeds or
    /// `max_attempts` attempts have been made.
    ///
    /// # Errors
    /// - `InvalidConfig` if `max_attempts` is zero; the operation is not invoked
    /// - `RetryExhausted` wrapping the error of the final attempt
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.config.validate()?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Operation succeeded on attempt {}", attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if attempt >= self.config.max_attempts {
                        warn!("Operation failed after {} attempts: {}", attempt, err);
                        return Err(Error::RetryExhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }

                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}...",
                        attempt, self.config.max_attempts, err, self.config.delay
                    );
                    if !self.config.delay.is_zero() {
                        sleep(self.config.delay).await;
                    }
                }
            }
        }
    }

    /// Get the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

/// Retry `operation` up to `max_attempts` times, pausing `delay_ms`
/// milliseconds between attempts.
pub async fn with_retry<F, Fut, T>(operation: F, max_attempts: u32, delay_ms: u64) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let config = RetryConfig::new(max_attempts).with_delay(Duration::from_millis(delay_ms));
    RetryRunner::new(config).run(operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    fn failing_until(
        count: Arc<AtomicU32>,
        succeed_on: u32,
    ) -> impl FnMut() -> std::future::Ready<Result<String>> {
        move || {
            let current = count.fetch_add(1, Ordering::SeqCst) + 1;
            if current < succeed_on {
                std::future::ready(Err(Error::OperationFailed(format!("attempt {}", current))))
            } else {
                std::future::ready(Ok("ok".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = with_retry(failing_until(calls.clone(), 3), 3, 10).await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let count = calls.clone();

        let result: Result<()> = with_retry(
            move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Err(Error::OperationFailed("fail".to_string()))
                }
            },
            2,
            10,
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, Error::RetryExhausted { attempts: 2, .. }));
        assert!(err.to_string().contains("fail"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_call_after_success() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = with_retry(failing_until(calls.clone(), 1), 5, 10).await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_is_config_error() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = with_retry(failing_until(calls.clone(), 1), 0, 10).await;

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_has_no_delay() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = with_retry(failing_until(calls.clone(), 2), 1, 5_000).await;

        assert!(matches!(result, Err(Error::RetryExhausted { attempts: 1, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_constant_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = with_retry(failing_until(calls.clone(), 4), 4, 100).await;

        assert!(result.is_ok());
        // Three pauses of 100ms; exponential growth would give 700ms.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_adds_no_time() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = with_retry(failing_until(calls.clone(), 3), 3, 0).await;

        assert!(result.is_ok());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_config_serialization() {
        let config = RetryConfig::new(5).with_delay(Duration::from_millis(250));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({ "max_attempts": 5, "delay_ms": 250 }));

        let partial: RetryConfig = serde_json::from_str(r#"{ "delay_ms": 10 }"#).unwrap();
        assert_eq!(partial.max_attempts, 3);
        assert_eq!(partial.delay, Duration::from_millis(10));
    }

    proptest! {
        #[test]
        fn prop_always_failing_runs_exactly_n_times(n in 1u32..8) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let calls = Arc::new(AtomicU32::new(0));

            let err = rt
                .block_on(with_retry(failing_until(calls.clone(), u32::MAX), n, 0))
                .unwrap_err();

            prop_assert_eq!(calls.load(Ordering::SeqCst), n);
            let expected = format!("attempt {}", n);
            prop_assert!(matches!(err.root_cause(), Error::OperationFailed(m) if *m == expected));
        }

        #[test]
        fn prop_success_on_k_runs_exactly_k_times(n in 1u32..8, k_seed in 0u32..8) {
            let k = k_seed % n + 1;
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let calls = Arc::new(AtomicU32::new(0));

            let result = rt.block_on(with_retry(failing_until(calls.clone(), k), n, 0));

            prop_assert!(result.is_ok());
            prop_assert_eq!(calls.load(Ordering::SeqCst), k);
        }
    }
}
