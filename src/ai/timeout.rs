//! Unified Timeout Configuration
//!
//! Operation-specific timeout budgets and helpers for wrapping async
//! provider calls. A provider that exceeds its budget is reported as a
//! `Timeout` failure so the fallback chain can move on.

use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::constants::{image, network};
use crate::types::{BizError, LlmError, Result};

/// Timeout budgets for one generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Budget for one text provider call
    pub llm_request: Duration,
    /// Budget for one image request (a single seed)
    pub image_request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_request: Duration::from_secs(network::DEFAULT_TIMEOUT_SECS),
            image_request: Duration::from_secs(network::IMAGE_TIMEOUT_SECS),
        }
    }
}

impl TimeoutConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            llm_request: Duration::from_secs(config.llm.timeout_secs),
            image_request: Duration::from_secs(config.image.timeout_secs),
        }
    }

    /// Budget for a whole image provider call, covering every variant
    pub fn image_batch(&self) -> Duration {
        self.image_request * image::MAX_VARIANTS
    }
}

/// Execute an async operation with a timeout
///
/// Returns `BizError::Timeout` if the operation doesn't complete in time.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(BizError::timeout(operation_name, timeout)),
    }
}

/// Execute one provider attempt with a timeout
///
/// Elapsed budgets become an `LlmError` with `Timeout` category.
pub async fn with_provider_timeout<T, F>(
    timeout: Duration,
    future: F,
    provider: &str,
) -> std::result::Result<T, LlmError>
where
    F: Future<Output = std::result::Result<T, LlmError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::timeout(provider, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;

    #[test]
    fn test_timeout_config_defaults() {
        let config = TimeoutConfig::default();
        assert_eq!(config.llm_request.as_secs(), 30);
        assert_eq!(config.image_request.as_secs(), 60);
        assert_eq!(config.image_batch().as_secs(), 360);
    }

    #[test]
    fn test_timeout_config_from_config() {
        let mut config = Config::default();
        config.llm.timeout_secs = 5;
        let timeouts = TimeoutConfig::from_config(&config);
        assert_eq!(timeouts.llm_request, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, BizError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, BizError>(42)
            },
            "slow operation",
        )
        .await;
        assert!(matches!(result.unwrap_err(), BizError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_provider_timeout_is_categorized() {
        let result = with_provider_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, LlmError>("late")
            },
            "groq",
        )
        .await;
        let err = result.unwrap_err();
        assert_eq!(err.category, ErrorCategory::Timeout);
        assert!(err.log_entry().starts_with("groq: timed out"));
    }
}
