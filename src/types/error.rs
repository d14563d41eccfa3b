//! Unified Error Type System
//!
//! Centralized error types for the generation service.
//!
//! ## Error Categories
//!
//! - **CredentialMissing**: Provider has no API key configured (skip to next)
//! - **RateLimit**: HTTP 429, provider quota exhausted (skip to next)
//! - **Http**: Any other non-2xx response (skip to next)
//! - **EmptyResponse**: 2xx without extractable completion text (skip to next)
//! - **Network**: Transport failure before a response arrived (skip to next)
//! - **Timeout**: Provider exceeded the per-call budget (skip to next)
//! - **ParseError**: Completion text violated the intent's output contract (skip to next)
//!
//! Every category is a per-provider failure: the chain records it and moves on.
//! Only `BizError::UpstreamInputMissing` is surfaced to the caller directly.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Per-provider failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No credential configured for this provider
    CredentialMissing,
    /// HTTP 429 - quota or rate limit exhausted
    RateLimit,
    /// Non-2xx HTTP status other than 429
    Http,
    /// Successful call without extractable completion text
    EmptyResponse,
    /// Connection/transport failure
    Network,
    /// Per-provider timeout elapsed
    Timeout,
    /// Completion text failed structural validation
    ParseError,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CredentialMissing => write!(f, "CREDENTIAL_MISSING"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Http => write!(f, "HTTP"),
            Self::EmptyResponse => write!(f, "EMPTY_RESPONSE"),
            Self::Network => write!(f, "NETWORK"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Structured provider failure with category and provider context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmError {
    /// Error category for reporting
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// HTTP status, when the provider answered with one
    pub status: Option<u16>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
            status: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self::new(category, message).provider(provider)
    }

    /// Add provider context to existing error
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn credential_missing(provider: &str, env_var: Option<&str>) -> Self {
        let message = match env_var {
            Some(var) => format!("credential missing (set {})", var),
            None => "credential missing".to_string(),
        };
        Self::with_provider(ErrorCategory::CredentialMissing, message, provider)
    }

    pub fn empty_response(provider: &str) -> Self {
        Self::with_provider(ErrorCategory::EmptyResponse, "empty response", provider)
    }

    pub fn timeout(provider: &str, duration: Duration) -> Self {
        Self::with_provider(
            ErrorCategory::Timeout,
            format!("timed out after {}s", duration.as_secs_f32()),
            provider,
        )
    }

    /// Quota exhaustion is reported distinctly from generic failures
    pub fn is_quota_exceeded(&self) -> bool {
        self.category == ErrorCategory::RateLimit
    }

    /// Render as an error-log line: `"<provider>: <message>"`
    pub fn log_entry(&self) -> String {
        format!(
            "{}: {}",
            self.provider.as_deref().unwrap_or("unknown"),
            self.message
        )
    }
}

impl From<ValidationError> for LlmError {
    fn from(err: ValidationError) -> Self {
        LlmError::new(ErrorCategory::ParseError, err.to_string())
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maximum characters of a provider error body kept in messages
const BODY_EXCERPT_CHARS: usize = 200;

/// Maps raw provider failures onto categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly
    pub fn classify_http_status(status: u16, body: &str, provider: &str) -> LlmError {
        let excerpt: String = body.trim().chars().take(BODY_EXCERPT_CHARS).collect();
        let detail = if excerpt.is_empty() {
            String::new()
        } else {
            format!(": {}", excerpt)
        };

        match status {
            429 => LlmError::with_provider(
                ErrorCategory::RateLimit,
                format!("HTTP 429 quota exceeded{}", detail),
                provider,
            )
            .status(status),
            _ => LlmError::with_provider(
                ErrorCategory::Http,
                format!("HTTP {}{}", status, detail),
                provider,
            )
            .status(status),
        }
    }

    /// Classify a transport-level reqwest failure
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        if err.is_timeout() {
            LlmError::with_provider(
                ErrorCategory::Timeout,
                format!("request timed out: {}", err),
                provider,
            )
        } else if err.is_decode() {
            LlmError::with_provider(
                ErrorCategory::EmptyResponse,
                format!("unreadable response body: {}", err),
                provider,
            )
        } else {
            LlmError::with_provider(
                ErrorCategory::Network,
                format!("request failed: {}", err),
                provider,
            )
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "invalid response at '{}': {}", field, self.message)
        } else {
            write!(f, "invalid response: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Structure does not match the expected schema
    Schema,
    /// Required field missing
    MissingField,
    /// Not parseable at all (bad JSON, blank text)
    Format,
    /// Value out of range
    Range,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum BizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Caller asked for a step whose prerequisite data is absent
    #[error("{0}")]
    UpstreamInputMissing(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, BizError>;

impl BizError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Whether the caller can fix this by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UpstreamInputMissing(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(
            ErrorCategory::CredentialMissing.to_string(),
            "CREDENTIAL_MISSING"
        );
        assert_eq!(ErrorCategory::ParseError.to_string(), "PARSE_ERROR");
    }

    #[test]
    fn test_classify_http_status_429_is_quota() {
        let err = ErrorClassifier::classify_http_status(429, "Too many requests", "gemini");
        assert_eq!(err.category, ErrorCategory::RateLimit);
        assert!(err.is_quota_exceeded());
        assert_eq!(err.status, Some(429));
        assert!(err.message.contains("429"));
        assert!(err.message.contains("quota exceeded"));
    }

    #[test]
    fn test_classify_http_status_generic() {
        let err = ErrorClassifier::classify_http_status(503, "", "openai");
        assert_eq!(err.category, ErrorCategory::Http);
        assert!(!err.is_quota_exceeded());
        assert_eq!(err.message, "HTTP 503");
    }

    #[test]
    fn test_classify_http_status_truncates_body() {
        let body = "x".repeat(1000);
        let err = ErrorClassifier::classify_http_status(500, &body, "groq");
        assert!(err.message.len() < 250);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_log_entry_format() {
        let err = LlmError::credential_missing("together", Some("TOGETHER_API_KEY"));
        assert_eq!(
            err.log_entry(),
            "together: credential missing (set TOGETHER_API_KEY)"
        );
    }

    #[test]
    fn test_validation_error_converts_to_parse_category() {
        let err: LlmError =
            ValidationError::new(ValidationErrorKind::MissingField, "field required")
                .with_field("questions[3].signal_to_listen_for")
                .into();
        assert_eq!(err.category, ErrorCategory::ParseError);
        assert!(err.message.contains("signal_to_listen_for"));
    }

    #[test]
    fn test_only_upstream_missing_is_client_error() {
        assert!(BizError::UpstreamInputMissing("x".into()).is_client_error());
        assert!(!BizError::Config("x".into()).is_client_error());
    }
}
