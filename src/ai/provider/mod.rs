//! LLM Provider Abstraction
//!
//! Uniform contract over heterogeneous model APIs: every text provider turns
//! a `PromptPair` into completion text, every image provider turns an
//! `ImageRequest` into rendered images. Failures are reported as categorized
//! `LlmError`s and never swallowed; the fallback chain decides what to do.
//!
//! ## Modules
//!
//! - `chain`: Sequential fallback over an ordered provider list
//! - `chat_completions`: OpenAI-compatible `/chat/completions` endpoints
//! - `gemini`: Google Generative Language `:generateContent`
//! - `pollinations`: Keyless per-seed image rendering

mod chain;
mod chat_completions;
mod gemini;
mod pollinations;

pub use chain::{ChainOutcome, ChainState, ChainStats, ProviderChain, ProviderChainBuilder};
pub use chat_completions::ChatCompletionsProvider;
pub use gemini::GeminiProvider;
pub use pollinations::PollinationsProvider;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::ai::prompt::{ImageRequest, PromptPair};
use crate::config::{LlmConfig, ProviderKind, ProviderSettings};
use crate::types::{ProviderImage, Result};

/// Shared text provider type for concurrent access across requests.
pub type SharedProvider = Arc<dyn LlmProvider>;

/// Shared image provider type.
pub type SharedImageProvider = Arc<dyn ImageProvider>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Runtime configuration for one provider.
///
/// The API key is resolved from the environment once, when the config is
/// built, and held as a `SecretString`. It is redacted in debug output.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Name used in logs and error entries
    pub name: String,
    pub kind: ProviderKind,
    pub model: String,
    pub api_base: String,
    /// Resolved credential, if any
    pub api_key: Option<SecretString>,
    /// Where the credential was looked up
    pub api_key_env: Option<String>,
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_env", &self.api_key_env)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Build from file settings, resolving the credential through `lookup`.
    ///
    /// Empty values count as absent.
    pub fn from_settings<F>(settings: &ProviderSettings, llm: &LlmConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = settings
            .api_key_env
            .as_deref()
            .and_then(|var| lookup(var))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(SecretString::from);

        Self {
            name: settings.name.clone(),
            kind: settings.kind,
            model: settings.model.clone(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key,
            api_key_env: settings.api_key_env.clone(),
            temperature: llm.temperature,
            timeout_secs: llm.timeout_secs,
        }
    }

    /// Resolve credentials from the process environment
    pub fn from_env(settings: &ProviderSettings, llm: &LlmConfig) -> Self {
        Self::from_settings(settings, llm, |var| std::env::var(var).ok())
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The credential, or a `CredentialMissing` failure for this provider
    pub fn require_key(&self) -> std::result::Result<&SecretString, LlmError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| LlmError::credential_missing(&self.name, self.api_key_env.as_deref()))
    }
}

// =============================================================================
// Provider Traits
// =============================================================================

/// Anything that can sit in a fallback chain
pub trait Provider: Send + Sync {
    /// Provider name for logging and error entries
    fn name(&self) -> &str;
}

/// Text completion provider
#[async_trait]
pub trait LlmProvider: Provider {
    /// Send one prompt pair, return the raw completion text
    async fn complete(&self, prompt: &PromptPair) -> std::result::Result<String, LlmError>;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Whether a credential was found at startup
    fn is_configured(&self) -> bool;
}

/// Image rendering provider
#[async_trait]
pub trait ImageProvider: Provider {
    /// Render one image per requested seed
    async fn render(
        &self,
        request: &ImageRequest,
    ) -> std::result::Result<Vec<ProviderImage>, LlmError>;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.kind {
        ProviderKind::ChatCompletions => Ok(Arc::new(ChatCompletionsProvider::new(config.clone())?)),
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
    }
}

/// Build a `reqwest` client bounded by `timeout`
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| crate::types::BizError::Config(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn settings() -> ProviderSettings {
        ProviderSettings {
            name: "together".into(),
            kind: ProviderKind::ChatCompletions,
            model: "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo".into(),
            api_base: "https://api.together.xyz/v1/".into(),
            api_key_env: Some("TOGETHER_API_KEY".into()),
        }
    }

    #[test]
    fn test_from_settings_resolves_credential() {
        let config = ProviderConfig::from_settings(&settings(), &LlmConfig::default(), |var| {
            (var == "TOGETHER_API_KEY").then(|| "tg-secret".to_string())
        });
        assert!(config.has_credential());
        assert_eq!(config.require_key().unwrap().expose_secret(), "tg-secret");
        assert_eq!(config.api_base, "https://api.together.xyz/v1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let config =
            ProviderConfig::from_settings(&settings(), &LlmConfig::default(), |_| Some("  ".into()));
        assert!(!config.has_credential());

        let err = config.require_key().unwrap_err();
        assert_eq!(err.category, ErrorCategory::CredentialMissing);
        assert_eq!(err.log_entry(), "together: credential missing (set TOGETHER_API_KEY)");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config =
            ProviderConfig::from_settings(&settings(), &LlmConfig::default(), |_| Some("tg-secret".into()));
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tg-secret"));
    }

    #[test]
    fn test_create_provider_by_kind() {
        let chat = ProviderConfig::from_settings(&settings(), &LlmConfig::default(), |_| None);
        let provider = create_provider(&chat).unwrap();
        assert_eq!(provider.name(), "together");
        assert!(!provider.is_configured());

        let gemini = ProviderConfig {
            kind: ProviderKind::Gemini,
            name: "gemini".into(),
            ..chat
        };
        assert_eq!(create_provider(&gemini).unwrap().name(), "gemini");
    }
}
