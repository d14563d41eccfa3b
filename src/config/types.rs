//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Credentials are never stored here: each provider names the environment
//! variable holding its key, and the key is resolved when adapters are built.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{image as image_constants, llm as llm_constants, network};
use crate::types::{BizError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// HTTP server settings
    pub server: ServerConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Image provider settings
    pub image: ImageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `BizError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(BizError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(BizError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.image.timeout_secs == 0 {
            return Err(BizError::Config(
                "Image timeout_secs must be greater than 0".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for provider in &self.llm.providers {
            if provider.name.trim().is_empty() {
                return Err(BizError::Config("Provider name cannot be empty".to_string()));
            }
            if !names.insert(provider.name.as_str()) {
                return Err(BizError::Config(format!(
                    "Duplicate provider name: {}",
                    provider.name
                )));
            }
        }

        for (route, order) in [
            ("leap_of_faith_order", &self.llm.leap_of_faith_order),
            ("mom_test_order", &self.llm.mom_test_order),
        ] {
            if let Some(unknown) = order.iter().find(|name| !names.contains(name.as_str())) {
                return Err(BizError::Config(format!(
                    "llm.{} references unknown provider '{}'",
                    route, unknown
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: network::DEFAULT_BIND.to_string(),
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Wire protocol a provider speaks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// OpenAI-compatible `/chat/completions`
    ChatCompletions,
    /// Google Generative Language `:generateContent`
    Gemini,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::ChatCompletions => write!(f, "chat-completions"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// A single provider definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSettings {
    /// Name used in logs, error lists and route orders
    pub name: String,
    pub kind: ProviderKind,
    pub model: String,
    pub api_base: String,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ProviderSettings {
    fn new(name: &str, kind: ProviderKind, model: &str, api_base: &str, env: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            model: model.to_string(),
            api_base: api_base.to_string(),
            api_key_env: Some(env.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Per-provider request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature passed to every provider
    pub temperature: f32,

    /// Known providers
    pub providers: Vec<ProviderSettings>,

    /// Provider priority for `generate-leap-of-faith`
    pub leap_of_faith_order: Vec<String>,

    /// Provider priority for `generate-mom-test`
    pub mom_test_order: Vec<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let providers = vec![
            ProviderSettings::new(
                "gemini",
                ProviderKind::Gemini,
                "gemini-1.5-flash-latest",
                "https://generativelanguage.googleapis.com/v1beta",
                "GEMINI_API_KEY",
            ),
            ProviderSettings::new(
                "lovable",
                ProviderKind::ChatCompletions,
                "google/gemini-2.5-flash",
                "https://ai.gateway.lovable.dev/v1",
                "LOVABLE_API_KEY",
            ),
            ProviderSettings::new(
                "openai",
                ProviderKind::ChatCompletions,
                "gpt-4o-mini",
                "https://api.openai.com/v1",
                "OPENAI_API_KEY",
            ),
            ProviderSettings::new(
                "together",
                ProviderKind::ChatCompletions,
                "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo",
                "https://api.together.xyz/v1",
                "TOGETHER_API_KEY",
            ),
            ProviderSettings::new(
                "groq",
                ProviderKind::ChatCompletions,
                "llama-3.1-70b-versatile",
                "https://api.groq.com/openai/v1",
                "GROQ_API_KEY",
            ),
        ];
        let order: Vec<String> = providers.iter().map(|p| p.name.clone()).collect();

        Self {
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: llm_constants::DEFAULT_TEMPERATURE,
            providers,
            leap_of_faith_order: order.clone(),
            mom_test_order: order,
        }
    }
}

impl LlmConfig {
    /// Look up a provider definition by name
    pub fn provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.iter().find(|p| p.name == name)
    }
}

// =============================================================================
// Image Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Pollinations-compatible base URL
    pub api_base: String,

    /// Per-seed request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_base: image_constants::POLLINATIONS_BASE.to_string(),
            timeout_secs: network::IMAGE_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
