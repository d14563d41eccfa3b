//! OpenAI-compatible Chat Completions Provider
//!
//! Speaks `POST {api_base}/chat/completions` with Bearer auth. Serves every
//! gateway that mirrors the OpenAI envelope (Lovable, OpenAI, Together, Groq).

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ErrorClassifier, LlmError, LlmProvider, Provider, ProviderConfig, http_client};
use crate::ai::prompt::PromptPair;
use crate::types::Result;

/// Chat Completions provider with secure API key handling
pub struct ChatCompletionsProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatCompletionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl ChatCompletionsProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = http_client(config.timeout())?;
        Ok(Self { config, client })
    }

    fn build_request(&self, prompt: &PromptPair) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user.clone(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: (prompt.max_tokens > 0).then_some(prompt.max_tokens),
        }
    }
}

impl Provider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        &self.config.name
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn complete(&self, prompt: &PromptPair) -> std::result::Result<String, LlmError> {
        let name = self.name();
        let api_key = self.config.require_key()?;
        let url = format!("{}/chat/completions", self.config.api_base);

        debug!(provider = %name, model = %self.config.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e.without_url(), name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(status.as_u16(), &body, name));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e.without_url(), name))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LlmError::empty_response(name))
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        self.config.has_credential()
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmConfig, ProviderKind, ProviderSettings};
    use crate::types::ErrorCategory;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(base: &str, key: Option<&str>) -> ChatCompletionsProvider {
        let settings = ProviderSettings {
            name: "openai".into(),
            kind: ProviderKind::ChatCompletions,
            model: "gpt-4o-mini".into(),
            api_base: base.into(),
            api_key_env: Some("OPENAI_API_KEY".into()),
        };
        let key = key.map(String::from);
        let config =
            ProviderConfig::from_settings(&settings, &LlmConfig::default(), move |_| key.clone());
        ChatCompletionsProvider::new(config).unwrap()
    }

    fn prompt() -> PromptPair {
        PromptPair::new("You are a strategist", "Customer: bakers", 800)
    }

    #[tokio::test]
    async fn test_complete_extracts_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 800,
                "messages": [
                    {"role": "system", "content": "You are a strategist"},
                    {"role": "user", "content": "Customer: bakers"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"[LOFA #1]: x"}}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url(), Some("sk-test"))
            .complete(&prompt())
            .await
            .unwrap();

        assert_eq!(text, "[LOFA #1]: x");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_distinguished() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = provider(&server.url(), Some("sk-test"))
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(err.category, ErrorCategory::RateLimit);
        assert_eq!(err.status, Some(429));
        assert_eq!(err.log_entry(), "openai: HTTP 429 quota exceeded: slow down");
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create_async()
            .await;

        let err = provider(&server.url(), Some("sk-test"))
            .complete(&prompt())
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::EmptyResponse);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let provider = provider(&server.url(), None);
        assert!(!provider.is_configured());

        let err = provider.complete(&prompt()).await.unwrap_err();
        assert_eq!(err.category, ErrorCategory::CredentialMissing);
        mock.assert_async().await;
    }

    #[test]
    fn test_debug_hides_key() {
        let provider = provider("http://localhost", Some("sk-very-secret"));
        assert!(!format!("{:?}", provider).contains("sk-very-secret"));
    }
}
