//! Google Gemini Provider
//!
//! Calls `POST {api_base}/models/{model}:generateContent?key=...`. Gemini has
//! no system role here, so the pair is sent as one user turn.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ErrorClassifier, LlmError, LlmProvider, Provider, ProviderConfig, http_client};
use crate::ai::prompt::PromptPair;
use crate::types::Result;

pub struct GeminiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = http_client(config.timeout())?;
        Ok(Self { config, client })
    }

    fn build_request(&self, prompt: &PromptPair) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.combined(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: (prompt.max_tokens > 0).then_some(prompt.max_tokens),
            },
        }
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.config.name
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, prompt: &PromptPair) -> std::result::Result<String, LlmError> {
        let name = self.name();
        let api_key = self.config.require_key()?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );

        debug!(provider = %name, model = %self.config.model, "Sending generateContent request");

        // without_url keeps the key-bearing query string out of error messages
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.expose_secret())])
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e.without_url(), name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(status.as_u16(), &body, name));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e.without_url(), name))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
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
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmConfig, ProviderKind, ProviderSettings};
    use crate::types::ErrorCategory;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(base: &str) -> GeminiProvider {
        let settings = ProviderSettings {
            name: "gemini".into(),
            kind: ProviderKind::Gemini,
            model: "gemini-1.5-flash-latest".into(),
            api_base: base.into(),
            api_key_env: Some("GEMINI_API_KEY".into()),
        };
        let config = ProviderConfig::from_settings(&settings, &LlmConfig::default(), |_| {
            Some("gm-test".to_string())
        });
        GeminiProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_complete_sends_combined_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "gm-test".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "sys\n\nusr"}]}],
                "generationConfig": {"maxOutputTokens": 2000}
            })))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"```json\n{}\n```"}]}}]}"#,
            )
            .create_async()
            .await;

        let text = provider(&server.url())
            .complete(&PromptPair::new("sys", "usr", 2000))
            .await
            .unwrap();

        assert_eq!(text, "```json\n{}\n```");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(&PromptPair::new("s", "u", 10))
            .await
            .unwrap_err();

        assert_eq!(err.category, ErrorCategory::Http);
        assert_eq!(err.log_entry(), "gemini: HTTP 503");
    }

    #[tokio::test]
    async fn test_blocked_candidate_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(&PromptPair::new("s", "u", 10))
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::EmptyResponse);
    }

    #[tokio::test]
    async fn test_unreachable_host_hides_key() {
        let err = provider("http://127.0.0.1:1")
            .complete(&PromptPair::new("s", "u", 10))
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::Network);
        assert!(!err.message.contains("gm-test"));
    }
}
