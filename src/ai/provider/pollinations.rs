//! Pollinations Image Provider
//!
//! Keyless GET per seed to `{api_base}/prompt/{prompt}?width&height&seed&nologo=true`.
//! Each body is returned as a base64 `data:` URL. A failed seed is logged and
//! skipped; the call only fails when no seed rendered.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{ErrorCategory, ErrorClassifier, ImageProvider, LlmError, Provider, http_client};
use crate::ai::prompt::ImageRequest;
use crate::types::{BizError, ProviderImage, Result};

const PROVIDER_NAME: &str = "pollinations";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug)]
pub struct PollinationsProvider {
    base: Url,
    client: reqwest::Client,
}

impl PollinationsProvider {
    /// `timeout` bounds each per-seed request
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(api_base)
            .map_err(|e| BizError::Config(format!("Invalid image api_base '{}': {}", api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(BizError::Config(format!(
                "Invalid image api_base '{}': not a base URL",
                api_base
            )));
        }
        Ok(Self {
            base,
            client: http_client(timeout)?,
        })
    }

    fn seed_url(&self, request: &ImageRequest, seed: u32) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("prompt")
                .push(request.positive());
        }
        url.query_pairs_mut()
            .append_pair("width", &request.width.to_string())
            .append_pair("height", &request.height.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("nologo", "true");
        url
    }

    async fn render_seed(&self, request: &ImageRequest, seed: u32) -> std::result::Result<ProviderImage, LlmError> {
        let response = self
            .client
            .get(self.seed_url(request, seed))
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e.without_url(), PROVIDER_NAME))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &body,
                PROVIDER_NAME,
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e.without_url(), PROVIDER_NAME))?;
        if bytes.is_empty() {
            return Err(LlmError::empty_response(PROVIDER_NAME));
        }

        Ok(ProviderImage {
            data_url: format!("data:{};base64,{}", content_type, BASE64.encode(&bytes)),
            seed,
        })
    }
}

impl Provider for PollinationsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    async fn render(
        &self,
        request: &ImageRequest,
    ) -> std::result::Result<Vec<ProviderImage>, LlmError> {
        let mut images = Vec::with_capacity(request.seeds.len());
        let mut last_error: Option<LlmError> = None;

        for &seed in &request.seeds {
            match self.render_seed(request, seed).await {
                Ok(image) => {
                    debug!(seed, "Rendered image variant");
                    images.push(image);
                }
                Err(err) => {
                    warn!(seed, category = %err.category, error = %err.message, "Image variant failed");
                    last_error = Some(err);
                }
            }
        }

        if images.is_empty() {
            let detail = last_error
                .map(|e| format!(" (last error: {})", e.message))
                .unwrap_or_default();
            return Err(LlmError::with_provider(
                ErrorCategory::EmptyResponse,
                format!("no image variants rendered{}", detail),
                PROVIDER_NAME,
            ));
        }

        Ok(images)
    }
}
