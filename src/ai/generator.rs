//! Generation Service
//!
//! Wires prompt building, the fallback chains, response parsing and the
//! offline backup together, one entry point per intent. A request either
//! returns a validated live output or the offline backup annotated with the
//! chain's error log; only missing upstream input is reported as an error.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::ai::offline;
use crate::ai::prompt::{image, leap_of_faith, mom_test};
use crate::ai::provider::{
    ChainOutcome, ImageProvider, LlmError, LlmProvider, PollinationsProvider, ProviderChain,
    ProviderConfig, SharedImageProvider, SharedProvider, create_provider,
};
use crate::ai::timeout::TimeoutConfig;
use crate::ai::validation::{parse_list, parse_mom_test};
use crate::config::Config;
use crate::constants::offline::WARNING;
use crate::types::{
    Assumptions, Generated, ImageInputs, ImageSet, LeapOfFaithInputs, MomTestInputs,
    MomTestSheet, Result,
};

/// Credential status of one text provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub model: String,
    pub configured: bool,
}

/// Shared, read-only generation service
pub struct Generator {
    leap_chain: ProviderChain<dyn LlmProvider>,
    mom_chain: ProviderChain<dyn LlmProvider>,
    image_chain: ProviderChain<dyn ImageProvider>,
}

impl Generator {
    /// Build every provider once and arrange them in the configured orders.
    ///
    /// Missing credentials are not an error here; those providers fail fast
    /// at call time and the chain moves on.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeouts = TimeoutConfig::from_config(config);

        let mut providers: Vec<SharedProvider> = Vec::with_capacity(config.llm.providers.len());
        for settings in &config.llm.providers {
            providers.push(create_provider(&ProviderConfig::from_env(
                settings,
                &config.llm,
            ))?);
        }

        let chain = |order: &[String]| {
            order
                .iter()
                .filter_map(|name| {
                    let found = providers.iter().find(|p| p.name() == name);
                    if found.is_none() {
                        warn!(provider = %name, "Ordered provider is not defined, skipping");
                    }
                    found.map(Arc::clone)
                })
                .fold(ProviderChain::builder(), |b, p| b.add_shared(p))
                .with_timeout(timeouts.llm_request)
                .build()
        };

        let pollinations: SharedImageProvider = Arc::new(PollinationsProvider::new(
            &config.image.api_base,
            timeouts.image_request,
        )?);
        let image_chain = ProviderChain::builder()
            .add_shared(pollinations)
            .with_timeout(timeouts.image_batch())
            .build();

        let generator = Self::from_parts(
            chain(&config.llm.leap_of_faith_order),
            chain(&config.llm.mom_test_order),
            image_chain,
        );
        generator.log_boot();
        Ok(generator)
    }

    pub fn from_parts(
        leap_chain: ProviderChain<dyn LlmProvider>,
        mom_chain: ProviderChain<dyn LlmProvider>,
        image_chain: ProviderChain<dyn ImageProvider>,
    ) -> Self {
        Self {
            leap_chain,
            mom_chain,
            image_chain,
        }
    }

    fn log_boot(&self) {
        let (configured, missing): (Vec<_>, Vec<_>) = self
            .provider_status()
            .into_iter()
            .partition(|s| s.configured);
        let names = |list: Vec<ProviderStatus>| {
            list.into_iter().map(|s| s.name).collect::<Vec<_>>().join(", ")
        };

        info!(
            configured = %names(configured),
            missing = %names(missing),
            leap_of_faith_order = ?self.leap_chain.names(),
            mom_test_order = ?self.mom_chain.names(),
            "Generation providers initialized"
        );
    }

    /// Text providers across both chains, first occurrence order
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        let mut seen = HashSet::new();
        self.leap_chain
            .providers()
            .iter()
            .chain(self.mom_chain.providers())
            .filter(|p| seen.insert(p.name().to_string()))
            .map(|p| ProviderStatus {
                name: p.name().to_string(),
                model: p.model().to_string(),
                configured: p.is_configured(),
            })
            .collect()
    }

    /// Assumptions or hypotheses, depending on the circle
    #[instrument(skip(self, inputs), fields(intent = %inputs.intent()))]
    pub async fn leap_of_faith(&self, inputs: &LeapOfFaithInputs) -> Result<Generated<Assumptions>> {
        let prompt = leap_of_faith::build(inputs)?;

        let outcome = self
            .leap_chain
            .execute(|provider| {
                let prompt = &prompt;
                async move {
                    let text = provider.complete(prompt).await?;
                    Ok::<_, LlmError>(parse_list(&text)?)
                }
            })
            .await;

        Ok(match outcome {
            ChainOutcome::Succeeded { value, .. } => Generated::live(Assumptions {
                assumptions: value,
            }),
            ChainOutcome::Exhausted { stats } => {
                Generated::offline(offline::leap_of_faith(inputs), WARNING, stats.error_log())
            }
        })
    }

    /// Ten Mom-Test interview questions
    #[instrument(skip(self, inputs))]
    pub async fn mom_test(&self, inputs: &MomTestInputs) -> Generated<MomTestSheet> {
        let prompt = mom_test::build(inputs);

        let outcome = self
            .mom_chain
            .execute(|provider| {
                let prompt = &prompt;
                async move {
                    let text = provider.complete(prompt).await?;
                    Ok::<_, LlmError>(parse_mom_test(&text, inputs)?)
                }
            })
            .await;

        match outcome {
            ChainOutcome::Succeeded { value, .. } => Generated::live(value),
            ChainOutcome::Exhausted { stats } => {
                Generated::offline(offline::mom_test(inputs), WARNING, stats.error_log())
            }
        }
    }

    /// Concept image variants plus the settings they were rendered with
    #[instrument(skip(self, inputs))]
    pub async fn business_image(&self, inputs: &ImageInputs) -> Generated<ImageSet> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let request = image::build(inputs, image::seed_basis(inputs.user_id.as_deref(), millis));
        let used = request.settings();

        let outcome = self
            .image_chain
            .execute(|provider| {
                let request = &request;
                async move { provider.render(request).await }
            })
            .await;

        match outcome {
            ChainOutcome::Succeeded { value, .. } => Generated::live(ImageSet {
                images: value,
                used,
            }),
            ChainOutcome::Exhausted { stats } => Generated::offline(
                ImageSet {
                    images: offline::images(&request),
                    used,
                },
                WARNING,
                stats.error_log(),
            ),
        }
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("leap_of_faith", &self.leap_chain.names())
            .field("mom_test", &self.mom_chain.names())
            .field("image", &self.image_chain.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompt::{ImageRequest, PromptPair};
    use crate::ai::provider::{ErrorCategory, ErrorClassifier, Provider};
    use crate::types::{BizError, CircleType, ProviderImage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Reply(String),
        Status(u16),
    }

    struct MockText {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl MockText {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Provider for MockText {
        fn name(&self) -> &str {
            self.name
        }
    }

    #[async_trait]
    impl LlmProvider for MockText {
        async fn complete(&self, _prompt: &PromptPair) -> std::result::Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Reply(text) => Ok(text.clone()),
                Behavior::Status(status) => {
                    Err(ErrorClassifier::classify_http_status(*status, "", self.name))
                }
            }
        }

        fn model(&self) -> &str {
            "mock"
        }

        fn is_configured(&self) -> bool {
            !matches!(self.behavior, Behavior::Status(401))
        }
    }

    struct MockImage {
        fail: bool,
    }

    impl Provider for MockImage {
        fn name(&self) -> &str {
            "pollinations"
        }
    }

    #[async_trait]
    impl ImageProvider for MockImage {
        async fn render(
            &self,
            request: &ImageRequest,
        ) -> std::result::Result<Vec<ProviderImage>, LlmError> {
            if self.fail {
                return Err(LlmError::with_provider(
                    ErrorCategory::EmptyResponse,
                    "no image variants rendered",
                    "pollinations",
                ));
            }
            Ok(request
                .seeds
                .iter()
                .map(|&seed| ProviderImage {
                    data_url: "data:image/jpeg;base64,AAAA".into(),
                    seed,
                })
                .collect())
        }
    }

    fn text_chain(providers: &[Arc<MockText>]) -> ProviderChain<dyn LlmProvider> {
        providers
            .iter()
            .fold(ProviderChain::builder(), |b, p| {
                b.add_shared(Arc::clone(p) as Arc<dyn LlmProvider>)
            })
            .build()
    }

    fn image_chain(fail: bool) -> ProviderChain<dyn ImageProvider> {
        ProviderChain::builder()
            .add_shared(Arc::new(MockImage { fail }) as Arc<dyn ImageProvider>)
            .build()
    }

    fn generator(text: &[Arc<MockText>]) -> Generator {
        Generator::from_parts(text_chain(text), text_chain(text), image_chain(false))
    }

    fn designer_inputs() -> LeapOfFaithInputs {
        LeapOfFaithInputs {
            customer: "freelance designers".into(),
            problem: "late invoices".into(),
            solution: "auto-reminder tool".into(),
            ..Default::default()
        }
    }

    fn five_failing() -> Vec<Arc<MockText>> {
        vec![
            MockText::new("gemini", Behavior::Status(429)),
            MockText::new("lovable", Behavior::Status(500)),
            MockText::new("openai", Behavior::Status(401)),
            MockText::new("together", Behavior::Status(503)),
            MockText::new("groq", Behavior::Reply("   ".into())),
        ]
    }

    fn valid_sheet_json(inputs: &MomTestInputs) -> String {
        serde_json::to_string(&offline::mom_test(inputs)).unwrap()
    }

    #[tokio::test]
    async fn test_all_providers_failing_returns_offline_backup() {
        let providers = five_failing();
        let inputs = designer_inputs();
        let result = generator(&providers).leap_of_faith(&inputs).await.unwrap();

        assert!(result.is_offline());
        assert_eq!(result.warning.as_deref(), Some(WARNING));
        assert_eq!(result.output, offline::leap_of_faith(&inputs));

        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 5);
        assert!(errors[0].starts_with("gemini: HTTP 429"));
        assert!(errors[4].starts_with("groq: "));
    }

    #[tokio::test]
    async fn test_freelance_designer_scenario() {
        let result = generator(&five_failing())
            .leap_of_faith(&designer_inputs())
            .await
            .unwrap();

        assert_eq!(result.output.assumptions.len(), 3);
        assert!(result.output.assumptions.iter().all(|a| !a.trim().is_empty()));
        assert!(result.warning.is_some());
    }

    #[tokio::test]
    async fn test_later_providers_not_called_after_success() {
        let providers = vec![
            MockText::new("gemini", Behavior::Status(429)),
            MockText::new(
                "lovable",
                Behavior::Reply("```\n[LOFA #1]: a\n\n[LOFA #2]: b\n[LOFA #3]: c\n```".into()),
            ),
            MockText::new("openai", Behavior::Reply("unused".into())),
        ];
        let result = generator(&providers)
            .leap_of_faith(&designer_inputs())
            .await
            .unwrap();

        assert!(!result.is_offline());
        assert_eq!(
            result.output.assumptions,
            vec!["[LOFA #1]: a", "[LOFA #2]: b", "[LOFA #3]: c"]
        );
        assert_eq!(providers[0].calls(), 1);
        assert_eq!(providers[1].calls(), 1);
        assert_eq!(providers[2].calls(), 0);
    }

    #[tokio::test]
    async fn test_hypotheses_without_lofas_rejected_before_any_call() {
        let providers = vec![MockText::new("gemini", Behavior::Reply("x".into()))];
        let inputs = LeapOfFaithInputs {
            circle_type: CircleType::Hypothesis,
            leap_of_faith_results: vec!["  ".into()],
            ..designer_inputs()
        };
        let err = generator(&providers).leap_of_faith(&inputs).await.unwrap_err();

        assert!(matches!(err, BizError::UpstreamInputMissing(_)));
        assert!(err.is_client_error());
        assert_eq!(providers[0].calls(), 0);
    }

    #[tokio::test]
    async fn test_mom_test_missing_signal_moves_to_next_provider() {
        let inputs = MomTestInputs {
            audience: "night-shift nurses".into(),
            assumption_category: "Demand".into(),
            ..Default::default()
        };
        let mut broken: serde_json::Value = serde_json::from_str(&valid_sheet_json(&inputs)).unwrap();
        broken["questions"][3]
            .as_object_mut()
            .unwrap()
            .remove("signal_to_listen_for");

        let providers = vec![
            MockText::new("gemini", Behavior::Reply(broken.to_string())),
            MockText::new(
                "lovable",
                Behavior::Reply(format!("```json\n{}\n```", valid_sheet_json(&inputs))),
            ),
        ];
        let result = generator(&providers).mom_test(&inputs).await;

        assert!(!result.is_offline());
        assert_eq!(result.output.questions.len(), 10);
        assert_eq!(result.output.audience, "night-shift nurses");
        assert_eq!(providers[1].calls(), 1);
    }

    #[tokio::test]
    async fn test_mom_test_offline_sheet_is_valid() {
        let result = generator(&five_failing())
            .mom_test(&MomTestInputs::default())
            .await;

        assert!(result.is_offline());
        assert_eq!(result.output.questions.len(), 10);
        assert!(result.output.questions.iter().all(|q| (1..=3).contains(&q.priority)));
        assert_eq!(result.errors.map(|e| e.len()), Some(5));
    }

    #[tokio::test]
    async fn test_business_image_live_echoes_settings() {
        let inputs = ImageInputs {
            idea: "bike repair".into(),
            seed: Some(42),
            n: Some(2),
            ..Default::default()
        };
        let result = generator(&[]).business_image(&inputs).await;

        assert!(!result.is_offline());
        assert_eq!(result.output.images.len(), 2);
        assert_eq!(result.output.used.seeds, image::derive_seeds(42, 2));
        assert_eq!(result.output.images[1].seed, result.output.used.seeds[1]);
    }

    #[tokio::test]
    async fn test_business_image_offline_placeholders() {
        let generator = Generator::from_parts(text_chain(&[]), text_chain(&[]), image_chain(true));
        let inputs = ImageInputs {
            idea: "bike repair".into(),
            seed: Some(7),
            ..Default::default()
        };
        let result = generator.business_image(&inputs).await;

        assert!(result.is_offline());
        assert_eq!(result.output.images.len(), 3);
        assert!(result.output.images[0]
            .data_url
            .starts_with("data:image/svg+xml;base64,"));
        assert_eq!(
            result.errors.unwrap(),
            vec!["pollinations: no image variants rendered"]
        );
    }

    #[test]
    fn test_provider_status_deduplicates() {
        let providers = vec![
            MockText::new("gemini", Behavior::Reply("x".into())),
            MockText::new("openai", Behavior::Status(401)),
        ];
        let generator = Generator::from_parts(
            text_chain(&providers),
            text_chain(&[Arc::clone(&providers[1]), Arc::clone(&providers[0])]),
            image_chain(false),
        );
        let status = generator.provider_status();

        assert_eq!(status.len(), 2);
        assert_eq!(status[0].name, "gemini");
        assert!(status[0].configured);
        assert!(!status[1].configured);
    }

    #[test]
    fn test_from_config_builds_ordered_chains() {
        let mut config = Config::default();
        config.llm.mom_test_order = vec!["groq".into(), "gemini".into()];
        let generator = Generator::from_config(&config).unwrap();

        assert_eq!(generator.leap_chain.len(), 5);
        assert_eq!(generator.mom_chain.names(), vec!["groq", "gemini"]);
        assert_eq!(generator.image_chain.names(), vec!["pollinations"]);
    }
}
