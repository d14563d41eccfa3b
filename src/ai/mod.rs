//! AI Integration Layer
//!
//! Structured generation over a chain of LLM providers, with an offline
//! backup for when none of them produce an acceptable answer.

pub mod generator;
pub mod offline;
pub mod prompt;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use generator::{Generator, ProviderStatus};
pub use prompt::{ImageRequest, PromptBuilder, PromptPair};
pub use provider::{
    ChainOutcome, ChainState, ChainStats, ChatCompletionsProvider, ErrorCategory, ErrorClassifier,
    GeminiProvider, ImageProvider, LlmError, LlmProvider, PollinationsProvider, ProviderChain,
    ProviderChainBuilder, ProviderConfig,
};
pub use timeout::{TimeoutConfig, with_timeout};
pub use validation::{MomTestValidator, parse_list, parse_mom_test, strip_code_fences};
