//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Network constants
pub mod network {
    /// Default per-provider LLM request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default per-seed image request timeout (seconds)
    pub const IMAGE_TIMEOUT_SECS: u64 = 60;

    /// Default server bind address
    pub const DEFAULT_BIND: &str = "0.0.0.0:8787";
}

/// LLM generation defaults
pub mod llm {
    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Default output token cap for list intents
    pub const DEFAULT_MAX_TOKENS: u32 = 800;

    /// Output token cap for the Mom-Test JSON sheet
    pub const MOM_TEST_MAX_TOKENS: u32 = 2000;
}

/// Mom-Test contract
pub mod mom_test {
    /// Exact number of questions an accepted sheet carries
    pub const QUESTION_COUNT: usize = 10;

    /// Allowed priority range (inclusive)
    pub const MIN_PRIORITY: u8 = 1;
    pub const MAX_PRIORITY: u8 = 3;
}

/// Offline backup tuning
pub mod offline {
    /// Words kept from each free-text field when splicing into templates
    pub const SEGMENT_WORDS: usize = 8;

    /// Advisory attached to outputs produced without any provider
    pub const WARNING: &str = "LLM providers unavailable; using offline backup.";
}

/// Image generation constants
pub mod image {
    /// Default number of variants
    pub const DEFAULT_VARIANTS: u32 = 3;

    /// Variant bounds (inclusive)
    pub const MIN_VARIANTS: u32 = 1;
    pub const MAX_VARIANTS: u32 = 6;

    /// Upper bound for generated seeds
    pub const SEED_RANGE: u32 = 2_147_483_647;

    /// Pollinations image endpoint
    pub const POLLINATIONS_BASE: &str = "https://image.pollinations.ai";
}
