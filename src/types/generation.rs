//! Generation request and response shapes.
//!
//! Inputs mirror the JSON bodies each endpoint accepts. Every free-text field
//! deserializes to `""` when absent or `null`, so prompt builders never see a
//! missing value.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat JSON `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Any JSON number, truncated and saturated into `u32`
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Option::<f64>::deserialize(deserializer)?;
    Ok(n.map(|n| n.trunc().clamp(0.0, u32::MAX as f64) as u32))
}

/// Any JSON number, truncated and wrapped modulo 2^32 like a JS `>>> 0`
fn lenient_seed<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    const MODULUS: f64 = 4_294_967_296.0;
    let seed = Option::<f64>::deserialize(deserializer)?;
    Ok(seed.map(|s| s.trunc().rem_euclid(MODULUS) as u32))
}

// =============================================================================
// Intents
// =============================================================================

/// What a single generation request is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Leap of Faith Assumptions from a CPS statement
    Assumptions,
    /// Testable hypotheses from previously generated assumptions
    Hypotheses,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Assumptions => "assumptions",
            Intent::Hypotheses => "hypotheses",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Which circle of the Leap of Faith builder the founder is on.
///
/// Only `"assumption"` selects the first circle; any other name is treated
/// as the hypothesis circle. Absent or `null` means assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CircleType {
    #[default]
    Assumption,
    Hypothesis,
}

impl<'de> Deserialize<'de> for CircleType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(if name == "assumption" {
            Self::Assumption
        } else {
            Self::Hypothesis
        })
    }
}

/// Body of `POST /generate-leap-of-faith`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeapOfFaithInputs {
    #[serde(deserialize_with = "null_as_default")]
    pub customer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub problem: String,
    #[serde(deserialize_with = "null_as_default")]
    pub solution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub circle_type: CircleType,
    /// Upstream assumptions, required for the hypothesis circle
    #[serde(deserialize_with = "null_as_default")]
    pub leap_of_faith_results: Vec<String>,
}

impl LeapOfFaithInputs {
    pub fn intent(&self) -> Intent {
        match self.circle_type {
            CircleType::Assumption => Intent::Assumptions,
            CircleType::Hypothesis => Intent::Hypotheses,
        }
    }
}

/// Body of `POST /generate-mom-test`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomTestInputs {
    #[serde(deserialize_with = "null_as_default")]
    pub idea: String,
    #[serde(deserialize_with = "null_as_default")]
    pub passion: String,
    #[serde(deserialize_with = "null_as_default")]
    pub qualified: String,
    #[serde(deserialize_with = "null_as_default")]
    pub audience: String,
    #[serde(deserialize_with = "null_as_default")]
    pub assumption_category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hypothesis: String,
    #[serde(deserialize_with = "null_as_default")]
    pub context: String,
}

/// Body of `POST /generate-business-image`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageInputs {
    #[serde(deserialize_with = "null_as_default")]
    pub idea: String,
    #[serde(deserialize_with = "null_as_default")]
    pub passion: String,
    #[serde(deserialize_with = "null_as_default")]
    pub qualified: String,
    #[serde(deserialize_with = "null_as_default")]
    pub audience: String,
    /// Style preset name; unknown names fall back to the default preset
    #[serde(deserialize_with = "null_as_default")]
    pub style_preset: String,
    /// Aspect ratio key such as `"16:9"`
    #[serde(deserialize_with = "null_as_default")]
    pub aspect: String,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_text: bool,
    /// Number of variants requested (clamped later)
    #[serde(deserialize_with = "lenient_count")]
    pub n: Option<u32>,
    /// Reproducible base seed
    #[serde(deserialize_with = "lenient_seed")]
    pub seed: Option<u32>,
    pub user_id: Option<String>,
}

// =============================================================================
// Outputs
// =============================================================================

/// Output of the assumption and hypothesis intents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assumptions {
    pub assumptions: Vec<String>,
}

/// One Mom-Test interview question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomTestQuestion {
    pub q: String,
    pub assumption_tag: String,
    pub why_it_works: String,
    pub signal_to_listen_for: String,
    /// 1 (ask first) to 3
    pub priority: u8,
}

/// Output of the Mom-Test intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomTestSheet {
    #[serde(default)]
    pub assumption_category: String,
    #[serde(default)]
    pub hypothesis: String,
    #[serde(default)]
    pub audience: String,
    pub questions: Vec<MomTestQuestion>,
}

impl MomTestSheet {
    /// Fill echo fields the model left out from the request
    pub fn with_echo_defaults(mut self, inputs: &MomTestInputs) -> Self {
        if self.assumption_category.trim().is_empty() {
            self.assumption_category = inputs.assumption_category.clone();
        }
        if self.hypothesis.trim().is_empty() {
            self.hypothesis = inputs.hypothesis.clone();
        }
        if self.audience.trim().is_empty() {
            self.audience = inputs.audience.clone();
        }
        self
    }
}

/// A rendered image variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderImage {
    #[serde(rename = "dataUrl")]
    pub data_url: String,
    pub seed: u32,
}

/// The exact settings an image set was generated with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    pub prompt: String,
    pub negative: String,
    pub width: u32,
    pub height: u32,
    pub cfg: f32,
    pub steps: u32,
    pub sampler: String,
    pub allow_text: bool,
    pub seeds: Vec<u32>,
}

/// Output of the image intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    pub images: Vec<ProviderImage>,
    pub used: ImageSettings,
}

/// A structured output plus provenance annotations.
///
/// `_warning` and `_errors` are only present when the offline backup
/// produced the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generated<T> {
    #[serde(flatten)]
    pub output: T,
    #[serde(rename = "_warning", default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(rename = "_errors", default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> Generated<T> {
    pub fn live(output: T) -> Self {
        Self {
            output,
            warning: None,
            errors: None,
        }
    }

    pub fn offline(output: T, warning: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            output,
            warning: Some(warning.into()),
            errors: Some(errors),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.warning.is_some()
    }
}
