//! Concept image prompt synthesis.
//!
//! Maps founder answers and UI choices onto a brand-safe positive prompt,
//! a negative prompt and locked render settings. Seeds are derived
//! deterministically from a base seed so a result can be reproduced.

use super::PromptPair;
use super::sanitize::{or_default, sanitize};
use crate::constants::image::{DEFAULT_VARIANTS, MAX_VARIANTS, MIN_VARIANTS, SEED_RANGE};
use crate::types::{ImageInputs, ImageSettings};

pub const BRAND: &str = "YourBrand";
pub const DEFAULT_IDEA: &str = "a new product or service";
pub const DEFAULT_AUDIENCE: &str = "the intended customer";
pub const DEFAULT_USER: &str = "anon";

const COMPOSITION: &str = "center framing, clean background";
const LIGHTING: &str = "soft studio lighting";
const PALETTE: &str = "soft neutrals with one accent color";

pub const NEGATIVE_BASE: &str = "blurry, low-res, extra fingers, mangled hands, deformed limbs, \
    distorted face, watermark, logo, wrong proportions, oversaturated, noisy, text artifacts, \
    jpeg artifacts, unrealistic anatomy";

/// Render settings locked per style preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePreset {
    pub name: &'static str,
    pub cfg: f32,
    pub steps: u32,
    pub sampler: &'static str,
}

pub const STYLE_PRESETS: [StylePreset; 7] = [
    StylePreset { name: "E-commerce Studio", cfg: 7.0, steps: 28, sampler: "Euler a" },
    StylePreset { name: "Photoreal", cfg: 6.5, steps: 30, sampler: "Euler a" },
    StylePreset { name: "3D Render", cfg: 8.0, steps: 26, sampler: "DPM++ 2M" },
    StylePreset { name: "Flat Illustration", cfg: 5.5, steps: 22, sampler: "Euler" },
    StylePreset { name: "Architectural", cfg: 7.5, steps: 32, sampler: "DPM++ 2M Karras" },
    StylePreset { name: "Cyberpunk", cfg: 7.0, steps: 30, sampler: "Euler a" },
    StylePreset { name: "Line Art", cfg: 5.0, steps: 20, sampler: "Euler" },
];

/// Aspect ratio keys and their pixel sizes
pub const ASPECT_SIZES: [(&str, u32, u32); 4] = [
    ("1:1", 1024, 1024),
    ("4:5", 1024, 1280),
    ("3:2", 1344, 896),
    ("16:9", 1536, 864),
];

/// Unknown or empty names resolve to the first preset
pub fn style_preset(name: &str) -> StylePreset {
    STYLE_PRESETS
        .iter()
        .copied()
        .find(|p| p.name == name)
        .unwrap_or(STYLE_PRESETS[0])
}

/// Unknown or empty keys resolve to 1:1
pub fn aspect_size(key: &str) -> (u32, u32) {
    ASPECT_SIZES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, w, h)| (*w, *h))
        .unwrap_or((ASPECT_SIZES[0].1, ASPECT_SIZES[0].2))
}

/// Everything an image provider needs to render one request
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// `user` is the positive prompt, `system` the negative prompt
    pub prompt: PromptPair,
    /// Sanitized idea, used to label offline placeholders
    pub subject: String,
    pub preset: StylePreset,
    pub width: u32,
    pub height: u32,
    pub allow_text: bool,
    /// One image per seed
    pub seeds: Vec<u32>,
}

impl ImageRequest {
    pub fn positive(&self) -> &str {
        &self.prompt.user
    }

    pub fn negative(&self) -> &str {
        &self.prompt.system
    }

    /// Settings echoed back to the caller for reproducibility
    pub fn settings(&self) -> ImageSettings {
        ImageSettings {
            prompt: self.prompt.user.clone(),
            negative: self.prompt.system.clone(),
            width: self.width,
            height: self.height,
            cfg: self.preset.cfg,
            steps: self.preset.steps,
            sampler: self.preset.sampler.to_string(),
            allow_text: self.allow_text,
            seeds: self.seeds.clone(),
        }
    }
}

/// Build an image request.
///
/// `fallback_base` seeds the variant fan-out when the caller supplied no
/// base seed; see [`seed_basis`].
pub fn build(inputs: &ImageInputs, fallback_base: u32) -> ImageRequest {
    let subject = or_default(&inputs.idea, DEFAULT_IDEA);
    let audience = or_default(&inputs.audience, DEFAULT_AUDIENCE);
    let qualified = sanitize(&inputs.qualified);
    let passion = sanitize(&inputs.passion);
    let preset = style_preset(&inputs.style_preset);
    let (width, height) = aspect_size(&inputs.aspect);
    let allow_text = inputs.allow_text;

    let mut lines = vec![
        format!("You are generating brand-safe, high-quality images for {}.", BRAND),
        format!("Render a concept visual for: {}", subject),
        format!("Audience: {}", audience),
    ];
    if !qualified.is_empty() {
        lines.push(format!("Founder credibility: {}.", qualified));
    }
    if !passion.is_empty() {
        lines.push(format!("Motivation: {}.", passion));
    }
    lines.push(format!(
        "Style: {}; {}; {}; Palette: {}.",
        preset.name, COMPOSITION, LIGHTING, PALETTE
    ));
    lines.push(
        "Photorealistic where applicable, sharp focus, consistent perspective, clean background."
            .to_string(),
    );
    if !allow_text {
        lines.push("Do not render any text, letters, logos, or watermarks.".to_string());
    }

    let negative = if allow_text {
        NEGATIVE_BASE.replacen(", logo", "", 1)
    } else {
        format!("{}, text, letters, wordmark", NEGATIVE_BASE)
    };

    let count = inputs
        .n
        .unwrap_or(DEFAULT_VARIANTS)
        .clamp(MIN_VARIANTS, MAX_VARIANTS);
    let seeds = derive_seeds(inputs.seed.unwrap_or(fallback_base), count);

    ImageRequest {
        prompt: PromptPair::new(negative, lines.join("\n"), 0),
        subject,
        preset,
        width,
        height,
        allow_text,
        seeds,
    }
}

/// Base seed for callers that did not pin one: FNV-1a of `"<user>:<millis>"`
pub fn seed_basis(user_id: Option<&str>, millis: u128) -> u32 {
    let user = user_id
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_USER);
    fnv1a(&format!("{}:{}", user, millis))
}

fn fnv1a(s: &str) -> u32 {
    s.encode_utf16().fold(2_166_136_261u32, |h, unit| {
        (h ^ u32::from(unit)).wrapping_mul(16_777_619)
    })
}

/// Fan a base seed out into `count` variant seeds
pub fn derive_seeds(base: u32, count: u32) -> Vec<u32> {
    let mut rng = Mulberry32(base);
    (0..count)
        .map(|_| (rng.next_unit() * f64::from(SEED_RANGE)) as u32)
        .collect()
}

/// Small 32-bit PRNG with a stable sequence for a given seed
struct Mulberry32(u32);

impl Mulberry32 {
    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x6D2B_79F5);
        let mut t = self.0;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}
