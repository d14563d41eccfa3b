//! Prompt Builder System
//!
//! Pure, deterministic prompt construction for every generation intent.
//! Inputs are sanitized before interpolation and empty fields are replaced
//! by a readable default, so the same inputs always yield the same pair.
//!
//! ## Layout
//!
//! - `sanitize`: URL/emoji stripping and default substitution
//! - `leap_of_faith`: assumption and hypothesis prompts
//! - `mom_test`: Mom-Test interview question prompt
//! - `image`: concept image prompt, negative prompt and render settings

pub mod image;
pub mod leap_of_faith;
pub mod sanitize;

pub use image::ImageRequest;

/// A system/user prompt pair plus the output budget for one request.
///
/// Built once per request and shared by reference with every provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
    /// Output token cap providers should request
    pub max_tokens: u32,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
        }
    }

    /// Single-turn text for providers without a system role
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Prompt section types
#[derive(Debug, Clone)]
enum PromptSection {
    /// Persona and goal
    Role { persona: String, goal: String },
    /// Numbered steps
    Steps(Vec<String>),
    /// Ordered labelled values
    Fields {
        header: String,
        items: Vec<(String, String)>,
    },
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Hard rules the model must follow
    Rules { title: String, rules: Vec<String> },
}

/// Section-based prompt builder
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, persona: &str, goal: &str) -> Self {
        self.sections.push(PromptSection::Role {
            persona: persona.to_string(),
            goal: goal.to_string(),
        });
        self
    }

    /// Add numbered steps
    pub fn steps(mut self, steps: &[&str]) -> Self {
        self.sections.push(PromptSection::Steps(
            steps.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Add a labelled field list, rendered in insertion order
    pub fn fields(mut self, header: &str, items: Vec<(&str, String)>) -> Self {
        self.sections.push(PromptSection::Fields {
            header: header.to_string(),
            items: items
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        });
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add a rules checklist
    pub fn rules(mut self, title: &str, rules: &[&str]) -> Self {
        self.sections.push(PromptSection::Rules {
            title: title.to_string(),
            rules: rules.iter().map(|r| r.to_string()).collect(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { persona, goal } => {
                    prompt.push_str(&format!("Role: {}\n\nGoal: {}\n\n", persona, goal));
                }
                PromptSection::Steps(steps) => {
                    prompt.push_str("Steps to Perform:\n");
                    for (i, step) in steps.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, step));
                    }
                    prompt.push('\n');
                }
                PromptSection::Fields { header, items } => {
                    prompt.push_str(&format!("{}\n", header));
                    for (key, value) in items {
                        prompt.push_str(&format!("{}: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Rules { title, rules } => {
                    prompt.push_str(&format!("{}:\n", title));
                    for (i, rule) in rules.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, rule));
                    }
                    prompt.push('\n');
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("Lean Startup Strategist", "Find the riskiest beliefs")
            .steps(&["Parse the input", "List assumptions"])
            .build();

        assert!(prompt.starts_with("Role: Lean Startup Strategist"));
        assert!(prompt.contains("1. Parse the input"));
        assert!(prompt.contains("2. List assumptions"));
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let prompt = PromptBuilder::new()
            .fields(
                "CPS:",
                vec![
                    ("Customer", "bakers".to_string()),
                    ("Problem", "waste".to_string()),
                    ("Solution", "app".to_string()),
                ],
            )
            .build();

        let customer = prompt.find("Customer: bakers").unwrap();
        let problem = prompt.find("Problem: waste").unwrap();
        let solution = prompt.find("Solution: app").unwrap();
        assert!(customer < problem && problem < solution);
    }

    #[test]
    fn test_rules_and_sections() {
        let prompt = PromptBuilder::new()
            .rules("RULES", &["No pitching", "No hypotheticals"])
            .section("Expected Output:", "[LOFA #1]: ...")
            .build();

        assert!(prompt.contains("RULES:\n1. No pitching\n2. No hypotheticals"));
        assert!(prompt.ends_with("[LOFA #1]: ..."));
    }

    #[test]
    fn test_combined_joins_with_blank_line() {
        let pair = PromptPair::new("sys", "usr", 800);
        assert_eq!(pair.combined(), "sys\n\nusr");
    }
}
