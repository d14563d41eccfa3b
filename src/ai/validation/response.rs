//! Response Validation
//!
//! Stage two of response parsing: turn fence-free completion text into the
//! structured output of one intent, or reject it with a `ValidationError`
//! so the fallback chain moves on to the next provider.
//!
//! - List intents (assumptions, hypotheses): one element per non-blank line
//! - Mom-Test: JSON object with exactly ten fully populated questions

use serde_json::{Map, Value};

use super::fences::strip_code_fences;
use crate::constants::mom_test::{MAX_PRIORITY, MIN_PRIORITY, QUESTION_COUNT};
use crate::types::{
    MomTestInputs, MomTestQuestion, MomTestSheet, ValidationError, ValidationErrorKind,
};

pub type ParseResult<T> = std::result::Result<T, ValidationError>;

// =============================================================================
// List intents
// =============================================================================

/// Split a completion into trimmed, non-blank lines.
///
/// A completion with no line structure becomes a single element; a blank
/// completion is rejected.
pub fn parse_list(raw: &str) -> ParseResult<Vec<String>> {
    let text = strip_code_fences(raw);

    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if !lines.is_empty() {
        return Ok(lines);
    }
    if text.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::Format,
            "completion is blank",
        ));
    }
    Ok(vec![text])
}

// =============================================================================
// Mom-Test
// =============================================================================

/// Parse and validate a Mom-Test completion.
///
/// Missing echo fields are filled from `inputs`.
pub fn parse_mom_test(raw: &str, inputs: &MomTestInputs) -> ParseResult<MomTestSheet> {
    let text = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&text).map_err(|e| {
        ValidationError::new(ValidationErrorKind::Format, format!("not valid JSON: {}", e))
    })?;

    let sheet = MomTestValidator.validate(&value)?;
    Ok(sheet.with_echo_defaults(inputs))
}

/// Schema check for Mom-Test sheets, walking the raw JSON value
#[derive(Debug, Clone, Copy, Default)]
pub struct MomTestValidator;

impl MomTestValidator {
    /// Validate `value` and build the sheet it describes
    pub fn validate(&self, value: &Value) -> ParseResult<MomTestSheet> {
        let root = value.as_object().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::Schema, "expected a JSON object")
        })?;

        let assumption_category = optional_text(root, "assumption_category")?;
        let hypothesis = optional_text(root, "hypothesis")?;
        let audience = optional_text(root, "audience")?;

        let questions = root
            .get("questions")
            .ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::MissingField, "field required")
                    .with_field("questions")
            })?
            .as_array()
            .ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::Schema, "expected an array")
                    .with_field("questions")
            })?;

        if questions.len() != QUESTION_COUNT {
            return Err(ValidationError::new(
                ValidationErrorKind::Range,
                format!(
                    "expected exactly {} questions, got {}",
                    QUESTION_COUNT,
                    questions.len()
                ),
            )
            .with_field("questions"));
        }

        let questions = questions
            .iter()
            .enumerate()
            .map(|(i, q)| self.validate_question(i, q))
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(MomTestSheet {
            assumption_category,
            hypothesis,
            audience,
            questions,
        })
    }

    fn validate_question(&self, index: usize, value: &Value) -> ParseResult<MomTestQuestion> {
        let path = format!("questions[{}]", index);
        let obj = value.as_object().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::Schema, "expected an object")
                .with_field(path.clone())
        })?;

        let q = required_text(obj, "q", &path)?;
        let assumption_tag = required_text(obj, "assumption_tag", &path)?;
        let why_it_works = required_text(obj, "why_it_works", &path)?;
        let signal_to_listen_for = required_text(obj, "signal_to_listen_for", &path)?;

        let priority_path = format!("{}.priority", path);
        let priority = obj.get("priority").ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::MissingField, "field required")
                .with_field(priority_path.clone())
        })?;
        let priority = priority
            .as_u64()
            .filter(|p| (u64::from(MIN_PRIORITY)..=u64::from(MAX_PRIORITY)).contains(p))
            .ok_or_else(|| {
                ValidationError::new(
                    ValidationErrorKind::Range,
                    format!(
                        "priority must be an integer {}..={}, got {}",
                        MIN_PRIORITY, MAX_PRIORITY, priority
                    ),
                )
                .with_field(priority_path.clone())
            })? as u8;

        Ok(MomTestQuestion {
            q,
            assumption_tag,
            why_it_works,
            signal_to_listen_for,
            priority,
        })
    }
}

fn required_text(obj: &Map<String, Value>, field: &str, path: &str) -> ParseResult<String> {
    let location = format!("{}.{}", path, field);
    match obj.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(
            ValidationErrorKind::MissingField,
            "field required",
        )
        .with_field(location)),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(ValidationError::new(
            ValidationErrorKind::MissingField,
            "field is blank",
        )
        .with_field(location)),
        Some(_) => Err(
            ValidationError::new(ValidationErrorKind::Schema, "expected a string")
                .with_field(location),
        ),
    }
}

fn optional_text(obj: &Map<String, Value>, field: &str) -> ParseResult<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(
            ValidationError::new(ValidationErrorKind::Schema, "expected a string")
                .with_field(field),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(i: usize) -> Value {
        json!({
            "q": format!("Tell me about the last time you faced this ({})", i),
            "assumption_tag": "Demand",
            "why_it_works": "Past behavior, not opinions",
            "signal_to_listen_for": "Specific recent story",
            "priority": (i % 3) + 1
        })
    }

    fn sheet(count: usize) -> Value {
        json!({
            "assumption_category": "Demand",
            "hypothesis": "Nurses skip meals",
            "questions": (0..count).map(question).collect::<Vec<_>>()
        })
    }

    #[test]
    fn test_parse_list_drops_blank_lines() {
        let raw = "```\n[LOFA #1]: a\n\n   \n[LOFA #2]: b  \n```";
        assert_eq!(parse_list(raw).unwrap(), vec!["[LOFA #1]: a", "[LOFA #2]: b"]);
    }

    #[test]
    fn test_parse_list_rejects_blank() {
        let err = parse_list("  \n\t ").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Format);
        assert!(parse_list("```\n```").is_err());
    }

    #[test]
    fn test_parse_list_single_line() {
        assert_eq!(parse_list("just one idea").unwrap(), vec!["just one idea"]);
    }

    #[test]
    fn test_parse_mom_test_accepts_fenced_sheet() {
        let raw = format!("```json\n{}\n```", sheet(10));
        let inputs = MomTestInputs {
            audience: "night-shift nurses".into(),
            ..Default::default()
        };
        let parsed = parse_mom_test(&raw, &inputs).unwrap();
        assert_eq!(parsed.questions.len(), 10);
        assert_eq!(parsed.hypothesis, "Nurses skip meals");
        assert_eq!(parsed.audience, "night-shift nurses");
        assert!(parsed.questions.iter().all(|q| (1..=3).contains(&q.priority)));
    }

    #[test]
    fn test_parse_mom_test_rejects_bad_json() {
        let err = parse_mom_test("{ questions: [", &MomTestInputs::default()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Format);
    }

    #[test]
    fn test_parse_mom_test_rejects_wrong_count() {
        let err = parse_mom_test(&sheet(9).to_string(), &MomTestInputs::default()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Range);
        assert_eq!(err.field.as_deref(), Some("questions"));
    }

    #[test]
    fn test_parse_mom_test_rejects_missing_signal() {
        let mut value = sheet(10);
        value["questions"][3]
            .as_object_mut()
            .unwrap()
            .remove("signal_to_listen_for");
        let err = parse_mom_test(&value.to_string(), &MomTestInputs::default()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.field.as_deref(), Some("questions[3].signal_to_listen_for"));
    }

    #[test]
    fn test_parse_mom_test_rejects_priority_out_of_range() {
        let mut value = sheet(10);
        value["questions"][0]["priority"] = json!(4);
        let err = parse_mom_test(&value.to_string(), &MomTestInputs::default()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Range);

        value["questions"][0]["priority"] = json!("high");
        assert!(parse_mom_test(&value.to_string(), &MomTestInputs::default()).is_err());
    }

    #[test]
    fn test_parse_mom_test_rejects_non_object() {
        let err = parse_mom_test("[1, 2, 3]", &MomTestInputs::default()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Schema);
    }

    #[test]
    fn test_blank_tag_is_rejected() {
        let mut value = sheet(10);
        value["questions"][9]["assumption_tag"] = json!("  ");
        assert!(parse_mom_test(&value.to_string(), &MomTestInputs::default()).is_err());
    }
}
