//! AI Response Validation
//!
//! Two-stage parsing of provider completions:
//! 1. `fences`: strip markdown code fences and outer whitespace
//! 2. `response`: intent-specific structure and schema checks
//!
//! Every rejection is a `ValidationError`, which the fallback chain records
//! as a `ParseError` for the provider that produced the text.

mod fences;
mod response;

pub use fences::strip_code_fences;
pub use response::{MomTestValidator, ParseResult, parse_list, parse_mom_test};
