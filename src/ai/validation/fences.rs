//! Stage one of response parsing: unwrap markdown code fences.

/// Remove a surrounding ```` ```json ```` / ```` ``` ```` fence, a BOM and
/// outer whitespace. Text without a fence is returned trimmed.
pub fn strip_code_fences(raw: &str) -> String {
    let mut result = raw.trim_start_matches('\u{feff}').trim();

    if result.starts_with("```") {
        result = match result.find('\n') {
            Some(first_newline) => &result[first_newline + 1..],
            None => result.trim_start_matches('`').trim_start_matches("json"),
        };
    }

    let mut result = result.trim_end();
    if let Some(stripped) = result.strip_suffix("```") {
        result = stripped.trim_end();
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let input = "```json\n{\"questions\": []}\n```";
        assert_eq!(strip_code_fences(input), "{\"questions\": []}");
    }

    #[test]
    fn test_strip_bare_fence_with_padding() {
        let input = "  \n```\nline one\nline two\n```  \n";
        assert_eq!(strip_code_fences(input), "line one\nline two");
    }

    #[test]
    fn test_unfenced_text_is_trimmed() {
        assert_eq!(strip_code_fences("\u{feff}  [LOFA #1]: x \n"), "[LOFA #1]: x");
    }

    #[test]
    fn test_single_line_fence() {
        assert_eq!(strip_code_fences("```json {\"a\":1}```"), "{\"a\":1}");
    }
}
