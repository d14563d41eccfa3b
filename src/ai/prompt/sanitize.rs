//! Input sanitization applied before any value reaches a prompt.

use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+").expect("valid regex")
});

/// Pictographs, dingbats, zero-width joiner and emoji variation selector
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{1F300}-\x{1FAFF}\x{2600}-\x{27BF}\x{200D}\x{FE0F}]").expect("valid regex")
});

/// Strip emoji, then URLs, then trim.
///
/// Emoji go first so one hidden inside a URL cannot shield it from removal.
pub fn sanitize(raw: &str) -> String {
    let without_emoji = EMOJI_RE.replace_all(raw, "");
    let without_urls = URL_RE.replace_all(&without_emoji, "");
    without_urls.trim().to_string()
}

/// Sanitize, substituting `default` when nothing is left
pub fn or_default(raw: &str, default: &str) -> String {
    let cleaned = sanitize(raw);
    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned
    }
}

/// First `max_words` whitespace-separated words, with `...` when cut
pub fn segment(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    format!("{}...", words[..max_words].join(" "))
}
