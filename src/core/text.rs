//! Text normalization shared by the extractor, rule tables and models
//!
//! Everything that compares keywords goes through [`tokenize`] so that
//! "Gas-Leak!" in a report and "gas leak" in a rule table meet in the middle.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    // Letters and digits; everything else is a separator.
    Regex::new(r"[\p{L}\p{N}]+").unwrap_or_else(|_| unreachable!("static token pattern"))
});

/// Lowercase, strip punctuation and split into tokens
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Normalize a keyword or phrase to its canonical space-joined form
#[must_use]
pub fn normalize_term(term: &str) -> String {
    tokenize(term).join(" ")
}

/// Normalize a structured tag (trimmed, lowercased, inner whitespace collapsed)
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
