//! Plain-text normalization helpers.
//!
//! Small, allocation-light string transforms used before text is handed to a
//! model or indexed. None of these can fail.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Common English words dropped by [`remove_stopwords`].
pub const STOPWORDS: &[&str] = &["a", "an", "the", "is", "in", "on", "and", "or", "with", "of"];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

static SPECIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").unwrap());

/// Remove stopwords, keeping the case of the remaining tokens.
///
/// Tokens are split on whitespace and rejoined with single spaces.
pub fn remove_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !STOPWORD_SET.contains(word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase and collapse whitespace runs into single spaces.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Delete everything that is not an ASCII letter, ASCII digit or whitespace.
pub fn remove_special_characters(text: &str) -> String {
    SPECIAL_CHARS.replace_all(text, "").into_owned()
}

/// Split on whitespace runs.
pub fn tokenize_text(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
