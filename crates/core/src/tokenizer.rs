//! Tokenization and stop-word filtering.
//!
//! Tokens only feed the confidence denominator; matching itself runs on the
//! raw lowercased input string.

use std::collections::HashSet;

/// Common function words dropped from the token stream.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
];

pub fn default_stop_words() -> HashSet<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Lowercases the input, splits on every run of non-alphanumeric characters
/// (Unicode letter/number classes), and drops stop words. Order is preserved
/// and duplicates are retained; empty input yields an empty sequence.
pub fn tokenize(text: &str, stop_words: &HashSet<String>) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !stop_words.contains(*t))
        .map(str::to_string)
        .collect()
}
