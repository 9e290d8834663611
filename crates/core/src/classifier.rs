//! Rule-based scoring engine: keywords, phrases, contextual pairs, excluders.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Category, ClassificationResult};
use crate::taxonomy::Taxonomy;
use crate::tokenizer::{self, default_stop_words};

const KEYWORD_WEIGHT: f64 = 1.0;
const PHRASE_WEIGHT: f64 = 2.0;
const CONTEXT_WEIGHT: f64 = 1.5;

/// Scores input text against every category in a taxonomy snapshot and picks
/// the single best match.
///
/// A classifier is immutable after construction and holds no per-call state,
/// so a shared reference can serve unlimited concurrent `classify` calls.
/// Replacing the taxonomy means building a new classifier and swapping it in
/// wholesale.
pub struct Classifier {
    taxonomy: Taxonomy,
    stop_words: HashSet<String>,
}

impl Classifier {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self::with_stop_words(taxonomy, default_stop_words())
    }

    pub fn with_stop_words(taxonomy: Taxonomy, stop_words: HashSet<String>) -> Self {
        Self {
            taxonomy,
            stop_words,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classifies one input item. Total over any string: inputs that match
    /// nothing (or produce no tokens) come back as the `Unknown` sentinel.
    ///
    /// The confidence denominator is the filtered token count. When the input
    /// has no tokens left after stop-word filtering, every confidence is
    /// defined as 0.0 instead of dividing by zero, so the result is `Unknown`
    /// even if rule terms matched the raw text.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let tokens = tokenizer::tokenize(text, &self.stop_words);
        let text_lower = text.to_lowercase();

        let mut best: Option<ClassificationResult> = None;
        for category in self.taxonomy.categories() {
            let Some((score, matches)) = score_category(category, &text_lower) else {
                debug!(category = %category.name, "excluded");
                continue;
            };
            let confidence = if tokens.is_empty() {
                0.0
            } else {
                score / tokens.len() as f64
            };
            if confidence <= 0.0 {
                continue;
            }
            // Strict comparison keeps the earliest category on exact ties.
            if best.as_ref().map_or(true, |b| confidence > b.confidence) {
                best = Some(ClassificationResult {
                    item: String::new(),
                    category: category.name.clone(),
                    confidence,
                    matches,
                });
            }
        }

        best.unwrap_or_else(ClassificationResult::unknown)
    }
}

/// Scores a single category against the lowercased input. Returns `None` when
/// an excluder term disqualifies the category outright.
///
/// Keywords, phrases, and excluders are lowercased before the substring
/// check; context triggers and related terms are matched as stored. Matched
/// keywords and phrases are reported in their stored casing.
fn score_category(category: &Category, text_lower: &str) -> Option<(f64, Vec<String>)> {
    for excluder in &category.excluders {
        if text_lower.contains(&excluder.to_lowercase()) {
            return None;
        }
    }

    let mut score = 0.0;
    let mut matches = Vec::new();

    for keyword in &category.keywords {
        if text_lower.contains(&keyword.to_lowercase()) {
            score += KEYWORD_WEIGHT;
            matches.push(keyword.clone());
        }
    }

    for phrase in &category.phrases {
        if text_lower.contains(&phrase.to_lowercase()) {
            score += PHRASE_WEIGHT;
            matches.push(phrase.clone());
        }
    }

    for (trigger, related_terms) in &category.contexts {
        if text_lower.contains(trigger.as_str()) {
            for related in related_terms {
                if text_lower.contains(related.as_str()) {
                    score += CONTEXT_WEIGHT;
                    matches.push(format!("{trigger}-{related}"));
                }
            }
        }
    }

    Some((score, matches))
}
