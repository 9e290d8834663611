use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel category name returned when no category scores above zero.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// A named rule set used to score input text.
///
/// Contexts map a trigger term to related terms; trigger and related term
/// must both occur in the input for a contextual hit. A `BTreeMap` keeps
/// context iteration sorted by trigger so match lists are reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub contexts: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub excluders: Vec<String>,
}

/// Outcome of classifying one input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Original input text; filled by the caller, not the engine.
    #[serde(default)]
    pub item: String,
    pub category: String,
    pub confidence: f64,
    #[serde(default)]
    pub matches: Vec<String>,
}

impl ClassificationResult {
    /// The fallback result: no category matched.
    pub fn unknown() -> Self {
        Self {
            item: String::new(),
            category: UNKNOWN_CATEGORY.to_string(),
            confidence: 0.0,
            matches: Vec::new(),
        }
    }
}

/// Request body for batch classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemBatch {
    pub items: Vec<String>,
}

/// Response body wrapping a list of classification results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBatch {
    pub results: Vec<ClassificationResult>,
}

/// Response body wrapping a list of category definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBatch {
    pub categories: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_json_shape_roundtrips() {
        let json = r#"{
            "name": "Technology",
            "keywords": ["computer"],
            "phrases": ["machine learning"],
            "contexts": {"data": ["analysis"]},
            "excluders": ["recipe"]
        }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.contexts["data"], ["analysis"]);

        let back: Category =
            serde_json::from_str(&serde_json::to_string(&category).unwrap()).unwrap();
        assert_eq!(back, category);
    }

    #[test]
    fn missing_rule_fields_default_to_empty() {
        let category: Category = serde_json::from_str(r#"{"name": "Bare"}"#).unwrap();
        assert!(category.keywords.is_empty());
        assert!(category.phrases.is_empty());
        assert!(category.contexts.is_empty());
        assert!(category.excluders.is_empty());
    }

    #[test]
    fn unknown_sentinel_shape() {
        let unknown = ClassificationResult::unknown();
        assert_eq!(unknown.category, UNKNOWN_CATEGORY);
        assert_eq!(unknown.confidence, 0.0);
        assert!(unknown.matches.is_empty());
    }
}
