//! Builds a ready classifier from the category store.

use anyhow::Context;
use lexiclass_core::classifier::Classifier;
use lexiclass_core::config::AppConfig;
use lexiclass_core::taxonomy::Taxonomy;
use lexiclass_core::tokenizer::default_stop_words;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::info;

/// Built-in stop words plus any configured extras.
pub fn stop_words(cfg: &AppConfig) -> HashSet<String> {
    let mut words = default_stop_words();
    for word in &cfg.classification.extra_stop_words {
        words.insert(word.to_lowercase());
    }
    words
}

/// Loads all stored categories into a fresh classifier snapshot.
pub async fn load_classifier(
    pool: &SqlitePool,
    stop_words: HashSet<String>,
) -> anyhow::Result<Classifier> {
    let categories = storage::categories::list(pool)
        .await
        .context("list categories")?;
    let taxonomy = Taxonomy::new(categories).context("stored taxonomy is invalid")?;
    info!("Loaded taxonomy with {} categories", taxonomy.len());
    Ok(Classifier::with_stop_words(taxonomy, stop_words))
}
