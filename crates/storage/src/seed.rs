//! Default taxonomy installed on first run.

use lexiclass_core::models::Category;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::info;

use crate::{categories, StoreError};

pub fn default_categories() -> Vec<Category> {
    vec![
        Category {
            name: "Technology".to_string(),
            keywords: strings(&[
                "computer",
                "software",
                "program",
                "code",
                "algorithm",
                "database",
                "network",
                "server",
                "application",
                "system",
            ]),
            phrases: strings(&[
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "neural network",
                "cloud computing",
            ]),
            contexts: contexts(&[
                ("development", &["software", "web", "app", "mobile"]),
                ("data", &["processing", "analysis", "storage"]),
                ("security", &["cyber", "network", "encryption"]),
            ]),
            excluders: strings(&["recipe", "cook", "bake", "ingredient"]),
        },
        Category {
            name: "Food and Cooking".to_string(),
            keywords: strings(&[
                "cook",
                "recipe",
                "food",
                "meal",
                "ingredient",
                "kitchen",
                "dish",
                "taste",
                "flavor",
                "cuisine",
            ]),
            phrases: strings(&[
                "healthy eating",
                "meal prep",
                "cooking instructions",
                "recipe guide",
                "food preparation",
            ]),
            contexts: contexts(&[
                ("preparation", &["cook", "bake", "grill", "roast"]),
                ("ingredients", &["fresh", "organic", "raw", "dried"]),
                ("taste", &["delicious", "savory", "sweet", "spicy"]),
            ]),
            excluders: strings(&["computer", "program", "code", "algorithm"]),
        },
    ]
}

pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), StoreError> {
    let defaults = default_categories();
    for category in &defaults {
        categories::upsert(pool, category).await?;
    }
    info!("Seeded {} default categories", defaults.len());
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn contexts(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(trigger, related)| (trigger.to_string(), strings(related)))
        .collect()
}
