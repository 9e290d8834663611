//! Category store: upsert, list, and get over the `categories` table.

use lexiclass_core::models::Category;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::StoreError;

pub async fn upsert(pool: &SqlitePool, category: &Category) -> Result<(), StoreError> {
    let keywords = serde_json::to_string(&category.keywords)?;
    let phrases = serde_json::to_string(&category.phrases)?;
    let contexts = serde_json::to_string(&category.contexts)?;
    let excluders = serde_json::to_string(&category.excluders)?;

    sqlx::query(
        "INSERT INTO categories (name, keywords, phrases, contexts, excluders)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(name) DO UPDATE SET
           keywords = excluded.keywords,
           phrases = excluded.phrases,
           contexts = excluded.contexts,
           excluders = excluded.excluders",
    )
    .bind(&category.name)
    .bind(keywords)
    .bind(phrases)
    .bind(contexts)
    .bind(excluders)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Category>, StoreError> {
    let rows = sqlx::query(
        "SELECT name, keywords, phrases, contexts, excluders FROM categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, name: &str) -> Result<Option<Category>, StoreError> {
    let row = sqlx::query(
        "SELECT name, keywords, phrases, contexts, excluders FROM categories WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(from_row).transpose()
}

fn from_row(row: &SqliteRow) -> Result<Category, StoreError> {
    let keywords: String = row.get("keywords");
    let phrases: String = row.get("phrases");
    let contexts: String = row.get("contexts");
    let excluders: String = row.get("excluders");
    Ok(Category {
        name: row.get("name"),
        keywords: serde_json::from_str(&keywords)?,
        phrases: serde_json::from_str(&phrases)?,
        contexts: serde_json::from_str(&contexts)?,
        excluders: serde_json::from_str(&excluders)?,
    })
}
