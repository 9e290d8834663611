//! Classification store: upsert, list, and get keyed by item text.

use lexiclass_core::models::ClassificationResult;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::StoreError;

/// Inserts or replaces the result for `item`; last write wins.
pub async fn upsert(
    pool: &SqlitePool,
    item: &str,
    result: &ClassificationResult,
) -> Result<(), StoreError> {
    let matches = serde_json::to_string(&result.matches)?;
    sqlx::query(
        "INSERT INTO classifications (item, category, confidence, matches)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(item) DO UPDATE SET
           category = excluded.category,
           confidence = excluded.confidence,
           matches = excluded.matches",
    )
    .bind(item)
    .bind(&result.category)
    .bind(result.confidence)
    .bind(matches)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<ClassificationResult>, StoreError> {
    let rows = sqlx::query(
        "SELECT item, category, confidence, matches FROM classifications ORDER BY item",
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, item: &str) -> Result<Option<ClassificationResult>, StoreError> {
    let row =
        sqlx::query("SELECT item, category, confidence, matches FROM classifications WHERE item = ?")
            .bind(item)
            .fetch_optional(pool)
            .await?;
    row.as_ref().map(from_row).transpose()
}

fn from_row(row: &SqliteRow) -> Result<ClassificationResult, StoreError> {
    let matches: String = row.get("matches");
    Ok(ClassificationResult {
        item: row.get("item"),
        category: row.get("category"),
        confidence: row.get("confidence"),
        matches: serde_json::from_str(&matches)?,
    })
}
