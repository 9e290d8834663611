//! HTTP boundary: REST routes over the classification engine and the stores.
//!
//! The classifier lives behind an `RwLock` and is replaced wholesale when
//! categories change, so in-flight requests always see one consistent
//! taxonomy snapshot.

use anyhow::Context as _;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use lexiclass_core::classifier::Classifier;
use lexiclass_core::config::AppConfig;
use lexiclass_core::models::{
    Category, CategoryBatch, ClassificationResult, ItemBatch, ResultBatch,
};
use lexiclass_core::taxonomy::{Taxonomy, TaxonomyError};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::engine;

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    classifier: Arc<RwLock<Classifier>>,
    stop_words: HashSet<String>,
}

impl AppState {
    /// Connects, migrates, seeds an empty category store, and loads the
    /// initial taxonomy snapshot.
    pub async fn initialize(cfg: &AppConfig) -> anyhow::Result<Self> {
        let pool = storage::connect(&cfg.database.path)
            .await
            .context("db connect")?;
        storage::migrate(&pool).await.context("db migrate")?;

        if storage::categories::list(&pool).await?.is_empty() {
            info!("Category store is empty, seeding defaults");
            storage::seed::seed_defaults(&pool).await?;
        }

        let stop_words = engine::stop_words(cfg);
        let classifier = engine::load_classifier(&pool, stop_words.clone()).await?;
        Ok(Self {
            pool,
            classifier: Arc::new(RwLock::new(classifier)),
            stop_words,
        })
    }
}

pub async fn run(cfg: AppConfig, bind_override: Option<String>) -> anyhow::Result<()> {
    let addr = bind_override.unwrap_or_else(|| cfg.server.bind.clone());
    let state = AppState::initialize(&cfg).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/classifications",
            get(list_classifications).post(create_classifications),
        )
        .route("/classifications/:item", get(get_classification))
        .route("/categories", get(list_categories).post(create_categories))
        .route("/categories/:name", get(get_category))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Failure categories surfaced to clients: a store failure, bad input, and a
/// missing resource each map to a distinct status.
#[derive(Debug)]
enum ApiError {
    NotFound(&'static str),
    Invalid(String),
    Store(storage::StoreError),
}

impl From<storage::StoreError> for ApiError {
    fn from(err: storage::StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<TaxonomyError> for ApiError {
    fn from(err: TaxonomyError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Invalid(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Store(err) => {
                error!("store failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("store failure: {err}"),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

async fn list_classifications(
    State(state): State<AppState>,
) -> Result<Json<ResultBatch>, ApiError> {
    let results = storage::classifications::list(&state.pool).await?;
    Ok(Json(ResultBatch { results }))
}

async fn create_classifications(
    State(state): State<AppState>,
    Json(batch): Json<ItemBatch>,
) -> Result<(StatusCode, Json<ResultBatch>), ApiError> {
    let classifier = state.classifier.read().await;
    let mut results = Vec::with_capacity(batch.items.len());
    for item in batch.items {
        let mut result = classifier.classify(&item);
        result.item = item;
        storage::classifications::upsert(&state.pool, &result.item, &result).await?;
        results.push(result);
    }
    info!("Classified {} items", results.len());
    Ok((StatusCode::CREATED, Json(ResultBatch { results })))
}

async fn get_classification(
    State(state): State<AppState>,
    Path(item): Path<String>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let result = storage::classifications::get(&state.pool, &item)
        .await?
        .ok_or(ApiError::NotFound("classification"))?;
    Ok(Json(result))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoryBatch>, ApiError> {
    let categories = storage::categories::list(&state.pool).await?;
    Ok(Json(CategoryBatch { categories }))
}

async fn create_categories(
    State(state): State<AppState>,
    Json(categories): Json<Vec<Category>>,
) -> Result<(StatusCode, Json<CategoryBatch>), ApiError> {
    // Validate the batch before touching the store.
    Taxonomy::new(categories.clone())?;
    for category in &categories {
        storage::categories::upsert(&state.pool, category).await?;
    }
    reload_classifier(&state).await?;
    info!("Stored {} categories and reloaded taxonomy", categories.len());
    Ok((StatusCode::CREATED, Json(CategoryBatch { categories })))
}

async fn get_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = storage::categories::get(&state.pool, &name)
        .await?
        .ok_or(ApiError::NotFound("category"))?;
    Ok(Json(category))
}

/// Rebuilds the classifier from the store and swaps it in atomically.
async fn reload_classifier(state: &AppState) -> Result<(), ApiError> {
    let categories = storage::categories::list(&state.pool).await?;
    let taxonomy = Taxonomy::new(categories)?;
    let classifier = Classifier::with_stop_words(taxonomy, state.stop_words.clone());
    *state.classifier.write().await = classifier;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexiclass_core::config::DatabaseConfig;
    use lexiclass_core::models::UNKNOWN_CATEGORY;

    async fn test_state(name: &str) -> AppState {
        let cfg = AppConfig {
            database: DatabaseConfig {
                path: format!("sqlite://file:{name}?mode=memory&cache=shared"),
            },
            ..AppConfig::default()
        };
        AppState::initialize(&cfg).await.unwrap()
    }

    fn named_category(name: &str, keywords: &[&str]) -> Category {
        Category {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            phrases: Vec::new(),
            contexts: Default::default(),
            excluders: Vec::new(),
        }
    }

    #[tokio::test]
    async fn classify_batch_persists_and_returns_results() {
        let state = test_state("server_classify").await;
        let batch = ItemBatch {
            items: vec![
                "The computer is running new software".to_string(),
                "The weather is nice today".to_string(),
            ],
        };
        let (status, Json(body)) =
            create_classifications(State(state.clone()), Json(batch)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.results[0].category, "Technology");
        assert_eq!(body.results[0].item, "The computer is running new software");
        assert_eq!(body.results[1].category, UNKNOWN_CATEGORY);

        let Json(stored) = get_classification(
            State(state),
            Path("The computer is running new software".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(stored.category, "Technology");
        assert_eq!(stored.confidence, body.results[0].confidence);
    }

    #[tokio::test]
    async fn missing_classification_is_not_found() {
        let state = test_state("server_missing").await;
        let err = get_classification(State(state), Path("never classified".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn posting_categories_reloads_the_classifier() {
        let state = test_state("server_reload").await;
        let weather = named_category("Weather", &["weather", "sunny"]);
        let (status, _) = create_categories(State(state.clone()), Json(vec![weather]))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let batch = ItemBatch {
            items: vec!["the weather is sunny".to_string()],
        };
        let (_, Json(body)) =
            create_classifications(State(state), Json(batch)).await.unwrap();
        assert_eq!(body.results[0].category, "Weather");
        assert_eq!(body.results[0].confidence, 1.0);
    }

    #[tokio::test]
    async fn invalid_category_batch_is_rejected() {
        let state = test_state("server_invalid").await;
        let err = create_categories(State(state.clone()), Json(vec![named_category("", &[])]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));

        let dupes = vec![
            named_category("Twice", &["a"]),
            named_category("Twice", &["b"]),
        ];
        let err = create_categories(State(state), Json(dupes)).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }

    #[tokio::test]
    async fn category_lookup_roundtrip() {
        let state = test_state("server_categories").await;
        let Json(all) = list_categories(State(state.clone())).await.unwrap();
        assert_eq!(all.categories.len(), 2);

        let Json(tech) = get_category(State(state.clone()), Path("Technology".to_string()))
            .await
            .unwrap();
        assert!(tech.keywords.contains(&"computer".to_string()));

        let err = get_category(State(state), Path("Nope".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
