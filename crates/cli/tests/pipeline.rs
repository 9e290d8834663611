use cli::engine;
use lexiclass_core::config::{AppConfig, DatabaseConfig};
use lexiclass_core::models::UNKNOWN_CATEGORY;
use tempfile::tempdir;

#[tokio::test]
async fn test_full_pipeline() {
    // Use shared in-memory DB so multiple connections see the same data.
    let cfg = AppConfig {
        database: DatabaseConfig {
            path: "sqlite://file:pipeline_test?mode=memory&cache=shared".to_string(),
        },
        ..AppConfig::default()
    };

    let pool = storage::connect(&cfg.database.path).await.unwrap();
    storage::migrate(&pool).await.unwrap();
    storage::seed::seed_defaults(&pool).await.unwrap();

    let classifier = engine::load_classifier(&pool, engine::stop_words(&cfg))
        .await
        .unwrap();

    let items = [
        "The computer is running new software",
        "Try this delicious recipe with fresh ingredients",
        "The weather is nice today",
    ];
    for item in items {
        let mut result = classifier.classify(item);
        result.item = item.to_string();
        storage::classifications::upsert(&pool, item, &result)
            .await
            .unwrap();
    }

    let tech = storage::classifications::get(&pool, items[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tech.category, "Technology");
    assert_eq!(tech.confidence, 0.5);
    assert_eq!(tech.matches, ["computer", "software"]);

    let food = storage::classifications::get(&pool, items[1])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(food.category, "Food and Cooking");
    assert!(food.confidence > 0.0);
    assert!(food.matches.contains(&"recipe".to_string()));

    let unknown = storage::classifications::get(&pool, items[2])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unknown.category, UNKNOWN_CATEGORY);
    assert_eq!(unknown.confidence, 0.0);
    assert!(unknown.matches.is_empty());

    assert_eq!(
        storage::classifications::list(&pool).await.unwrap().len(),
        3
    );
}

#[tokio::test]
async fn test_reclassifying_an_item_overwrites_its_result() {
    let cfg = AppConfig {
        database: DatabaseConfig {
            path: "sqlite://file:pipeline_rerun?mode=memory&cache=shared".to_string(),
        },
        ..AppConfig::default()
    };
    let pool = storage::connect(&cfg.database.path).await.unwrap();
    storage::migrate(&pool).await.unwrap();
    storage::seed::seed_defaults(&pool).await.unwrap();

    let item = "the new code and algorithm";
    let classifier = engine::load_classifier(&pool, engine::stop_words(&cfg))
        .await
        .unwrap();
    let mut result = classifier.classify(item);
    result.item = item.to_string();
    storage::classifications::upsert(&pool, item, &result)
        .await
        .unwrap();
    storage::classifications::upsert(&pool, item, &result)
        .await
        .unwrap();

    let all = storage::classifications::list(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].category, "Technology");
}

#[tokio::test]
async fn test_file_backed_database_is_created_on_demand() {
    let temp = tempdir().unwrap();
    let db_path = temp.path().join("data").join("lexiclass.db");

    let pool = storage::connect(&db_path.to_string_lossy()).await.unwrap();
    storage::migrate(&pool).await.unwrap();
    storage::seed::seed_defaults(&pool).await.unwrap();

    assert!(db_path.exists());
    assert_eq!(storage::categories::list(&pool).await.unwrap().len(), 2);
}
