use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cli::{engine, server};
use lexiclass_core::config;
use lexiclass_core::config::AppConfig;
use lexiclass_core::models::{Category, CategoryBatch, ResultBatch};
use lexiclass_core::taxonomy::Taxonomy;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => server::run(cfg, bind).await,
        Commands::Classify { items, json } => run_classify(cfg, items, json).await,
        Commands::Categories { command } => match command {
            CategoryCommands::List { json } => run_category_list(cfg, json).await,
            CategoryCommands::Get { name } => run_category_get(cfg, name).await,
            CategoryCommands::Add { file } => run_category_add(cfg, file).await,
        },
        Commands::Seed => run_seed(cfg).await,
    }
}

#[derive(Parser)]
#[command(name = "lexiclass")]
#[command(about = "Rule-based text classification service", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Classify items and persist the results
    Classify {
        /// Items to classify
        #[arg(required = true)]
        items: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect and load category definitions
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Install the default categories
    Seed,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List stored categories
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one category as JSON
    Get { name: String },
    /// Load category definitions from a JSON file (array of categories)
    Add { file: PathBuf },
}

async fn open(cfg: &AppConfig) -> Result<sqlx::SqlitePool> {
    let pool = storage::connect(&cfg.database.path)
        .await
        .context("db connect")?;
    storage::migrate(&pool).await.context("db migrate")?;
    Ok(pool)
}

async fn run_classify(cfg: AppConfig, items: Vec<String>, json: bool) -> Result<()> {
    let pool = open(&cfg).await?;
    let classifier = engine::load_classifier(&pool, engine::stop_words(&cfg)).await?;

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let mut result = classifier.classify(&item);
        result.item = item;
        storage::classifications::upsert(&pool, &result.item, &result).await?;
        results.push(result);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ResultBatch { results })?);
    } else {
        for result in &results {
            println!(
                "{} -> {} ({:.3}) [{}]",
                result.item,
                result.category,
                result.confidence,
                result.matches.join(", ")
            );
        }
    }
    Ok(())
}

async fn run_category_list(cfg: AppConfig, json: bool) -> Result<()> {
    let pool = open(&cfg).await?;
    let categories = storage::categories::list(&pool).await?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&CategoryBatch { categories })?
        );
    } else {
        for category in &categories {
            println!(
                "{}: {} keywords, {} phrases, {} contexts, {} excluders",
                category.name,
                category.keywords.len(),
                category.phrases.len(),
                category.contexts.len(),
                category.excluders.len()
            );
        }
    }
    Ok(())
}

async fn run_category_get(cfg: AppConfig, name: String) -> Result<()> {
    let pool = open(&cfg).await?;
    match storage::categories::get(&pool, &name).await? {
        Some(category) => {
            println!("{}", serde_json::to_string_pretty(&category)?);
            Ok(())
        }
        None => bail!("category not found: {name}"),
    }
}

async fn run_category_add(cfg: AppConfig, file: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("read {}", file.display()))?;
    let categories: Vec<Category> =
        serde_json::from_str(&content).context("parse category definitions")?;
    Taxonomy::new(categories.clone()).context("invalid category definitions")?;

    let pool = open(&cfg).await?;
    for category in &categories {
        storage::categories::upsert(&pool, category).await?;
    }
    println!("stored {} categories", categories.len());
    Ok(())
}

async fn run_seed(cfg: AppConfig) -> Result<()> {
    let pool = open(&cfg).await?;
    storage::seed::seed_defaults(&pool).await?;
    println!("seeded default categories");
    Ok(())
}
