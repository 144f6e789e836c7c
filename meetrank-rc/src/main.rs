//! meetrank-rc (Record Comparison) - meet results vs national records
//!
//! Serves the ranked comparison table and accepts live result submissions.
//!
//! Storage: results live in `<root>/meetrank.db` unless `--results-csv` names
//! a table file, in which case that file is the persisted store. With
//! `--import`, the given table files seed the database instead.

use anyhow::{Context, Result};
use clap::Parser;
use meetrank_common::config::{
    CompiledDefaults, LoggingConfig, RootFolderInitializer, RootFolderResolver,
};
use meetrank_common::db::init_database;
use meetrank_rc::engine::{ComparisonEngine, EngineConfig};
use meetrank_rc::store::{
    self, import_references, import_results, CsvReferenceSource, CsvResultStore, ReferenceSource,
    SharedResultStore, SqliteReferenceSource, SqliteResultStore,
};
use meetrank_rc::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MODULE_NAME: &str = "meetrank-rc";

#[derive(Parser, Debug)]
#[command(name = "meetrank-rc", version, about = "Rank meet results against national records")]
struct Args {
    /// Root folder holding meetrank.db
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Listen address (default 127.0.0.1:8054)
    #[arg(long)]
    bind: Option<String>,

    /// Ranked competitors shown per cohort (default 6)
    #[arg(long)]
    top_n: Option<usize>,

    /// Result table file (First_Name, Last_Name, Category, Gender, Result)
    #[arg(long)]
    results_csv: Option<PathBuf>,

    /// National record table file (Category, Gender, Record)
    #[arg(long)]
    records_csv: Option<PathBuf>,

    /// Copy the table files into the database and serve from the database
    #[arg(long)]
    import: bool,
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = RootFolderResolver::new(MODULE_NAME).with_cli_arg(args.root_folder.clone());
    let config = resolver.load_config();

    init_tracing(&config.logging)?;

    info!(
        "Starting meetrank Record Comparison ({}) v{}",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION")
    );

    let defaults = CompiledDefaults::for_current_platform();

    let initializer = RootFolderInitializer::new(resolver.resolve());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    let top_n = args.top_n.or(config.top_n).unwrap_or(defaults.top_n);
    let engine = ComparisonEngine::new(EngineConfig::with_top_n(top_n)?);
    info!("Ranking top {} per cohort", engine.top_n());

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path).await?;

    let results_csv = args.results_csv.or(config.results_file);
    let records_csv = args.records_csv.or(config.records_file);

    if args.import {
        if let Some(path) = &results_csv {
            let rows = CsvResultStore::load(path.clone()).await?;
            import_results(&pool, &rows).await?;
        }
        if let Some(path) = &records_csv {
            let rows = CsvReferenceSource::new(path.clone()).read_references().await?;
            import_references(&pool, &rows).await?;
        }
    }

    let results: SharedResultStore = match &results_csv {
        Some(path) if !args.import => {
            let csv_store = CsvResultStore::new(path.clone());
            info!("Result store: {}", csv_store.path().display());
            store::shared(csv_store)
        }
        _ => store::shared(SqliteResultStore::new(pool.clone())),
    };

    let references: Arc<dyn ReferenceSource> = match &records_csv {
        Some(path) if !args.import => {
            info!("National records: {}", path.display());
            Arc::new(CsvReferenceSource::new(path.clone()))
        }
        _ => Arc::new(SqliteReferenceSource::new(pool.clone())),
    };

    let state = AppState::new(engine, results, references);
    let app = build_router(state);

    let bind = args
        .bind
        .or(config.bind_address)
        .unwrap_or(defaults.bind_address);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("meetrank-rc listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
