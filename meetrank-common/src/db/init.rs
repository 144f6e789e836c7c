//! Database initialization
//!
//! Creates the database file on first run and the two tables the engine reads:
//! `meet_results` (append-only result log) and `national_records`.
//! Every statement is idempotent, so opening an existing database is safe.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the database at `db_path` and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL: readers see committed appends without waiting on the writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create all meetrank tables on an already open pool
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_meet_results_table(pool).await?;
    create_national_records_table(pool).await?;
    Ok(())
}

/// Result log; `id` order is ingestion order and rows are never updated
async fn create_meet_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meet_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT,
            last_name TEXT,
            category TEXT,
            gender TEXT,
            result TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_national_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS national_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT,
            gender TEXT,
            record TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
