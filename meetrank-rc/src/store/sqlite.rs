//! SQLite-backed store and source
//!
//! Cells are stored as TEXT exactly as received; typing happens in the
//! normalizer on every read. `meet_results.id` order is ingestion order.

use async_trait::async_trait;
use meetrank_common::{CellValue, RawReferenceRow, RawResultRow, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::{ReferenceSource, ResultStore};

type ResultTuple = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn cell(text: Option<String>) -> Option<CellValue> {
    text.map(CellValue::Text)
}

/// Result store over the `meet_results` table
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    pool: SqlitePool,
}

impl SqliteResultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meet_results")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn read_all(&mut self) -> Result<Vec<RawResultRow>> {
        let rows = sqlx::query_as::<_, ResultTuple>(
            r#"
            SELECT first_name, last_name, category, gender, result
            FROM meet_results
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(first_name, last_name, category, gender, result)| RawResultRow {
                first_name: cell(first_name),
                last_name: cell(last_name),
                category: cell(category),
                gender: cell(gender),
                result: cell(result),
            })
            .collect())
    }

    async fn append(&mut self, row: RawResultRow) -> Result<()> {
        insert_result(&self.pool, &row).await
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

async fn insert_result<'e, E>(executor: E, row: &RawResultRow) -> Result<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let [first_name, last_name, category, gender, result] = row.text_cells();

    sqlx::query(
        "INSERT INTO meet_results (first_name, last_name, category, gender, result) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(category)
    .bind(gender)
    .bind(result)
    .execute(executor)
    .await?;

    Ok(())
}

/// National record source over the `national_records` table
#[derive(Debug, Clone)]
pub struct SqliteReferenceSource {
    pool: SqlitePool,
}

impl SqliteReferenceSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceSource for SqliteReferenceSource {
    async fn read_references(&self) -> Result<Vec<RawReferenceRow>> {
        let rows = sqlx::query_as::<_, (Option<String>, Option<String>, Option<String>)>(
            "SELECT category, gender, record FROM national_records ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, gender, record)| RawReferenceRow {
                category: cell(category),
                gender: cell(gender),
                record: cell(record),
            })
            .collect())
    }
}

/// Replace the national record table with `rows`, atomically
pub async fn import_references(pool: &SqlitePool, rows: &[RawReferenceRow]) -> Result<usize> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM national_records")
        .execute(&mut *tx)
        .await?;

    for row in rows {
        let [category, gender, record] = row.text_cells();
        sqlx::query("INSERT INTO national_records (category, gender, record) VALUES (?, ?, ?)")
            .bind(category)
            .bind(gender)
            .bind(record)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!("Imported {} national record rows", rows.len());
    Ok(rows.len())
}

/// Seed the result log with `rows`
///
/// Results are append-only, so seeding only happens into an empty table;
/// a non-empty table is left untouched and 0 is returned.
pub async fn import_results(pool: &SqlitePool, rows: &[RawResultRow]) -> Result<usize> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meet_results")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        info!("Result table already holds {} rows, skipping import", existing);
        return Ok(0);
    }

    for row in rows {
        insert_result(&mut *tx, row).await?;
    }

    tx.commit().await?;
    info!("Imported {} result rows", rows.len());
    Ok(rows.len())
}
