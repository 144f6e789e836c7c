//! Tests for database creation on first run

use meetrank_common::db::init::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("meetrank.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_reopen_keeps_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("meetrank.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query(
        "INSERT INTO national_records (category, gender, record) VALUES ('U12', 'Female', '11.00')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    // Open database second time (should succeed and keep data)
    let pool = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM national_records")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(count, 1);
}
