//! Persisted result store and national record sources
//!
//! The result store is append-only: prior rows are never rewritten. Exclusive
//! access is expressed through `&mut self`; the request layer shares a store as
//! [`SharedResultStore`] and holds the mutex guard for the whole
//! append-then-recompute of one submission.

pub mod csv_file;
pub mod memory;
pub mod sqlite;

pub use csv_file::{CsvReferenceSource, CsvResultStore};
pub use memory::{MemoryReferenceSource, MemoryResultStore};
pub use sqlite::{import_references, import_results, SqliteReferenceSource, SqliteResultStore};

use async_trait::async_trait;
use meetrank_common::{RawReferenceRow, RawResultRow, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Append-only table of raw result rows
#[async_trait]
pub trait ResultStore: Send {
    /// Every stored row, in ingestion order
    async fn read_all(&mut self) -> Result<Vec<RawResultRow>>;

    /// Add one row after all existing rows
    async fn append(&mut self, row: RawResultRow) -> Result<()>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// Read-only national record table
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn read_references(&self) -> Result<Vec<RawReferenceRow>>;
}

/// Result store behind the single submission lock
pub type SharedResultStore = Arc<Mutex<Box<dyn ResultStore>>>;

/// Wrap a store for sharing between request handlers
pub fn shared<S: ResultStore + 'static>(store: S) -> SharedResultStore {
    Arc::new(Mutex::new(Box::new(store)))
}
