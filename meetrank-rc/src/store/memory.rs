//! In-memory store and source

use async_trait::async_trait;
use meetrank_common::{RawReferenceRow, RawResultRow, Result};

use super::{ReferenceSource, ResultStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryResultStore {
    rows: Vec<RawResultRow>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<RawResultRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RawResultRow] {
        &self.rows
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn read_all(&mut self) -> Result<Vec<RawResultRow>> {
        Ok(self.rows.clone())
    }

    async fn append(&mut self, row: RawResultRow) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryReferenceSource {
    rows: Vec<RawReferenceRow>,
}

impl MemoryReferenceSource {
    pub fn new(rows: Vec<RawReferenceRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl ReferenceSource for MemoryReferenceSource {
    async fn read_references(&self) -> Result<Vec<RawReferenceRow>> {
        Ok(self.rows.clone())
    }
}
