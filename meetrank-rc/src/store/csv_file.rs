//! Delimited table files (the meet's spreadsheet exports)
//!
//! Header names are matched after trimming, so `" Result "` still maps to the
//! `Result` column. Columns are located by name, not position; extra columns
//! are ignored on read. An empty cell reads as a missing cell.
//!
//! Appends read the whole file, keep its bytes as they are, add one record
//! laid out under the file's own header (blank cells for columns this store
//! does not know), and write the result through a sibling temporary file that
//! is renamed over the original. A failed write never leaves a truncated
//! table behind, and extra columns such as a club name survive.

use async_trait::async_trait;
use meetrank_common::models::{REFERENCE_COLUMNS, RESULT_COLUMNS};
use meetrank_common::{CellValue, Error, RawReferenceRow, RawResultRow, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ReferenceSource, ResultStore};

/// Read `columns` from every data row; a missing file is an I/O error
fn read_table<const N: usize>(path: &Path, columns: [&str; N]) -> Result<Vec<[Option<CellValue>; N]>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let positions: [Option<usize>; N] = columns.map(|name| headers.iter().position(|h| h == name));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = positions.map(|pos| {
            pos.and_then(|i| record.get(i))
                .filter(|text| !text.is_empty())
                .map(|text| CellValue::Text(text.to_string()))
        });
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "Read table file");
    Ok(rows)
}

/// Encode one record, terminated with `\r\n` when `crlf` is set
fn encode_record<I, T>(cells: I, crlf: bool) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let terminator = if crlf {
        csv::Terminator::CRLF
    } else {
        csv::Terminator::Any(b'\n')
    };
    let mut writer = csv::WriterBuilder::new()
        .terminator(terminator)
        .from_writer(Vec::new());
    writer.write_record(cells)?;
    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("Table record encoding failed: {}", e)))
}

/// Append one result row to the table at `path`, creating it if needed
fn append_result(path: &Path, row: &RawResultRow) -> Result<()> {
    let cells = row.text_cells();
    let cell_text = |cell: &Option<String>| cell.clone().unwrap_or_default();

    let mut content = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if content.iter().all(u8::is_ascii_whitespace) {
        content = encode_record(RESULT_COLUMNS, false)?;
        content.extend(encode_record(cells.iter().map(cell_text), false)?);
    } else {
        let crlf = content.windows(2).any(|w| w == b"\r\n");
        let headers = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(content.as_slice())
            .headers()?
            .clone();

        let mut record = vec![String::new(); headers.len()];
        for (name, cell) in RESULT_COLUMNS.iter().zip(cells.iter()) {
            let position = headers.iter().position(|h| h == *name).ok_or_else(|| {
                Error::Config(format!("Table {} has no {} column", path.display(), name))
            })?;
            record[position] = cell_text(cell);
        }

        if !content.ends_with(b"\n") {
            content.extend_from_slice(if crlf { b"\r\n" } else { b"\n" });
        }
        content.extend(encode_record(&record, crlf)?);
    }

    let tmp_path = temp_path_for(path);
    std::fs::write(&tmp_path, &content)?;
    std::fs::rename(&tmp_path, path)?;

    debug!(path = %path.display(), bytes = content.len(), "Appended result to table file");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Run blocking file work off the async runtime
async fn blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Internal(format!("Table file task failed: {}", e)))?
}

fn read_results(path: &Path) -> Result<Vec<RawResultRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    Ok(read_table(path, RESULT_COLUMNS)?
        .into_iter()
        .map(|[first_name, last_name, category, gender, result]| RawResultRow {
            first_name,
            last_name,
            category,
            gender,
            result,
        })
        .collect())
}

/// Result store backed by one table file
///
/// A file that does not exist yet is an empty store; the first append creates it.
#[derive(Debug, Clone)]
pub struct CsvResultStore {
    path: PathBuf,
}

impl CsvResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the result table at `path` without opening a store
    pub async fn load(path: impl Into<PathBuf>) -> Result<Vec<RawResultRow>> {
        let path = path.into();
        blocking(move || read_results(&path)).await
    }
}

#[async_trait]
impl ResultStore for CsvResultStore {
    async fn read_all(&mut self) -> Result<Vec<RawResultRow>> {
        Self::load(self.path.clone()).await
    }

    async fn append(&mut self, row: RawResultRow) -> Result<()> {
        let path = self.path.clone();
        blocking(move || append_result(&path, &row)).await
    }

    fn backend(&self) -> &'static str {
        "csv"
    }
}

/// National record source backed by one table file
#[derive(Debug, Clone)]
pub struct CsvReferenceSource {
    path: PathBuf,
}

impl CsvReferenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReferenceSource for CsvReferenceSource {
    async fn read_references(&self) -> Result<Vec<RawReferenceRow>> {
        let path = self.path.clone();
        blocking(move || {
            Ok(read_table(&path, REFERENCE_COLUMNS)?
                .into_iter()
                .map(|[category, gender, record]| RawReferenceRow {
                    category,
                    gender,
                    record,
                })
                .collect())
        })
        .await
    }
}
