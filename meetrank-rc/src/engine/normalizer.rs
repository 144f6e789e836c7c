//! Normalizer: raw tabular rows into typed records
//!
//! Lenient by policy: a row that cannot be typed is dropped and counted,
//! never reported as an error, so one bad row never halts ingestion.

use meetrank_common::{CellValue, Coerced, RawReferenceRow, RawResultRow};
use tracing::debug;

use super::records::{ReferenceRecord, ResultRecord};

/// Counts from one normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub kept: usize,
    pub discarded: usize,
}

/// Title-case with word-boundary semantics
///
/// A letter is upper-cased when the preceding character is not a letter,
/// otherwise lower-cased: "u12" -> "U12", "under-12 BOYS" -> "Under-12 Boys".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

/// Trimmed text of a cell, `None` when missing or blank
fn trimmed_text(cell: Option<&CellValue>) -> Option<String> {
    let text = cell?.as_text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trimmed, title-cased cohort text
fn cohort_text(cell: Option<&CellValue>) -> Option<String> {
    trimmed_text(cell).map(|t| title_case(&t))
}

fn coerce(cell: Option<&CellValue>) -> Coerced {
    cell.map(CellValue::coerce_number).unwrap_or(Coerced::Discard)
}

/// Normalize one result row, `None` if it must be discarded
pub fn normalize_result_row(row: &RawResultRow) -> Option<ResultRecord> {
    let result = coerce(row.result.as_ref()).value()?;
    let first_name = trimmed_text(row.first_name.as_ref())?;
    let last_name = trimmed_text(row.last_name.as_ref())?;
    let category = cohort_text(row.category.as_ref())?;
    let gender = cohort_text(row.gender.as_ref())?;

    Some(ResultRecord {
        full_name: format!("{} {}", first_name, last_name),
        first_name,
        last_name,
        category,
        gender,
        result,
    })
}

/// Normalize one reference row, `None` if it must be discarded
///
/// A zero record is discarded too: it cannot be a relative baseline.
pub fn normalize_reference_row(row: &RawReferenceRow) -> Option<ReferenceRecord> {
    let record = coerce(row.record.as_ref()).value().filter(|r| *r > 0.0)?;
    let category = cohort_text(row.category.as_ref())?;
    let gender = cohort_text(row.gender.as_ref())?;

    Some(ReferenceRecord {
        category,
        gender,
        record,
    })
}

/// Normalize a result table, preserving input order of kept rows
pub fn normalize_results(rows: &[RawResultRow]) -> (Vec<ResultRecord>, NormalizeReport) {
    let records: Vec<ResultRecord> = rows.iter().filter_map(normalize_result_row).collect();
    let report = NormalizeReport {
        kept: records.len(),
        discarded: rows.len() - records.len(),
    };

    debug!(kept = report.kept, discarded = report.discarded, "Normalized result rows");
    (records, report)
}

/// Normalize a national record table, preserving input order of kept rows
pub fn normalize_references(rows: &[RawReferenceRow]) -> (Vec<ReferenceRecord>, NormalizeReport) {
    let records: Vec<ReferenceRecord> = rows.iter().filter_map(normalize_reference_row).collect();
    let report = NormalizeReport {
        kept: records.len(),
        discarded: rows.len() - records.len(),
    };

    debug!(kept = report.kept, discarded = report.discarded, "Normalized reference rows");
    (records, report)
}
