//! Deduplicator: one best (lowest) mark per competitor per cohort
//!
//! Stored history is never rewritten; the best mark is resolved here at read time.

use std::collections::HashSet;

use super::records::ResultRecord;

/// Keep each competitor's best mark
///
/// Competitors are keyed by (category, gender, full name). Output is sorted
/// ascending by result; equal results keep their ingestion order, and for a
/// competitor with tied best marks the earliest one wins.
pub fn best_marks(records: &[ResultRecord]) -> Vec<ResultRecord> {
    let mut sorted = records.to_vec();
    // Vec::sort_by is stable
    sorted.sort_by(|a, b| a.result.total_cmp(&b.result));

    let mut seen: HashSet<(String, String, String)> = HashSet::with_capacity(sorted.len());
    sorted.retain(|r| seen.insert((r.category.clone(), r.gender.clone(), r.full_name.clone())));

    sorted
}
