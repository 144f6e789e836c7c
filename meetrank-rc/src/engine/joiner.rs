//! Record Joiner: attach each cohort's national record to its ranked rows
//!
//! Left join on (category, gender). A cohort with no record keeps its rows,
//! with every record-derived field absent.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::warn;

use super::classifier::measure_gap;
use super::records::{CohortKey, ComparisonRow, RankedResult, ReferenceRecord, ResultRecord};

/// National records indexed by cohort
///
/// When a cohort appears more than once in the source, the first record
/// encountered wins and later ones are ignored with a warning.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    records: HashMap<CohortKey, f64>,
}

impl ReferenceIndex {
    pub fn build(references: &[ReferenceRecord]) -> Self {
        let mut records = HashMap::with_capacity(references.len());

        for reference in references {
            match records.entry(reference.cohort()) {
                Entry::Vacant(slot) => {
                    slot.insert(reference.record);
                }
                Entry::Occupied(existing) => {
                    warn!(
                        category = %reference.category,
                        gender = %reference.gender,
                        kept = *existing.get(),
                        ignored = reference.record,
                        "Duplicate national record for cohort, keeping the first"
                    );
                }
            }
        }

        Self { records }
    }

    pub fn get(&self, key: &CohortKey) -> Option<f64> {
        self.records.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build a comparison row for one record, classified against `record` if present
pub fn compare_record(record: &ResultRecord, rank: Option<usize>, national: Option<f64>) -> ComparisonRow {
    let gap = national.map(|n| measure_gap(record.result, n));

    ComparisonRow {
        rank,
        full_name: record.full_name.clone(),
        category: record.category.clone(),
        gender: record.gender.clone(),
        result: record.result,
        record: national,
        beats_record: gap.map(|g| g.beats_record),
        diff_to_record: gap.map(|g| g.diff_to_record),
        percent_diff: gap.map(|g| g.percent_diff),
        within_1_5: gap.map(|g| g.within_1_5),
        within_3_0: gap.map(|g| g.within_3_0),
        tier: gap.map(|g| g.tier),
    }
}

/// Join ranked rows against the index, preserving their order
pub fn join_ranked(ranked: &[RankedResult], index: &ReferenceIndex) -> Vec<ComparisonRow> {
    ranked
        .iter()
        .map(|r| compare_record(&r.record, Some(r.rank), index.get(&r.record.cohort())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifier::Tier;

    fn reference(category: &str, gender: &str, record: f64) -> ReferenceRecord {
        ReferenceRecord {
            category: category.to_string(),
            gender: gender.to_string(),
            record,
        }
    }

    fn ranked(name: &str, category: &str, result: f64, rank: usize) -> RankedResult {
        RankedResult {
            rank,
            record: ResultRecord {
                first_name: name.to_string(),
                last_name: "Test".to_string(),
                full_name: format!("{} Test", name),
                category: category.to_string(),
                gender: "Female".to_string(),
                result,
            },
        }
    }

    #[test]
    fn test_first_duplicate_reference_wins() {
        let index = ReferenceIndex::build(&[
            reference("U12", "Female", 11.0),
            reference("U12", "Female", 10.0),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&CohortKey::new("U12", "Female")), Some(11.0));
    }

    #[test]
    fn test_join_classifies_matched_rows() {
        let index = ReferenceIndex::build(&[reference("U12", "Female", 11.0)]);
        let rows = join_ranked(&[ranked("Alice", "U12", 11.25, 1)], &index);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, Some(1));
        assert_eq!(rows[0].record, Some(11.0));
        assert_eq!(rows[0].beats_record, Some(false));
        assert_eq!(rows[0].tier, Some(Tier::Yellow));
    }

    #[test]
    fn test_unmatched_cohort_has_absent_fields() {
        let index = ReferenceIndex::build(&[reference("U14", "Female", 12.0)]);
        let rows = join_ranked(&[ranked("Alice", "U12", 11.25, 1)], &index);

        let row = &rows[0];
        assert_eq!(row.result, 11.25);
        assert!(row.record.is_none());
        assert!(row.beats_record.is_none());
        assert!(row.diff_to_record.is_none());
        assert!(row.percent_diff.is_none());
        assert!(row.within_1_5.is_none());
        assert!(row.within_3_0.is_none());
        assert!(row.tier.is_none());
    }

    #[test]
    fn test_join_preserves_order() {
        let index = ReferenceIndex::default();
        let rows = join_ranked(
            &[ranked("B", "U12", 10.0, 1), ranked("A", "U12", 11.0, 2)],
            &index,
        );

        let names: Vec<&str> = rows.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["B Test", "A Test"]);
    }
}
