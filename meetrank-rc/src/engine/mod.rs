//! Ranking & Record-Comparison Engine
//!
//! Pipeline, leaf-first:
//! raw rows → [`normalizer`] → [`deduplicator`] → [`ranker`] → [`joiner`]
//! (+ [`classifier`]) → [`ComparisonTable`].
//!
//! Every stage is a pure function over its own copy of the data, so the
//! engine is safe to share between request handlers. Only
//! [`ComparisonEngine::incorporate`] touches a store, and it requires
//! exclusive access to it.

pub mod classifier;
pub mod deduplicator;
pub mod incorporator;
pub mod joiner;
pub mod normalizer;
pub mod query;
pub mod ranker;
pub mod records;

pub use classifier::{GapMetrics, Tier};
pub use incorporator::{IncorporateError, LiveRanking, Submission, SubmissionConfirmation, SubmissionError};
pub use query::{CohortOptions, ComparisonTable};
pub use records::{CohortKey, ComparisonRow, RankedResult, ReferenceRecord, ResultRecord};

use meetrank_common::config::DEFAULT_TOP_N;
use meetrank_common::{Error, RawReferenceRow, RawResultRow, Result};
use tracing::debug;

use self::joiner::{join_ranked, ReferenceIndex};

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Ranked competitors kept per cohort
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

impl EngineConfig {
    pub fn with_top_n(top_n: usize) -> Result<Self> {
        if top_n == 0 {
            return Err(Error::Config("top_n must be at least 1".to_string()));
        }
        Ok(Self { top_n })
    }
}

/// Stateless comparison engine
#[derive(Debug, Clone, Default)]
pub struct ComparisonEngine {
    config: EngineConfig,
}

impl ComparisonEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn top_n(&self) -> usize {
        self.config.top_n
    }

    /// Run the bulk pipeline over a result table and a national record table
    ///
    /// Rows come out ordered by (category, gender, result), each with its
    /// cohort rank. Cohorts without qualifying results do not appear.
    pub fn compare(&self, results: &[RawResultRow], references: &[RawReferenceRow]) -> ComparisonTable {
        let (records, _) = normalizer::normalize_results(results);
        let (national, _) = normalizer::normalize_references(references);

        let best = deduplicator::best_marks(&records);
        let ranked = ranker::rank_cohorts(&best, self.config.top_n);
        let index = ReferenceIndex::build(&national);

        let rows: Vec<ComparisonRow> = ranked
            .values()
            .flat_map(|cohort| join_ranked(cohort, &index))
            .collect();

        debug!(
            competitors = best.len(),
            cohorts = ranked.len(),
            rows = rows.len(),
            "Built comparison table"
        );

        ComparisonTable::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_top_n_rejected() {
        assert!(EngineConfig::with_top_n(0).is_err());
        assert_eq!(EngineConfig::with_top_n(3).unwrap().top_n, 3);
        assert_eq!(EngineConfig::default().top_n, 6);
    }

    #[test]
    fn test_compare_orders_by_cohort_then_result() {
        let results = vec![
            RawResultRow::new("Cy", "Ode", "U14", "male", "13.1"),
            RawResultRow::new("Al", "Bee", "u12", "Female", "11.4"),
            RawResultRow::new("Di", "Fay", "U12", "female", "11.2"),
            RawResultRow::new("Ed", "Gil", "U12", "Male", "12.0"),
        ];
        let references = vec![RawReferenceRow::new("U12", "Female", "11.0")];

        let table = ComparisonEngine::default().compare(&results, &references);
        let order: Vec<(&str, &str, f64)> = table
            .rows()
            .iter()
            .map(|r| (r.category.as_str(), r.gender.as_str(), r.result))
            .collect();

        assert_eq!(
            order,
            vec![
                ("U12", "Female", 11.2),
                ("U12", "Female", 11.4),
                ("U12", "Male", 12.0),
                ("U14", "Male", 13.1),
            ]
        );
        assert_eq!(table.rows()[1].rank, Some(2));
        assert!(table.rows()[2].record.is_none());
    }

    #[test]
    fn test_compare_deduplicates_before_ranking() {
        let results = vec![
            RawResultRow::new("Al", "Bee", "U12", "Female", 11.4),
            RawResultRow::new("Al", "Bee", "U12", "Female", 11.1),
            RawResultRow::new("Di", "Fay", "U12", "Female", 11.2),
        ];

        let table = ComparisonEngine::default().compare(&results, &[]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].full_name, "Al Bee");
        assert_eq!(table.rows()[0].result, 11.1);
    }

    #[test]
    fn test_compare_empty_inputs() {
        let table = ComparisonEngine::default().compare(&[], &[]);
        assert!(table.is_empty());
    }
}
