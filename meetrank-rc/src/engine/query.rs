//! Read-side views over a comparison table

use serde::Serialize;
use std::collections::BTreeSet;

use super::records::{CohortKey, ComparisonRow};

/// Distinct cohort values present in a table, sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortOptions {
    pub categories: Vec<String>,
    pub genders: Vec<String>,
}

/// Ranked, classified comparison rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn new(rows: Vec<ComparisonRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn categories(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn genders(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.gender.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn options(&self) -> CohortOptions {
        CohortOptions {
            categories: self.categories(),
            genders: self.genders(),
        }
    }

    /// Rows of one cohort in rank order
    pub fn cohort(&self, key: &CohortKey) -> Vec<ComparisonRow> {
        self.rows
            .iter()
            .filter(|r| r.category == key.category && r.gender == key.gender)
            .cloned()
            .collect()
    }

    /// Rows of one cohort ordered by percent difference, closest first
    ///
    /// Query text is normalized like ingested text. Rows without a percent
    /// difference go last, in rank order. An unknown cohort yields nothing.
    pub fn cohort_view(&self, category: &str, gender: &str) -> Vec<ComparisonRow> {
        let mut rows = self.cohort(&CohortKey::normalized(category, gender));
        rows.sort_by(|a, b| match (a.percent_diff, b.percent_diff) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        rows
    }
}
