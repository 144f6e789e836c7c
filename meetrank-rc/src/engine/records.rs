//! Typed records produced by normalization and consumed by every later stage

use serde::{Deserialize, Serialize};

use super::classifier::Tier;

/// Partition key: ranking, deduplication and joining never cross cohorts
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CohortKey {
    pub category: String,
    pub gender: String,
}

impl CohortKey {
    pub fn new(category: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            gender: gender.into(),
        }
    }

    /// Build a key from user-entered text, normalized like ingested rows
    pub fn normalized(category: &str, gender: &str) -> Self {
        Self::new(
            super::normalizer::title_case(category.trim()),
            super::normalizer::title_case(gender.trim()),
        )
    }
}

/// One measured performance after normalization (lower is better, seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub category: String,
    pub gender: String,
    pub result: f64,
}

impl ResultRecord {
    pub fn cohort(&self) -> CohortKey {
        CohortKey::new(self.category.clone(), self.gender.clone())
    }

    /// True when both records describe the same competitor in the same cohort
    pub fn same_competitor(&self, other: &ResultRecord) -> bool {
        self.full_name == other.full_name
            && self.category == other.category
            && self.gender == other.gender
    }
}

/// National benchmark for one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub category: String,
    pub gender: String,
    pub record: f64,
}

impl ReferenceRecord {
    pub fn cohort(&self) -> CohortKey {
        CohortKey::new(self.category.clone(), self.gender.clone())
    }
}

/// A best-mark record with its 1-based position in the full sorted cohort
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub rank: usize,
    pub record: ResultRecord,
}

/// Output row of the comparison table
///
/// Serialized field names are the column names of the comparison output.
/// Every record-derived field is `None` when the cohort has no national record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    #[serde(rename = "Rank", default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(rename = "Full_Name")]
    pub full_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Result")]
    pub result: f64,
    #[serde(rename = "Record")]
    pub record: Option<f64>,
    #[serde(rename = "Beats_Record")]
    pub beats_record: Option<bool>,
    #[serde(rename = "Diff_to_Record")]
    pub diff_to_record: Option<f64>,
    #[serde(rename = "%_Diff")]
    pub percent_diff: Option<f64>,
    #[serde(rename = "Within_1.5%")]
    pub within_1_5: Option<bool>,
    #[serde(rename = "Within_3.0%")]
    pub within_3_0: Option<bool>,
    #[serde(rename = "Tier")]
    pub tier: Option<Tier>,
}

impl ComparisonRow {
    pub fn cohort(&self) -> CohortKey {
        CohortKey::new(self.category.clone(), self.gender.clone())
    }
}
