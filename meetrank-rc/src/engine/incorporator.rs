//! Live Incorporator: one new submission into the store and a fresh cohort view
//!
//! Sequence for a valid submission:
//! 1. validate (no store access on failure)
//! 2. append the raw row to the store
//! 3. re-read the whole store and rerun normalize → best marks → rank for the
//!    submitter's cohort
//! 4. return the top-N plus, if needed, the submitter's own row appended
//!    after them (overflow entry, not re-sorted)
//!
//! The caller must hold exclusive access to the store for the whole call; the
//! `&mut` receiver on the store enforces that.

use chrono::{DateTime, Utc};
use meetrank_common::{CellValue, Error, RawReferenceRow, RawResultRow};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::deduplicator::best_marks;
use super::joiner::{join_ranked, ReferenceIndex};
use super::normalizer::{normalize_references, normalize_result_row, normalize_results};
use super::ranker::rank_cohort;
use super::records::{ComparisonRow, ResultRecord};
use super::ComparisonEngine;
use crate::store::ResultStore;

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Result is not a valid time: {0:?}")]
    UnparsableResult(String),

    /// Body could not be read as a submission at all
    #[error("Malformed submission: {0}")]
    Malformed(String),
}

/// Failure of one incorporation
#[derive(Debug, Error)]
pub enum IncorporateError {
    /// Submission refused before any store access
    #[error(transparent)]
    Validation(#[from] SubmissionError),

    /// Store read or append failed
    #[error(transparent)]
    Store(#[from] Error),
}

/// A result as entered by a user; every field is required
///
/// Cells are untyped like any other table row, so a numeric name is accepted
/// and read through its text form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "First_Name", alias = "first_name", default)]
    pub first_name: Option<CellValue>,
    #[serde(rename = "Last_Name", alias = "last_name", default)]
    pub last_name: Option<CellValue>,
    #[serde(rename = "Category", alias = "category", default)]
    pub category: Option<CellValue>,
    #[serde(rename = "Gender", alias = "gender", default)]
    pub gender: Option<CellValue>,
    #[serde(rename = "Result", alias = "result", default)]
    pub result: Option<CellValue>,
}

fn required(value: &Option<CellValue>, field: &'static str) -> Result<String, SubmissionError> {
    let text = value.as_ref().map(CellValue::as_text).unwrap_or_default();
    match text.trim() {
        "" => Err(SubmissionError::MissingField(field)),
        trimmed => Ok(trimmed.to_string()),
    }
}

impl Submission {
    pub fn new(
        first_name: &str,
        last_name: &str,
        category: &str,
        gender: &str,
        result: impl Into<CellValue>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            category: Some(category.into()),
            gender: Some(gender.into()),
            result: Some(result.into()),
        }
    }

    /// Check the submission and build the row that will be stored
    ///
    /// Returns the raw row together with its normalized form.
    pub fn validate(&self) -> Result<(RawResultRow, ResultRecord), SubmissionError> {
        let first_name = required(&self.first_name, "First_Name")?;
        let last_name = required(&self.last_name, "Last_Name")?;
        let category = required(&self.category, "Category")?;
        let gender = required(&self.gender, "Gender")?;

        let result = match &self.result {
            Some(CellValue::Text(text)) if text.trim().is_empty() => {
                return Err(SubmissionError::MissingField("Result"))
            }
            Some(cell) => cell.clone(),
            None => return Err(SubmissionError::MissingField("Result")),
        };

        let row = RawResultRow::new(first_name, last_name, category, gender, result.clone());
        let record = normalize_result_row(&row)
            .ok_or_else(|| SubmissionError::UnparsableResult(result.as_text()))?;

        Ok((row, record))
    }
}

/// Confirmation returned to the submitter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionConfirmation {
    pub full_name: String,
    pub category: String,
    pub gender: String,
    /// The time just submitted (not necessarily the competitor's best)
    pub result: f64,
    /// 1-based position of the competitor's best mark in the full cohort
    pub rank: usize,
    /// Distinct competitors in the cohort
    pub cohort_size: usize,
    pub recorded_at: DateTime<Utc>,
}

/// Cohort view after a submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveRanking {
    /// Top-N rows, then the submitter's row if it ranks below N
    pub rows: Vec<ComparisonRow>,
    pub confirmation: SubmissionConfirmation,
}

impl LiveRanking {
    /// True when the submitter's row was appended after the top-N
    pub fn is_overflow(&self, top_n: usize) -> bool {
        self.confirmation.rank > top_n
    }
}

impl ComparisonEngine {
    /// Append a submission to `store` and rank the submitter's cohort
    ///
    /// On validation failure the store is not touched.
    pub async fn incorporate<S>(
        &self,
        store: &mut S,
        references: &[RawReferenceRow],
        submission: &Submission,
    ) -> Result<LiveRanking, IncorporateError>
    where
        S: ResultStore + ?Sized,
    {
        let (row, submitted) = submission.validate().map_err(|e| {
            warn!("Rejected submission: {}", e);
            e
        })?;

        store.append(row).await?;
        let stored = store.read_all().await?;

        let (records, _) = normalize_results(&stored);
        let cohort_key = submitted.cohort();
        let cohort: Vec<ResultRecord> = best_marks(&records)
            .into_iter()
            .filter(|r| r.cohort() == cohort_key)
            .collect();
        let ranked = rank_cohort(&cohort);

        let position = ranked
            .iter()
            .position(|r| r.record.same_competitor(&submitted))
            .ok_or_else(|| {
                Error::Internal(format!(
                    "Submitted row for {} missing after append to {} store",
                    submitted.full_name,
                    store.backend()
                ))
            })?;

        let top_n = self.top_n();
        let mut view = ranked[..ranked.len().min(top_n)].to_vec();
        if position >= top_n {
            view.push(ranked[position].clone());
        }

        let (national, _) = normalize_references(references);
        let index = ReferenceIndex::build(&national);

        let confirmation = SubmissionConfirmation {
            full_name: submitted.full_name.clone(),
            category: submitted.category.clone(),
            gender: submitted.gender.clone(),
            result: submitted.result,
            rank: position + 1,
            cohort_size: ranked.len(),
            recorded_at: meetrank_common::time::now(),
        };

        info!(
            competitor = %confirmation.full_name,
            category = %confirmation.category,
            gender = %confirmation.gender,
            result = confirmation.result,
            rank = confirmation.rank,
            cohort_size = confirmation.cohort_size,
            backend = store.backend(),
            "Incorporated submission"
        );

        Ok(LiveRanking {
            rows: join_ranked(&view, &index),
            confirmation,
        })
    }
}
