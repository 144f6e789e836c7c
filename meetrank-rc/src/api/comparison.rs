//! Comparison table endpoints
//!
//! Reads take the submission lock only long enough to copy the stored rows;
//! the pipeline itself runs outside the lock.

use axum::{
    extract::{Query, State},
    Json,
};
use meetrank_common::RawResultRow;
use serde::Deserialize;

use crate::engine::{CohortOptions, ComparisonRow, ComparisonTable};
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for a single cohort view
#[derive(Debug, Deserialize)]
pub struct CohortQuery {
    pub category: Option<String>,
    pub gender: Option<String>,
}

async fn snapshot(state: &AppState) -> ApiResult<Vec<RawResultRow>> {
    let mut store = state.results.lock().await;
    Ok(store.read_all().await?)
}

async fn build_table(state: &AppState) -> ApiResult<ComparisonTable> {
    let results = snapshot(state).await?;
    let references = state.references.read_references().await?;
    Ok(state.engine.compare(&results, &references))
}

/// GET /api/comparison
///
/// Full comparison table ordered by category, gender, result.
pub async fn get_comparison(State(state): State<AppState>) -> ApiResult<Json<ComparisonTable>> {
    Ok(Json(build_table(&state).await?))
}

/// GET /api/comparison/cohort?category=..&gender=..
///
/// One cohort ordered by percent difference; unknown cohorts give `[]`.
pub async fn get_cohort_view(
    State(state): State<AppState>,
    Query(query): Query<CohortQuery>,
) -> ApiResult<Json<Vec<ComparisonRow>>> {
    let category = query
        .category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("category is required".to_string()))?;
    let gender = query
        .gender
        .filter(|g| !g.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("gender is required".to_string()))?;

    let table = build_table(&state).await?;
    Ok(Json(table.cohort_view(&category, &gender)))
}

/// GET /api/cohorts
///
/// Distinct categories and genders present in the comparison table.
pub async fn get_cohorts(State(state): State<AppState>) -> ApiResult<Json<CohortOptions>> {
    Ok(Json(build_table(&state).await?.options()))
}
