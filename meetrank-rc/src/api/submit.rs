//! Live submission endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::warn;

use crate::engine::{LiveRanking, Submission, SubmissionError};
use crate::{ApiResult, AppState};

/// POST /api/results
///
/// Appends one result and returns the submitter's cohort view. The store
/// mutex is held from append through recompute, so concurrent submissions
/// are applied one at a time and each view includes every earlier append.
///
/// A body that is not a JSON submission (bad syntax, wrong content type)
/// answers with the same validation error shape as a missing field.
pub async fn submit_result(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> ApiResult<Json<LiveRanking>> {
    let Json(submission) = payload.map_err(|rejection| {
        warn!("Rejected submission body: {}", rejection.body_text());
        SubmissionError::Malformed(rejection.body_text())
    })?;

    let references = state.references.read_references().await?;

    let mut store = state.results.lock().await;
    let live = state
        .engine
        .incorporate(&mut **store, &references, &submission)
        .await?;

    Ok(Json(live))
}
