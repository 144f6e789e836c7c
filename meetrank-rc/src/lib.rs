//! meetrank-rc library - Record Comparison module
//!
//! Ranks meet results against national records and incorporates live
//! submissions. The [`engine`] is pure; [`store`] holds the persisted data;
//! [`api`] is the thin HTTP layer that serializes submissions.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod engine;
pub mod error;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use crate::engine::ComparisonEngine;
use crate::store::{ReferenceSource, SharedResultStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ComparisonEngine>,
    /// Persisted results; the mutex is the single submission lock
    pub results: SharedResultStore,
    pub references: Arc<dyn ReferenceSource>,
}

impl AppState {
    pub fn new(
        engine: ComparisonEngine,
        results: SharedResultStore,
        references: Arc<dyn ReferenceSource>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            results,
            references,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/comparison", get(api::get_comparison))
        .route("/api/comparison/cohort", get(api::get_cohort_view))
        .route("/api/cohorts", get(api::get_cohorts))
        .route("/api/results", post(api::submit_result))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
