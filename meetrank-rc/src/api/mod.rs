//! HTTP API handlers for meetrank-rc

pub mod comparison;
pub mod health;
pub mod submit;

pub use comparison::{get_cohort_view, get_cohorts, get_comparison};
pub use health::health_routes;
pub use submit::submit_result;
