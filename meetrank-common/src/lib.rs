//! # meetrank Common Library
//!
//! Shared code for the meetrank workspace including:
//! - Tabular data contract (raw result/reference rows, untyped cells)
//! - Database initialization
//! - Configuration loading and root folder resolution
//! - Error types

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{CellValue, Coerced, RawReferenceRow, RawResultRow};
