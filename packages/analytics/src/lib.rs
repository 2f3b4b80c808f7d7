#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Collection reporting and aggregation engine.
//!
//! Turns raw collection records, whose weapon counts, person details, and
//! dates are stored as loosely-typed JSON, into report-ready views:
//! enriched per-collection rows, a weapon-category pivot with totals, and
//! multi-dimensional statistics. Malformed records degrade to empty values
//! instead of failing the report; only repository failures are errors.

pub mod catalog;
pub mod enrich;
pub mod payload;
pub mod pivot;
pub mod report;
pub mod stats;

use armory_database::DbError;
use thiserror::Error;

pub use report::{generate_collection_table, get_collection_statistics};

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A repository read failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}
