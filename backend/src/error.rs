//! Error types for the normalisation pipeline.
//!
//! - [`ValidationError`] - a source row cannot become a [`crate::Transaction`]
//! - [`FormatError`] - a transaction cannot be written as an unquoted CSV row
//! - [`ProfileError`] - a source profile is unreadable or inconsistent
//! - [`NormaliseError`] - top-level failures that abort a run
//!
//! Only [`NormaliseError`] is fatal. The first two are recovered per row by
//! the orchestrator and the writer respectively.

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::CsvError;

// =============================================================================
// Row Validation
// =============================================================================

/// A required field is missing, empty, or not coercible to its type.
///
/// `field` is the source column that was consulted, so the message points at
/// the customer's own header name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for {field}")]
pub struct ValidationError {
    pub field: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }
}

// =============================================================================
// Output Formatting
// =============================================================================

/// A converted transaction cannot be serialised to the canonical CSV.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Output is unquoted, so delimiters, quotes and line breaks cannot be escaped.
    #[error("need to escape {field} (value '{value}') but quoting is disabled")]
    NeedsEscape { field: &'static str, value: String },

    /// NaN and infinities parse at ingest but are meaningless amounts.
    #[error("{field} is not a finite amount: {value}")]
    NonFiniteAmount { field: &'static str, value: f64 },
}

// =============================================================================
// Source Profiles
// =============================================================================

/// Errors loading or checking a [`crate::SourceProfile`].
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    Invalid(String),

    #[error("Unknown source '{0}'")]
    UnknownSource(String),
}

// =============================================================================
// Run Errors (top-level)
// =============================================================================

/// Failures that stop a whole conversion run.
#[derive(Debug, Error)]
pub enum NormaliseError {
    /// The input file could not be opened, decoded or parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// The output file could not be created or flushed.
    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer failed below the row level.
    #[error("CSV writer error: {0}")]
    Writer(#[from] csv::Error),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Result type for run-level operations.
pub type NormaliseResult<T> = Result<T, NormaliseError>;
