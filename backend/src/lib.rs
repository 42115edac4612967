//! # Normaliser - health fund transaction CSV normalisation
//!
//! Each customer exports claims with its own column names and date
//! conventions. Normaliser maps every layout onto one canonical transaction
//! record and writes it as the normalised transactions CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ Customer CSV │────▶│   Parser    │────▶│ RowConverter  │────▶│    Writer    │
//! │  (any enc.)  │     │ (rows)      │     │ (per source)  │     │ (canonical)  │
//! └──────────────┘     └─────────────┘     └───────────────┘     └──────────────┘
//! ```
//!
//! Rows that fail validation are logged and dropped; the rest of the file is
//! still written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use normaliser::{convert, sources, NormaliseOptions};
//!
//! let output = convert(
//!     &sources::coverall(),
//!     "datafiles/Coverall_2017_02_18.csv",
//!     "Coverall-normalised",
//!     &NormaliseOptions::default(),
//! ).unwrap();
//! println!("Wrote {}", output.path.display());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Canonical transaction record
//! - [`parser`] - Source CSV reading with encoding detection
//! - [`transform`] - Field builders, converters, source layouts, pipeline
//! - [`writer`] - Normalised CSV output
//! - [`logging`] - Subscriber set-up

pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod transform;
pub mod writer;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{FormatError, NormaliseError, NormaliseResult, ProfileError, ValidationError};

pub use models::{CanonicalField, Transaction, CANONICAL_FIELDS};

pub use parser::{parse_bytes, parse_csv, parse_csv_file, CsvError, ParseResult, Row};

pub use transform::sources;

pub use transform::{
    convert, convert_raw_csv_to_transactions, convert_rows, ConversionReport, FirstNameRule,
    HealthFundRule, NormaliseOptions, RowConverter, RowError, SourceProfile,
};

pub use writer::{CsvOutput, TransactionsCsvWriter};
