//! Transformation module.
//!
//! This module handles customer CSV to canonical transaction conversion:
//! - Fields: per-field extraction and type coercion
//! - Converter: the `RowConverter` seam and data-driven `SourceProfile`
//! - Sources: built-in customer layouts
//! - Pipeline: file-level orchestration

pub mod converter;
pub mod fields;
pub mod pipeline;
pub mod sources;

pub use converter::{FirstNameRule, HealthFundRule, RowConverter, SourceProfile};
pub use pipeline::*;
