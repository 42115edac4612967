//! Row conversion: one source row in, one [`Transaction`] out.
//!
//! [`RowConverter`] is the seam the pipeline works against. [`SourceProfile`]
//! is its data-driven implementation: a customer layout is a set of column
//! renames, two date patterns and a couple of per-field rules, loadable from
//! JSON like any other configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::fields::{build_date, build_monetary, build_string, build_transaction_id, optional_string};
use crate::error::{ProfileError, ProfileResult, ValidationError};
use crate::models::{CanonicalField, Transaction};
use crate::parser::Row;

/// Converts rows of one customer layout into canonical transactions.
pub trait RowConverter {
    /// Short name of the source, used in logs.
    fn name(&self) -> &str;

    /// Build a transaction from one row, or report the first invalid field.
    fn convert_row_to_transaction(&self, row: &Row) -> Result<Transaction, ValidationError>;
}

/// How the canonical first name is assembled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FirstNameRule {
    /// Read the first-name column as-is
    #[default]
    Column,

    /// Append the middle name, separated by a space, when the source has one
    WithMiddleName { middle_name_column: String },
}

/// Where the health fund comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealthFundRule {
    /// Read the health-fund column
    #[default]
    Column,

    /// Every row of this source belongs to the same fund
    Constant { value: String },
}

/// Declarative description of one customer CSV layout.
///
/// # Example
///
/// ```
/// use normaliser::{CanonicalField, SourceProfile};
///
/// let profile = SourceProfile::from_json(r#"{
///     "name": "Acme",
///     "date_claimed_format": "%Y-%m-%d",
///     "dob_format": "%Y-%m-%d",
///     "columns": { "provider": "ProviderNo" },
///     "health_fund": { "type": "constant", "value": "Acme Health" }
/// }"#).unwrap();
///
/// assert_eq!(profile.column(CanonicalField::Provider), "ProviderNo");
/// assert_eq!(profile.column(CanonicalField::Cost), "Cost");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProfile {
    /// Source name, e.g. the customer code
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Source column per canonical field, when it differs from the default
    #[serde(default)]
    pub columns: BTreeMap<CanonicalField, String>,

    /// strftime-style pattern of the claim date
    pub date_claimed_format: String,

    /// strftime-style pattern of the date of birth
    pub dob_format: String,

    #[serde(default)]
    pub first_name: FirstNameRule,

    #[serde(default)]
    pub health_fund: HealthFundRule,
}

impl SourceProfile {
    /// Profile reading every default column with the given date patterns.
    pub fn new(
        name: impl Into<String>,
        date_claimed_format: impl Into<String>,
        dob_format: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            columns: BTreeMap::new(),
            date_claimed_format: date_claimed_format.into(),
            dob_format: dob_format.into(),
            first_name: FirstNameRule::Column,
            health_fund: HealthFundRule::Column,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Read `field` from `column` instead of its default column.
    pub fn with_column(mut self, field: CanonicalField, column: impl Into<String>) -> Self {
        self.columns.insert(field, column.into());
        self
    }

    pub fn with_first_name(mut self, rule: FirstNameRule) -> Self {
        self.first_name = rule;
        self
    }

    pub fn with_health_fund(mut self, rule: HealthFundRule) -> Self {
        self.health_fund = rule;
        self
    }

    /// Source column consulted for `field`.
    pub fn column(&self, field: CanonicalField) -> &str {
        self.columns
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.default_column())
    }

    /// Parse and check a profile from a JSON string.
    pub fn from_json(json: &str) -> ProfileResult<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a profile from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ProfileResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject profiles that could never produce a valid transaction.
    pub fn validate(&self) -> ProfileResult<()> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::Invalid("name is empty".into()));
        }
        if self.date_claimed_format.trim().is_empty() || self.dob_format.trim().is_empty() {
            return Err(ProfileError::Invalid(format!(
                "{}: date formats must not be empty",
                self.name
            )));
        }
        if let Some((field, _)) = self.columns.iter().find(|(_, c)| c.trim().is_empty()) {
            return Err(ProfileError::Invalid(format!(
                "{}: empty column name for {:?}",
                self.name, field
            )));
        }
        match (&self.first_name, &self.health_fund) {
            (FirstNameRule::WithMiddleName { middle_name_column }, _)
                if middle_name_column.trim().is_empty() =>
            {
                Err(ProfileError::Invalid(format!("{}: empty middle name column", self.name)))
            }
            (_, HealthFundRule::Constant { value }) if value.trim().is_empty() => {
                Err(ProfileError::Invalid(format!("{}: constant health fund is empty", self.name)))
            }
            _ => Ok(()),
        }
    }

    fn build_first_name(&self, row: &Row) -> Result<String, ValidationError> {
        let first_name = build_string(row, self.column(CanonicalField::FirstName))?;

        match &self.first_name {
            FirstNameRule::Column => Ok(first_name),
            FirstNameRule::WithMiddleName { middle_name_column } => {
                match optional_string(row, middle_name_column) {
                    Some(middle) => Ok(format!("{} {}", first_name, middle)),
                    None => Ok(first_name),
                }
            }
        }
    }

    fn build_health_fund(&self, row: &Row) -> Result<String, ValidationError> {
        match &self.health_fund {
            HealthFundRule::Column => build_string(row, self.column(CanonicalField::HealthFund)),
            HealthFundRule::Constant { value } => Ok(value.clone()),
        }
    }
}

impl RowConverter for SourceProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn convert_row_to_transaction(&self, row: &Row) -> Result<Transaction, ValidationError> {
        let text = |field: CanonicalField| build_string(row, self.column(field));

        Ok(Transaction {
            transaction_id: build_transaction_id(row, self.column(CanonicalField::TransactionId))?,
            date_claimed: build_date(
                row,
                self.column(CanonicalField::DateClaimed),
                &self.date_claimed_format,
            )?,
            first_name: self.build_first_name(row)?,
            last_name: text(CanonicalField::LastName)?,
            dob: build_date(row, self.column(CanonicalField::Dob), &self.dob_format)?,
            item_id: text(CanonicalField::ItemId)?,
            item_description: text(CanonicalField::ItemDescription)?,
            cost: build_monetary(row, self.column(CanonicalField::Cost))?,
            fund_cover: build_monetary(row, self.column(CanonicalField::FundCover))?,
            payment_method: text(CanonicalField::PaymentMethod)?,
            provider: text(CanonicalField::Provider)?,
            health_fund: self.build_health_fund(row)?,
        })
    }
}
