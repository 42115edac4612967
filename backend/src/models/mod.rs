//! Canonical transaction record.
//!
//! Every customer layout is mapped into [`Transaction`]; the output file
//! always uses the column order in [`CANONICAL_FIELDS`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalised output header, in column order.
pub const CANONICAL_FIELDS: [&str; 12] = [
    "TransactionID",
    "DateClaimed",
    "FirstName",
    "LastName",
    "DateOfBirth",
    "ItemID",
    "ItemDescription",
    "Cost",
    "FundCover",
    "PaymentMethod",
    "Provider",
    "HealthFund",
];

/// A normalised transaction from a health insurer.
///
/// Built in one step by a [`crate::RowConverter`]: a value of this type is
/// always fully populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: i64,
    pub date_claimed: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub item_id: String,
    pub item_description: String,
    pub cost: f64,
    pub fund_cover: f64,
    pub payment_method: String,
    pub provider: String,
    pub health_fund: String,
}

/// Canonical field a source column feeds.
///
/// Used as the key of per-source column overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    TransactionId,
    DateClaimed,
    FirstName,
    LastName,
    Dob,
    ItemId,
    ItemDescription,
    Cost,
    FundCover,
    PaymentMethod,
    Provider,
    HealthFund,
}

impl CanonicalField {
    /// Source column read when a profile does not rename it.
    pub fn default_column(self) -> &'static str {
        match self {
            CanonicalField::TransactionId => "TransactionID",
            CanonicalField::DateClaimed => "DateClaimed",
            CanonicalField::FirstName => "FirstName",
            CanonicalField::LastName => "LastName",
            CanonicalField::Dob => "DOB",
            CanonicalField::ItemId => "ItemID",
            CanonicalField::ItemDescription => "ItemDescription",
            CanonicalField::Cost => "Cost",
            CanonicalField::FundCover => "FundCover",
            CanonicalField::PaymentMethod => "PaymentMethod",
            CanonicalField::Provider => "Provider",
            CanonicalField::HealthFund => "HealthFund",
        }
    }
}
