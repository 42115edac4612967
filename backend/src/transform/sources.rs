//! Built-in customer layouts.

use super::converter::{FirstNameRule, HealthFundRule, SourceProfile};
use crate::error::{ProfileError, ProfileResult};
use crate::models::CanonicalField;

/// Health fund written for every ABC transaction.
pub const ABC_HEALTH_FUND: &str = "ABC";

/// Customer ABC: day-first slashed dates, fixed health fund.
pub fn abc() -> SourceProfile {
    SourceProfile::new("ABC", "%d/%m/%Y", "%d/%m/%Y")
        .with_description("Customer ABC monthly export")
        .with_column(CanonicalField::FundCover, "FundCoverAmount")
        .with_column(CanonicalField::Provider, "ProviderCode")
        .with_health_fund(HealthFundRule::Constant {
            value: ABC_HEALTH_FUND.to_string(),
        })
}

/// Customer Coverall: `01-Jan-17` claim dates and a separate middle name.
pub fn coverall() -> SourceProfile {
    SourceProfile::new("Coverall", "%d-%b-%y", "%d/%m/%Y")
        .with_description("Coverall claims export")
        .with_column(CanonicalField::Dob, "DateOfBirth")
        .with_column(CanonicalField::ItemDescription, "ItemDesc")
        .with_column(CanonicalField::PaymentMethod, "PaymentType")
        .with_first_name(FirstNameRule::WithMiddleName {
            middle_name_column: "MiddleName".to_string(),
        })
}

/// All built-in layouts.
pub fn builtin_sources() -> Vec<SourceProfile> {
    vec![abc(), coverall()]
}

/// Look up a built-in layout by name, ignoring case.
pub fn find_source(name: &str) -> ProfileResult<SourceProfile> {
    builtin_sources()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ProfileError::UnknownSource(name.to_string()))
}
