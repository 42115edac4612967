//! Field builders: read one source column, validate it and coerce it to its
//! canonical type.
//!
//! Every failure is a [`ValidationError`] naming the column that was read.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::error::ValidationError;
use crate::parser::Row;

/// Textual form of a cell. `null`, arrays and objects count as absent.
fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn raw_value(row: &Row, column: &str) -> Option<String> {
    row.get(column).and_then(as_string)
}

/// Like [`raw_value`], but blank cells are `None` too.
pub fn optional_string(row: &Row, column: &str) -> Option<String> {
    raw_value(row, column).filter(|s| !s.trim().is_empty())
}

/// Required text value, returned untouched. Only an empty cell is missing;
/// whitespace is kept as data.
pub fn build_string(row: &Row, column: &str) -> Result<String, ValidationError> {
    raw_value(row, column)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::new(column))
}

/// Required floating-point amount.
pub fn build_monetary(row: &Row, column: &str) -> Result<f64, ValidationError> {
    raw_value(row, column)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| ValidationError::new(column))
}

/// Required integer identifier. Decimal notation is rejected.
pub fn build_transaction_id(row: &Row, column: &str) -> Result<i64, ValidationError> {
    let parsed = match row.get(column) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(value) => as_string(value).and_then(|s| s.trim().parse::<i64>().ok()),
        None => None,
    };
    parsed.ok_or_else(|| ValidationError::new(column))
}

/// Required calendar date in the given strftime-style `format`.
///
/// Two-digit years follow the POSIX pivot: `69`-`99` are 1969-1999 and
/// `00`-`68` are 2000-2068.
pub fn build_date(row: &Row, column: &str, format: &str) -> Result<NaiveDate, ValidationError> {
    raw_value(row, column)
        .and_then(|s| NaiveDate::parse_from_str(&s, format).ok())
        .and_then(|date| pivot_two_digit_year(date, format))
        .ok_or_else(|| ValidationError::new(column))
}

// chrono reads `%y` 69 as 2069; POSIX reads it as 1969.
fn pivot_two_digit_year(date: NaiveDate, format: &str) -> Option<NaiveDate> {
    if format.contains("%y") && date.year() == 2069 {
        date.with_year(1969)
    } else {
        Some(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_string_present() {
        let r = row(json!({ "FirstName": "Ash" }));
        assert_eq!(build_string(&r, "FirstName").unwrap(), "Ash");
    }

    #[test]
    fn test_string_missing_empty_or_null() {
        let r = row(json!({ "Empty": "", "Null": null }));

        for column in ["Empty", "Null", "Absent"] {
            let err = build_string(&r, column).unwrap_err();
            assert_eq!(err.field, column);
        }
    }

    #[test]
    fn test_string_keeps_whitespace_only_value() {
        let r = row(json!({ "PaymentMethod": "   " }));
        assert_eq!(build_string(&r, "PaymentMethod").unwrap(), "   ");
        assert_eq!(optional_string(&r, "PaymentMethod"), None);
    }

    #[test]
    fn test_string_accepts_numbers() {
        let r = row(json!({ "ItemID": 42 }));
        assert_eq!(build_string(&r, "ItemID").unwrap(), "42");
    }

    #[test]
    fn test_monetary() {
        let r = row(json!({ "Cost": "10.50", "Padded": " 7 ", "Int": 10, "Bad": "ten", "Null": null }));

        assert_eq!(build_monetary(&r, "Cost").unwrap(), 10.5);
        assert_eq!(build_monetary(&r, "Padded").unwrap(), 7.0);
        assert_eq!(build_monetary(&r, "Int").unwrap(), 10.0);
        assert!(build_monetary(&r, "Bad").is_err());
        assert!(build_monetary(&r, "Null").is_err());
        assert!(build_monetary(&r, "Absent").is_err());
    }

    #[test]
    fn test_transaction_id() {
        let r = row(json!({ "Str": "17", "Num": 1, "Alpha": "A", "Decimal": "1.5", "Float": 1.5 }));

        assert_eq!(build_transaction_id(&r, "Str").unwrap(), 17);
        assert_eq!(build_transaction_id(&r, "Num").unwrap(), 1);
        assert_eq!(build_transaction_id(&r, "Alpha").unwrap_err().field, "Alpha");
        assert!(build_transaction_id(&r, "Decimal").is_err());
        assert!(build_transaction_id(&r, "Float").is_err());
        assert!(build_transaction_id(&r, "Absent").is_err());
    }

    #[test]
    fn test_date_formats() {
        let r = row(json!({ "Slash": "04/09/1992", "Month": "01-Jan-17", "Bad": "01-01/2017" }));

        assert_eq!(
            build_date(&r, "Slash", "%d/%m/%Y").unwrap(),
            NaiveDate::from_ymd_opt(1992, 9, 4).unwrap()
        );
        assert_eq!(
            build_date(&r, "Month", "%d-%b-%y").unwrap(),
            NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()
        );
        assert!(build_date(&r, "Bad", "%d/%m/%Y").is_err());
        assert!(build_date(&r, "Month", "%d/%m/%Y").is_err());
        assert!(build_date(&r, "Absent", "%d/%m/%Y").is_err());
    }

    #[test]
    fn test_two_digit_year_pivot() {
        let r = row(json!({ "Old": "01-Jan-69", "New": "31-Dec-68", "Late": "05-May-99", "Full": "01/01/2069" }));

        assert_eq!(build_date(&r, "Old", "%d-%b-%y").unwrap(), NaiveDate::from_ymd_opt(1969, 1, 1).unwrap());
        assert_eq!(build_date(&r, "New", "%d-%b-%y").unwrap(), NaiveDate::from_ymd_opt(2068, 12, 31).unwrap());
        assert_eq!(build_date(&r, "Late", "%d-%b-%y").unwrap(), NaiveDate::from_ymd_opt(1999, 5, 5).unwrap());
        assert_eq!(build_date(&r, "Full", "%d/%m/%Y").unwrap(), NaiveDate::from_ymd_opt(2069, 1, 1).unwrap());
    }
}
