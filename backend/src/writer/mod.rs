//! Serialises transactions to the normalised CSV.
//!
//! Output is unquoted: a value that would need quoting cannot be written and
//! its row is dropped. Bad rows are logged and skipped, never fatal.

use std::fs::File;
use std::path::PathBuf;

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use tracing::{error, info};

use crate::error::{FormatError, NormaliseError, NormaliseResult};
use crate::models::{Transaction, CANONICAL_FIELDS};

const DATE_CLAIMED_FORMAT: &str = "%d-%b-%y";
const DOB_FORMAT: &str = "%d/%m/%Y";
const DELIMITER: char = ',';

/// Outcome of writing one normalised file
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOutput {
    pub path: PathBuf,
    /// Data rows written (the header is not counted)
    pub written: usize,
    /// Transactions dropped because they could not be formatted
    pub skipped: usize,
}

/// Writes lists of [`Transaction`] as normalised CSV files.
#[derive(Debug, Clone, Default)]
pub struct TransactionsCsvWriter {
    output_dir: PathBuf,
}

impl TransactionsCsvWriter {
    /// Writer placing files in `output_dir`. The default writes to the
    /// working directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render a transaction as output cells, in [`CANONICAL_FIELDS`] order.
    pub fn format_transaction(&self, t: &Transaction) -> Result<[String; 12], FormatError> {
        Ok([
            t.transaction_id.to_string(),
            format_date(t.date_claimed, DATE_CLAIMED_FORMAT),
            unquoted("FirstName", &t.first_name)?,
            unquoted("LastName", &t.last_name)?,
            format_date(t.dob, DOB_FORMAT),
            unquoted("ItemID", &t.item_id)?,
            unquoted("ItemDescription", &t.item_description)?,
            format_amount("Cost", t.cost)?,
            format_amount("FundCover", t.fund_cover)?,
            unquoted("PaymentMethod", &t.payment_method)?,
            unquoted("Provider", &t.provider)?,
            unquoted("HealthFund", &t.health_fund)?,
        ])
    }

    /// Write `<filename>.csv` with the canonical header and one row per
    /// transaction that formats cleanly.
    ///
    /// Only failing to create or write the file itself is an error.
    pub fn create_csv(&self, transactions: &[Transaction], filename: &str) -> NormaliseResult<CsvOutput> {
        let path = self.output_dir.join(format!("{}.csv", filename));
        let file = File::create(&path).map_err(|source| NormaliseError::Output {
            path: path.clone(),
            source,
        })?;

        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER as u8)
            .quote_style(QuoteStyle::Never)
            .from_writer(file);

        writer.write_record(CANONICAL_FIELDS)?;

        let mut written = 0;
        let mut skipped = 0;
        for transaction in transactions {
            match self.format_transaction(transaction) {
                Ok(cells) => {
                    writer.write_record(&cells)?;
                    written += 1;
                }
                Err(e) => {
                    skipped += 1;
                    error!(transaction_id = transaction.transaction_id, "{}", e);
                }
            }
        }

        writer.flush().map_err(|source| NormaliseError::Output {
            path: path.clone(),
            source,
        })?;

        info!("CSV file created - {}", path.display());

        Ok(CsvOutput { path, written, skipped })
    }
}

fn format_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

fn unquoted(field: &'static str, value: &str) -> Result<String, FormatError> {
    if value.contains([DELIMITER, '"', '\n', '\r']) {
        return Err(FormatError::NeedsEscape {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Shortest round-trip form of an amount.
///
/// Decimal notation is used for exponents -4 through 15 and always carries a
/// fractional part (`10.0`); anything else is scientific with a signed,
/// two-digit exponent (`1e-05`, `1.5e+16`).
fn format_amount(field: &'static str, value: f64) -> Result<String, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NonFiniteAmount { field, value });
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        let decimal = value.to_string();
        if decimal.contains('.') {
            Ok(decimal)
        } else {
            Ok(format!("{}.0", decimal))
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        Ok(format!("{}e{}{:02}", mantissa, sign, exponent.abs()))
    }
}
