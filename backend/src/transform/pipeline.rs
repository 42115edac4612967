//! End-to-end conversion of one customer file.
//!
//! ```text
//! Customer CSV -> Vec<Transaction> -> Normalised CSV
//! ```
//!
//! A row that fails validation is logged, counted and dropped; the rest of
//! the file is still converted.
//!
//! # Example
//!
//! ```rust,no_run
//! use normaliser::{convert, sources, NormaliseOptions};
//!
//! let output = convert(
//!     &sources::abc(),
//!     "datafiles/ABC_2017_02_01.csv",
//!     "ABC-normalised",
//!     &NormaliseOptions::default(),
//! ).unwrap();
//! println!("{} rows written to {}", output.written, output.path.display());
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::converter::RowConverter;
use crate::error::{NormaliseResult, ValidationError};
use crate::models::Transaction;
use crate::parser::{parse_csv_file, Row};
use crate::writer::{CsvOutput, TransactionsCsvWriter};

/// Line number of the first data row (the header is line 1).
pub const FIRST_DATA_ROW: usize = 2;

/// Options for a conversion run
#[derive(Debug, Clone, Default)]
pub struct NormaliseOptions {
    /// Directory receiving the output file; empty means the working directory
    pub output_dir: PathBuf,
}

/// A source row that could not be converted
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// Line number in the source file
    pub row: usize,
    pub error: ValidationError,
}

/// Converted transactions plus the rows that were dropped
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    /// Transactions in source order
    pub transactions: Vec<Transaction>,
    pub errors: Vec<RowError>,
}

impl ConversionReport {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "Converted: {} transactions, {} errors",
            self.transactions.len(),
            self.errors.len()
        )
    }
}

/// Convert already-read rows. `rows[0]` is reported as line 2.
pub fn convert_rows<C>(converter: &C, rows: &[Row]) -> ConversionReport
where
    C: RowConverter + ?Sized,
{
    let mut report = ConversionReport::default();

    for (i, row) in rows.iter().enumerate() {
        let line = i + FIRST_DATA_ROW;
        match converter.convert_row_to_transaction(row) {
            Ok(transaction) => report.transactions.push(transaction),
            Err(e) => {
                error!(
                    "Error converting record to Transaction (Error: {}): Row {}",
                    e, line
                );
                report.errors.push(RowError { row: line, error: e });
            }
        }
    }

    if report.error_count() > 0 {
        error!("Errors: {}", report.error_count());
    }

    report
}

/// Read a customer CSV file and convert every row.
///
/// Fails only when the file itself cannot be read.
pub fn convert_raw_csv_to_transactions<C, P>(converter: &C, path: P) -> NormaliseResult<ConversionReport>
where
    C: RowConverter + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let parsed = parse_csv_file(path)?;
    debug!(
        source = converter.name(),
        encoding = %parsed.encoding,
        rows = parsed.rows.len(),
        "Read {}",
        path.display()
    );

    Ok(convert_rows(converter, &parsed.rows))
}

/// Convert a customer file and write `<output_name>.csv`.
pub fn convert<C, P>(
    converter: &C,
    path: P,
    output_name: &str,
    options: &NormaliseOptions,
) -> NormaliseResult<CsvOutput>
where
    C: RowConverter + ?Sized,
    P: AsRef<Path>,
{
    let report = convert_raw_csv_to_transactions(converter, path)?;
    let writer = TransactionsCsvWriter::new(options.output_dir.clone());
    writer.create_csv(&report.transactions, output_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormaliseError;
    use crate::models::CANONICAL_FIELDS;
    use crate::transform::sources;

    const ABC_CSV: &str = "\
TransactionID,DateClaimed,DOB,FirstName,LastName,ItemID,ItemDescription,Cost,FundCoverAmount,PaymentMethod,ProviderCode
1,01/01/2017,01/01/2014,Ash,Ramesh,AAA,BBBB,10,10,Cash,ABCX
A,01/01/2017,01/01/2014,Bad,Id,AAA,BBBB,10,10,Cash,ABCX
3,01/02/2017,05/06/1980,Bea,Nguyen,D01,Clean,80.5,60,Card,ABCY
4,01/02/2017,05/06/1980,,Nguyen,D01,Clean,80.5,60,Card,ABCY
5,2017-02-01,05/06/1980,Cal,Lee,D02,Scale,40,20,Card,ABCY
";

    fn write_source(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("source.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_invalid_rows_dropped_and_numbered() {
        crate::logging::init_test();
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), ABC_CSV);

        let report = convert_raw_csv_to_transactions(&sources::abc(), &path).unwrap();

        let ids: Vec<i64> = report.transactions.iter().map(|t| t.transaction_id).collect();
        assert_eq!(ids, vec![1, 3]);

        let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![3, 5, 6]);
        assert_eq!(report.errors[0].error.field, "TransactionID");
        assert_eq!(report.errors[1].error.field, "FirstName");
        assert_eq!(report.errors[2].error.field, "DateClaimed");
        assert_eq!(report.summary(), "Converted: 2 transactions, 3 errors");
    }

    #[test]
    fn test_convert_writes_valid_rows_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), ABC_CSV);
        let options = NormaliseOptions {
            output_dir: dir.path().to_path_buf(),
        };

        let output = convert(&sources::abc(), &path, "ABC-normalised", &options).unwrap();
        assert_eq!(output.written, 2);

        let content = std::fs::read_to_string(dir.path().join("ABC-normalised.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "1,01-Jan-17,Ash,Ramesh,01/01/2014,AAA,BBBB,10.0,10.0,Cash,ABCX,ABC"
        );
        assert_eq!(
            lines[2],
            "3,01-Feb-17,Bea,Nguyen,05/06/1980,D01,Clean,80.5,60.0,Card,ABCY,ABC"
        );
    }

    #[test]
    fn test_coverall_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(
            dir.path(),
            "TransactionID,DateClaimed,FirstName,MiddleName,LastName,DateOfBirth,ItemID,ItemDesc,Cost,FundCover,PaymentType,Provider,HealthFund\n\
             9,18-Feb-17,Ash,Bab,Ramesh,04/09/1992,X1,Glasses,250,200,EFTPOS,OPT1,Coverall\n\
             10,18-Feb-17,Dee,,Smith,11/12/1975,X2,Lenses,99.95,50,Cash,OPT1,Coverall\n",
        );
        let options = NormaliseOptions {
            output_dir: dir.path().to_path_buf(),
        };

        let output = convert(&sources::coverall(), &path, "Coverall-normalised", &options).unwrap();
        let content = std::fs::read_to_string(&output.path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(
            lines[1],
            "9,18-Feb-17,Ash Bab,Ramesh,04/09/1992,X1,Glasses,250.0,200.0,EFTPOS,OPT1,Coverall"
        );
        assert_eq!(
            lines[2],
            "10,18-Feb-17,Dee,Smith,11/12/1975,X2,Lenses,99.95,50.0,Cash,OPT1,Coverall"
        );
    }

    #[test]
    fn test_convert_rows_preserves_order() {
        let rows: Vec<Row> = (1..=3)
            .rev()
            .map(|id| {
                serde_json::json!({
                    "TransactionID": id,
                    "DateClaimed": "01/01/2017",
                    "DOB": "01/01/2014",
                    "FirstName": "Ash",
                    "LastName": "Ramesh",
                    "ItemID": "AAA",
                    "ItemDescription": "BBBB",
                    "Cost": 10,
                    "FundCoverAmount": 10,
                    "PaymentMethod": "Cash",
                    "ProviderCode": "ABCX"
                })
                .as_object()
                .cloned()
                .unwrap()
            })
            .collect();

        let report = convert_rows(&sources::abc(), &rows);
        let ids: Vec<i64> = report.transactions.iter().map(|t| t.transaction_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_bundled_sample_files() {
        let datafiles = Path::new(env!("CARGO_MANIFEST_DIR")).join("../datafiles");

        let abc = convert_raw_csv_to_transactions(&sources::abc(), datafiles.join("ABC_2017_02_01.csv")).unwrap();
        let ids: Vec<i64> = abc.transactions.iter().map(|t| t.transaction_id).collect();
        assert_eq!(ids, vec![1001, 1002, 1006]);
        assert_eq!(abc.error_count(), 3);

        let coverall =
            convert_raw_csv_to_transactions(&sources::coverall(), datafiles.join("Coverall_2017_02_18.csv")).unwrap();
        let ids: Vec<i64> = coverall.transactions.iter().map(|t| t.transaction_id).collect();
        assert_eq!(ids, vec![5001, 5003]);
        assert_eq!(coverall.transactions[1].first_name, "Oliver James");
        let fields: Vec<&str> = coverall.errors.iter().map(|e| e.error.field.as_str()).collect();
        assert_eq!(fields, vec!["FundCover", "DateClaimed", "HealthFund"]);
    }

    #[test]
    fn test_empty_input_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let options = NormaliseOptions {
            output_dir: dir.path().to_path_buf(),
        };

        for content in ["", "\n  \n"] {
            let path = write_source(dir.path(), content);
            let output = convert(&sources::coverall(), &path, "empty", &options).unwrap();
            assert_eq!(output.written, 0);

            let written = std::fs::read_to_string(&output.path).unwrap();
            assert_eq!(written.lines().collect::<Vec<_>>(), vec![CANONICAL_FIELDS.join(",")]);
        }
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert(
            &sources::abc(),
            dir.path().join("absent.csv"),
            "out",
            &NormaliseOptions::default(),
        );

        assert!(matches!(result, Err(NormaliseError::Csv(_))));
        assert!(!dir.path().join("out.csv").exists());
    }
}
