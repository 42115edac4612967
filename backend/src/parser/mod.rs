//! Source CSV reader with encoding auto-detection.
//!
//! Turns a customer export into one [`Row`] per data line, keyed by the
//! header names. No knowledge of any customer layout lives here.

use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// One source line: column name to raw value.
///
/// Values read from a file are always strings. Rows assembled in code may
/// also carry numbers or `null`, which the field builders accept.
pub type Row = Map<String, Value>;

/// CSV reading error with context
#[derive(Debug, Clone)]
pub struct CsvError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    fn from_csv(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
        Self::new(line, err.to_string())
    }
}

/// Rows read from one source file, with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Data rows in file order (the first one is line 2)
    pub rows: Vec<Row>,
    /// Detected encoding
    pub encoding: String,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// UTF-8 input loses its byte order mark; undecodable bytes are replaced
/// rather than rejected.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        // WHATWG maps the latin-1 labels onto windows-1252.
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => encoding_rs::UTF_8.decode(bytes).0.into_owned(),
    }
}

/// Parse already-decoded CSV text.
///
/// Blank lines are skipped. Short rows are accepted and their missing
/// trailing cells are simply absent from the [`Row`]; extra cells are ignored.
///
/// # Example
/// ```
/// use normaliser::parser::parse_csv;
///
/// let rows = parse_csv("TransactionID,Cost\n1,10.5\n2,3".as_bytes()).unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0]["TransactionID"], "1");
/// assert_eq!(rows[1]["Cost"], "3");
/// ```
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Row>, CsvError> {
    parse_with_headers(reader).map(|(_, rows)| rows)
}

fn parse_with_headers<R: Read>(reader: R) -> Result<(Vec<String>, Vec<Row>), CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(CsvError::from_csv)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::new(1, "No headers found"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(CsvError::from_csv)?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), Value::String(value.to_string())))
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Parse CSV bytes, detecting their encoding first.
///
/// An empty or blank file has no headers and no rows; it is not an error.
pub fn parse_bytes(bytes: &[u8]) -> Result<ParseResult, CsvError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(ParseResult {
            rows: Vec::new(),
            encoding: "utf-8".to_string(),
            headers: Vec::new(),
        });
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let (headers, rows) = parse_with_headers(content.as_bytes())?;

    Ok(ParseResult {
        rows,
        encoding,
        headers,
    })
}

/// Read and parse a source CSV file.
///
/// The file handle is released before rows are returned.
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> Result<ParseResult, CsvError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| CsvError::new(0, format!("Cannot read file '{}': {}", path.display(), e)))?;

    parse_bytes(&bytes)
}
