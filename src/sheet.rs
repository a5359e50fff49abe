//! Loading exported order spreadsheets into an in-memory table of text cells.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Delimiter used by the platform's CSV exports.
const CSV_DELIMITER: u8 = b';';

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("unsupported file type `{0}`")]
    Unsupported(String),
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("workbook has no worksheets")]
    NoWorksheet,
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("row {row}: column `{column}` has invalid number `{value}`")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: column `{column}` has invalid date `{value}`")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Spreadsheet formats accepted by [`load_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    /// Detect the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        if extension == "csv" {
            Some(Self::Csv)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Workbook)
        } else {
            None
        }
    }
}

/// A header row plus data rows, every cell rendered as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the column whose header equals `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trimmed cell at (`row`, `column`); empty when either is out of range.
    pub fn cell(&self, row: usize, column: Option<usize>) -> &str {
        column
            .and_then(|index| self.rows.get(row)?.get(index))
            .map(|value| value.trim())
            .unwrap_or_default()
    }
}

/// Read the whole file at `path` into memory.
///
/// CSV files are semicolon separated; workbooks contribute their first sheet.
pub fn load_table(path: &Path) -> SheetResult<Table> {
    match SheetFormat::from_path(path) {
        Some(SheetFormat::Csv) => load_csv(path),
        Some(SheetFormat::Workbook) => load_workbook(path),
        None => Err(SheetError::Unsupported(path.display().to_string())),
    }
}

fn load_csv(path: &Path) -> SheetResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .flexible(true)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(headers, rows))
}

fn load_workbook(path: &Path) -> SheetResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Ok(Table::default()),
    };

    let rows = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table::new(headers, rows))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                format!("{f:.0}")
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|value| value.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERROR:{e:?}"),
    }
}

/// Parse a numeric cell; blank cells count as zero.
pub fn parse_number(value: &str, row: usize, column: &'static str) -> SheetResult<f64> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse::<f64>().map_err(|_| SheetError::InvalidNumber {
        row,
        column,
        value: value.to_string(),
    })
}

/// Parse an integer cell, accepting whole-valued decimals such as `3.0`.
pub fn parse_integer(value: &str, row: usize, column: &'static str) -> SheetResult<i32> {
    let number = parse_number(value, row, column)?;
    if number.fract() != 0.0 || number < f64::from(i32::MIN) || number > f64::from(i32::MAX) {
        return Err(SheetError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        });
    }
    Ok(number as i32)
}

/// Parse a date cell; blank cells yield `None`.
pub fn parse_timestamp(
    value: &str,
    row: usize,
    column: &'static str,
) -> SheetResult<Option<NaiveDateTime>> {
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(parsed.naive_utc()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(parsed));
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(midnight));
    }

    Err(SheetError::InvalidDate {
        row,
        column,
        value: value.to_string(),
    })
}
