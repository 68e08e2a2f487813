//! CSV parsing with per-cell type inference.

use std::collections::HashSet;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use csvgeo_core::{CellValue, Row};
use thiserror::Error;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// First structural error reported while parsing CSV content.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CsvParseError {
    message: String,
}

impl CsvParseError {
    /// The parser's description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<csv::Error> for CsvParseError {
    fn from(error: csv::Error) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// Parse delimited text into rows keyed by the header line.
///
/// Every record must have as many fields as the header; the first record that
/// does not aborts parsing. Blank lines are ignored and a leading UTF-8 byte
/// order mark is stripped from the first column name. Repeated column names
/// are kept apart by suffixing later occurrences with `_1`, `_2` and so on.
///
/// # Errors
///
/// Returns [`CsvParseError`] for unequal field counts, invalid UTF-8, or read
/// failures from the underlying stream.
///
/// # Examples
///
/// ```
/// use csvgeo_core::CellValue;
/// use csvgeo_data::parse_csv;
///
/// let rows = parse_csv("id,name\n1,Depot\n".as_bytes())?;
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].get("id"), Some(&CellValue::Number(1.into())));
/// # Ok::<(), csvgeo_data::CsvParseError>(())
/// ```
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Row>, CsvParseError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);
    let headers = column_names(csv_reader.headers()?);
    csv_reader
        .records()
        .map(|record| record.map(|fields| build_row(&headers, &fields)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(CsvParseError::from)
}

fn column_names(record: &StringRecord) -> Vec<String> {
    let raw: Vec<&str> = record
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if index == 0 {
                name.trim_start_matches(BYTE_ORDER_MARK)
            } else {
                name
            }
        })
        .collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());
    for name in &raw {
        let mut unique = (*name).to_owned();
        let mut suffix = 1_usize;
        while taken.contains(&unique) || (unique != *name && raw.contains(&unique.as_str())) {
            unique = format!("{name}_{suffix}");
            suffix += 1;
        }
        taken.insert(unique.clone());
        names.push(unique);
    }
    names
}

fn build_row(headers: &[String], fields: &StringRecord) -> Row {
    headers
        .iter()
        .zip(fields.iter())
        .map(|(column, raw)| (column.as_str(), CellValue::infer(raw)))
        .collect()
}
