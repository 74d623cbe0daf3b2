//! Raw row mappings produced by the source readers.

use std::path::Path;

use serde_json::{Map, Value};

use crate::csv::read_csv_rows;
use crate::discovery::SourceFormat;
use crate::error::{IngestError, Result};
use crate::workbook::read_workbook_rows;

/// One source row: header name to cell value, in column order.
///
/// Values may be strings, numbers, booleans or `null` for an empty cell;
/// the normalizer turns them into text.
pub type RawRow = Map<String, Value>;

/// True when every cell in the row is empty.
#[must_use]
pub fn is_blank_row(row: &RawRow) -> bool {
    row.values().all(|value| match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    })
}

/// Read a source file into raw rows, dispatching on its extension.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    match SourceFormat::from_path(path) {
        Some(SourceFormat::Csv) => read_csv_rows(path),
        Some(SourceFormat::Workbook) => read_workbook_rows(path),
        None => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
