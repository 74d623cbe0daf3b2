//! Spreadsheet workbook reading via `calamine`.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use serde_json::{Number, Value};

use crate::csv::check_file_size;
use crate::error::{IngestError, Result};
use crate::rows::{RawRow, is_blank_row};

/// Reads the first worksheet of a workbook into ordered row mappings.
///
/// The first row is the header. Numeric cells stay numeric so the
/// normalizer can render integral values without a trailing `.0`; error
/// cells (`#N/A`, `#DIV/0!`) are treated as empty.
pub fn read_workbook_rows(path: &Path) -> Result<Vec<RawRow>> {
    check_file_size(path)?;

    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        let mut row = RawRow::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = sheet_row.get(index).map_or(Value::Null, cell_value);
            row.insert(header.clone(), value);
        }
        if !is_blank_row(&row) {
            rows.push(row);
        }
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read workbook source");
    Ok(rows)
}

/// Convert a worksheet cell into a raw JSON value.
pub(crate) fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(text) if text.trim().is_empty() => Value::Null,
        Data::String(text) => Value::String(text.clone()),
        Data::Int(value) => Value::from(*value),
        Data::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
        Data::Bool(value) => Value::Bool(*value),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_conversion() {
        assert_eq!(cell_value(&Data::Empty), Value::Null);
        assert_eq!(cell_value(&Data::String("  ".to_string())), Value::Null);
        assert_eq!(cell_value(&Data::String("A1".to_string())), json!("A1"));
        assert_eq!(cell_value(&Data::Int(7)), json!(7));
        assert_eq!(cell_value(&Data::Float(2.5)), json!(2.5));
        assert_eq!(cell_value(&Data::Float(f64::NAN)), Value::Null);
        assert_eq!(cell_value(&Data::Bool(true)), json!(true));
    }

    #[test]
    fn corrupt_workbook_is_a_workbook_error() {
        let mut file = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        std::io::Write::write_all(&mut file, b"not a zip archive").unwrap();
        let result = read_workbook_rows(file.path());
        assert!(matches!(result, Err(IngestError::Workbook { .. })));
    }
}
