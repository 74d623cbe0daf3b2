//! CSV file reading into raw row mappings.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use serde_json::Value;

use crate::error::{IngestError, Result};
use crate::rows::{RawRow, is_blank_row};

/// Maximum file size for source loading (100 MB default).
pub const MAX_SOURCE_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_SOURCE_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::io(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported.
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::io(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| IngestError::io(path, e))?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Decode raw bytes as UTF-8 (BOM stripped), falling back to Windows-1252.
///
/// Spreadsheet exports on Spanish-locale Windows machines are commonly
/// Windows-1252, so headers like `Código` would otherwise be mangled.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!("source is not valid UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Reads a CSV file into ordered row mappings keyed by trimmed header.
///
/// Empty cells map to `null`; rows where every cell is empty are dropped.
/// Columns with a blank header are ignored.
pub fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    check_file_size(path)?;
    validate_encoding(path)?;

    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let text = decode_text(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut row = RawRow::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = match record.get(index) {
                Some(cell) if !cell.trim().is_empty() => Value::String(cell.to_string()),
                _ => Value::Null,
            };
            row.insert(header.clone(), value);
        }
        if !is_blank_row(&row) {
            rows.push(row);
        }
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read CSV source");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_rows_keeps_order_and_nulls_empty_cells() {
        let file = create_temp_csv(b"Codigo,Precio\nA1,5\nB2,\n");
        let rows = read_csv_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Codigo"], "A1");
        assert_eq!(rows[0]["Precio"], "5");
        assert!(rows[1]["Precio"].is_null());
    }

    #[test]
    fn test_read_csv_rows_with_bom_and_padded_headers() {
        let file = create_temp_csv("\u{feff} Codigo ,Unidad\nA1,UN\n".as_bytes());
        let rows = read_csv_rows(file.path()).unwrap();

        assert_eq!(rows[0]["Codigo"], "A1");
    }

    #[test]
    fn test_read_csv_rows_skips_blank_rows() {
        let file = create_temp_csv(b"Codigo,Precio\nA1,5\n,\nB2,6\n");
        let rows = read_csv_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["Codigo"], "B2");
    }

    #[test]
    fn test_read_csv_rows_short_record_yields_nulls() {
        let file = create_temp_csv(b"Codigo,Precio,Unidad\nA1\n");
        let rows = read_csv_rows(file.path()).unwrap();

        assert_eq!(rows[0]["Codigo"], "A1");
        assert!(rows[0]["Unidad"].is_null());
    }

    #[test]
    fn test_decode_text_windows_1252_fallback() {
        // "Código" with 0xF3 for ó.
        let text = decode_text(b"C\xF3digo");
        assert_eq!(text, "Código");
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'A', 0x00]);
        let result = validate_encoding(file.path());

        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_check_file_size_with_limit() {
        let file = create_temp_csv(b"Codigo\nA1\n");
        assert!(check_file_size_with_limit(file.path(), 1024).is_ok());
        assert!(matches!(
            check_file_size_with_limit(file.path(), 4),
            Err(IngestError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_rows(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
