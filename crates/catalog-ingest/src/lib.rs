//! Catalog source ingestion.
//!
//! This crate turns a spreadsheet or CSV export of the product catalog into a
//! normalized [`catalog_model::Snapshot`].
//!
//! # Features
//!
//! - **Discovery**: find source files by extension, newest first
//! - **Readers**: CSV (UTF-8 or Windows-1252) and workbooks (`.xlsx`, `.xls`, `.ods`)
//! - **Normalization**: configurable column names, best-effort defaults
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use catalog_ingest::{ColumnMap, read_snapshot};
//!
//! let snapshot = read_snapshot(Path::new("precios.xlsx"), &ColumnMap::default())?;
//! println!("{} products", snapshot.len());
//! ```

mod csv;
mod discovery;
mod error;
mod normalize;
mod rows;
mod snapshot;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use crate::csv::{
    MAX_SOURCE_FILE_SIZE, check_file_size, check_file_size_with_limit, decode_text,
    read_csv_rows, validate_encoding,
};
pub use rows::{RawRow, is_blank_row, read_rows};
pub use workbook::read_workbook_rows;

// === File Discovery ===
pub use discovery::{
    DEFAULT_EXTENSIONS, SourceFormat, is_ignored_name, is_source_file, newest_source_file,
};

// === Normalization ===
pub use normalize::{ColumnMap, NUMERIC_DEFAULT, TEXT_DEFAULT, normalize_row, normalize_rows};
pub use snapshot::{read_snapshot, source_info};
