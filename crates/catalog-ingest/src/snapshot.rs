//! Building a [`Snapshot`] from a source file.

use std::path::Path;

use catalog_model::{Snapshot, SourceInfo};
use chrono::{DateTime, Utc};

use crate::error::{IngestError, Result};
use crate::normalize::{ColumnMap, normalize_rows};
use crate::rows::read_rows;

/// Read and normalize a source file into a snapshot.
pub fn read_snapshot(path: &Path, columns: &ColumnMap) -> Result<Snapshot> {
    let source = source_info(path)?;
    let rows = read_rows(path)?;
    let records = normalize_rows(&rows, columns);
    tracing::debug!(
        source = %source.file_name,
        rows = rows.len(),
        "normalized snapshot"
    );
    Ok(Snapshot::new(source, records))
}

/// Provenance for `path`: file name and modification time.
pub fn source_info(path: &Path) -> Result<SourceInfo> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::io(path, e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SourceInfo {
        file_name,
        path: path.to_path_buf(),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
    })
}
