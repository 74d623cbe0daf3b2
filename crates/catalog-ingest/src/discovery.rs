//! Source file discovery and format detection.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{IngestError, Result};

/// Extensions recognized when no explicit list is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods", "csv"];

/// How a source file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text with a header row.
    Csv,
    /// Spreadsheet workbook (first worksheet, first row is the header).
    Workbook,
}

impl SourceFormat {
    /// Detect the format from the file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Whether a file name is an editor artifact rather than a real source.
///
/// Office writes `~$name.xlsx` lock files next to open workbooks; hidden
/// files are usually temp saves.
#[must_use]
pub fn is_ignored_name(file_name: &str) -> bool {
    file_name.starts_with("~$") || file_name.starts_with('.')
}

/// Whether `path` names a source file with one of `extensions`.
///
/// Only the name is inspected; the file does not have to exist.
#[must_use]
pub fn is_source_file(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if is_ignored_name(name) {
        return false;
    }
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// The most recently modified source file in `dir`, skipping `exclude_name`.
///
/// Ties on modification time are broken by file name so the result is stable.
pub fn newest_source_file(
    dir: &Path,
    extensions: &[String],
    exclude_name: Option<&str>,
) -> Result<Option<PathBuf>> {
    let newest = source_entries(dir, extensions)?
        .into_iter()
        .filter(|(path, _)| {
            exclude_name.is_none_or(|excluded| {
                path.file_name().and_then(|n| n.to_str()) != Some(excluded)
            })
        })
        .max_by(|(a_path, a_time), (b_path, b_time)| {
            a_time
                .cmp(b_time)
                .then_with(|| a_path.file_name().cmp(&b_path.file_name()))
        })
        .map(|(path, _)| path);
    Ok(newest)
}

fn source_entries(dir: &Path, extensions: &[String]) -> Result<Vec<(PathBuf, SystemTime)>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() || !is_source_file(&path, extensions) {
            continue;
        }

        // A file can vanish between listing and stat; skip it rather than fail.
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            tracing::debug!(path = %path.display(), "skipping file without readable mtime");
            continue;
        };
        files.push((path, modified));
    }
    Ok(files)
}
