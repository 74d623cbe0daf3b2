//! Writing the publication file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CoreError, Result};

/// Replace `path` with `payload`.
///
/// The text goes to a sibling temp file first and is renamed over the
/// target, so readers see either the old payload or the new one.
pub fn write_publication(path: &Path, payload: &str) -> Result<()> {
    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, payload);
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename(tmp: &Path, path: &Path, payload: &str) -> Result<()> {
    let mut file = std::fs::File::create(tmp).map_err(|e| CoreError::io(tmp, e))?;
    file.write_all(payload.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| CoreError::io(tmp, e))?;
    drop(file);
    std::fs::rename(tmp, path).map_err(|e| CoreError::io(path, e))?;
    debug!(path = %path.display(), bytes = payload.len(), "publication written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
