//! The archive directory: the last published copy of every source file.

use std::path::{Path, PathBuf};

use catalog_ingest::{ColumnMap, newest_source_file, read_snapshot};
use catalog_model::Snapshot;
use tracing::{debug, info};

use crate::diff::{ArchiveLookup, BaselineSource};
use crate::error::{CoreError, Result};

/// Directory holding archived source files.
#[derive(Debug, Clone)]
pub struct SnapshotArchive {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl SnapshotArchive {
    /// Open the archive, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>, extensions: Vec<String>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| CoreError::io(&dir, e))?;
        if !dir.is_dir() {
            return Err(CoreError::NotADirectory { path: dir });
        }
        debug!(dir = %dir.display(), "archive ready");
        Ok(Self { dir, extensions })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `source` lands in the archive.
    #[must_use]
    pub fn destination(&self, source: &Path) -> Option<PathBuf> {
        source.file_name().map(|name| self.dir.join(name))
    }

    /// Copy `source` into the archive under its own file name.
    ///
    /// An existing copy is overwritten and keeps the source's modification
    /// time. Copying a file onto itself is a no-op.
    pub fn archive(&self, source: &Path) -> Result<PathBuf> {
        let Some(destination) = self.destination(source) else {
            return Err(CoreError::io(
                source,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "source has no file name"),
            ));
        };

        if same_file(source, &destination) {
            debug!(path = %destination.display(), "source already lives in archive");
            return Ok(destination);
        }

        std::fs::copy(source, &destination).map_err(|e| CoreError::io(&destination, e))?;
        copy_modified_time(source, &destination)?;
        info!(
            source = %source.display(),
            destination = %destination.display(),
            "archived source file"
        );
        Ok(destination)
    }
}

impl ArchiveLookup for SnapshotArchive {
    fn latest_excluding(&self, file_name: &str) -> Result<Option<PathBuf>> {
        Ok(newest_source_file(
            &self.dir,
            &self.extensions,
            Some(file_name),
        )?)
    }
}

/// Baseline lookup orders archived files by mtime, so copies carry the
/// source's time rather than the copy time.
fn copy_modified_time(source: &Path, destination: &Path) -> Result<()> {
    let modified = std::fs::metadata(source)
        .and_then(|meta| meta.modified())
        .map_err(|e| CoreError::io(source, e))?;
    std::fs::File::options()
        .write(true)
        .open(destination)
        .and_then(|file| file.set_modified(modified))
        .map_err(|e| CoreError::io(destination, e))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Loads the baseline snapshot from whatever an [`ArchiveLookup`] finds.
#[derive(Debug)]
pub struct ArchiveBaseline<'a, L> {
    lookup: &'a L,
    columns: &'a ColumnMap,
}

impl<'a, L: ArchiveLookup> ArchiveBaseline<'a, L> {
    #[must_use]
    pub fn new(lookup: &'a L, columns: &'a ColumnMap) -> Self {
        Self { lookup, columns }
    }
}

impl<L: ArchiveLookup> BaselineSource for ArchiveBaseline<'_, L> {
    fn load_baseline(&self, current_file_name: &str) -> Result<Option<Snapshot>> {
        let Some(path) = self.lookup.latest_excluding(current_file_name)? else {
            return Ok(None);
        };
        let snapshot = read_snapshot(&path, self.columns)?;
        Ok(Some(snapshot))
    }
}
