use std::path::PathBuf;
use std::time::Duration;

use catalog_core::CacheBustOutcome;
use catalog_model::{ChangeSet, SourceInfo};
use chrono::{DateTime, Utc};

/// What one pipeline run did.
#[derive(Debug)]
pub struct RunReport {
    pub source: SourceInfo,
    pub timestamp: DateTime<Utc>,
    pub total_products: usize,
    pub changes: Option<ChangeSet>,
    /// `None` on a dry run.
    pub publication: Option<PathBuf>,
    /// Hex SHA-256 of the encoded payload.
    pub digest: String,
    pub archive: ArchiveStatus,
    pub cache_bust: CacheBustStatus,
    pub elapsed: Duration,
}

impl RunReport {
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.publication.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveStatus {
    Archived(PathBuf),
    /// Copy failed; the publication still stands.
    Failed(String),
    NotRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBustStatus {
    Done(CacheBustOutcome),
    Failed(String),
    NotRun,
}
