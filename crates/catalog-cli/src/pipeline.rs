//! One publication run, in explicit stages.
//!
//! 1. **Read**: load and normalize the source file
//! 2. **Detect**: diff against the newest archived snapshot
//! 3. **Assemble** and **Encode** the publication document
//! 4. **Publish**: replace the publication file
//! 5. **Archive**: copy the source into the archive directory
//! 6. **Cache-bust**: refresh version markers in the companion page
//!
//! A failure before stage 4 aborts the run and leaves the previous
//! publication untouched. Failures in stages 5 and 6 are logged and reported
//! but do not undo the publication.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use catalog_core::{
    ArchiveBaseline, CacheBustOutcome, CacheBuster, Clock, SecureEncoder, SnapshotArchive,
    SystemClock, assemble, detect, sha256_hex, version_token, write_publication,
};
use catalog_ingest::{ColumnMap, read_snapshot};
use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn};

use crate::config::SyncConfig;
use crate::types::{ArchiveStatus, CacheBustStatus, RunReport};

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after encoding; write nothing.
    pub dry_run: bool,
}

/// The publication pipeline with everything it needs for a run.
#[derive(Debug)]
pub struct Pipeline<C = SystemClock> {
    columns: ColumnMap,
    publication_file: PathBuf,
    encoder: SecureEncoder,
    archive: SnapshotArchive,
    cache_buster: Option<CacheBuster>,
    clock: C,
    run_lock: Mutex<()>,
}

impl Pipeline<SystemClock> {
    /// Build a pipeline on the wall clock.
    ///
    /// Creates the archive directory; failing to do so is fatal.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Pipeline<C> {
    pub fn with_clock(config: &SyncConfig, clock: C) -> Result<Self> {
        let archive = SnapshotArchive::open(&config.archive_dir, config.extensions.clone())
            .with_context(|| format!("open archive {}", config.archive_dir.display()))?;
        let cache_buster = config
            .companion()
            .map(|path| CacheBuster::new(path, &config.version_key))
            .transpose()
            .context("configure cache busting")?;
        Ok(Self {
            columns: config.columns.clone(),
            publication_file: config.publication_file.clone(),
            encoder: SecureEncoder::new(&config.secret),
            archive,
            cache_buster,
            clock,
            run_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn encoder(&self) -> &SecureEncoder {
        &self.encoder
    }

    /// Run every stage for `source`.
    ///
    /// Runs are serialized: a second caller waits for the first to finish.
    pub fn run(&self, source: &Path, options: RunOptions) -> Result<RunReport> {
        let _running = self
            .run_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let span = info_span!("pipeline", source = %source.display(), dry_run = options.dry_run);
        let _guard = span.enter();
        let started = Instant::now();

        // Stage 1: read
        let snapshot = read_snapshot(source, &self.columns)
            .with_context(|| format!("read source {}", source.display()))?;
        info!(products = snapshot.len(), "source read");

        // Stage 2: detect (before archiving, or the source would be its own baseline)
        let changes = detect(&snapshot, &ArchiveBaseline::new(&self.archive, &self.columns));
        match &changes {
            Some(set) => info!(
                new_items = set.new_items.len(),
                price_changes = set.price_changes.len(),
                "changes detected"
            ),
            None => info!("no changes to report"),
        }

        // Stage 3: assemble + encode
        let source_info = snapshot.source.clone();
        let timestamp = self.clock.now();
        let document = assemble(snapshot, changes, timestamp);
        let payload = self
            .encoder
            .encode(&document)
            .context("encode publication")?;
        let digest = sha256_hex(payload.as_bytes());
        debug!(bytes = payload.len(), sha256 = %digest, "payload encoded");

        let mut report = RunReport {
            source: source_info,
            timestamp,
            total_products: document.metadata.total_products,
            changes: document.changes,
            publication: None,
            digest,
            archive: ArchiveStatus::NotRun,
            cache_bust: CacheBustStatus::NotRun,
            elapsed: started.elapsed(),
        };
        if options.dry_run {
            info!("dry run, nothing written");
            return Ok(report);
        }

        // Stage 4: publish
        write_publication(&self.publication_file, &payload)
            .with_context(|| format!("write {}", self.publication_file.display()))?;
        info!(path = %self.publication_file.display(), "publication written");
        report.publication = Some(self.publication_file.clone());

        // Stage 5: archive
        report.archive = match self.archive.archive(source) {
            Ok(path) => ArchiveStatus::Archived(path),
            Err(error) => {
                warn!(%error, "could not archive source");
                ArchiveStatus::Failed(error.to_string())
            }
        };

        // Stage 6: cache-bust
        report.cache_bust = self.cache_bust(timestamp);

        report.elapsed = started.elapsed();
        info!(elapsed_ms = report.elapsed.as_millis(), "run complete");
        Ok(report)
    }

    fn cache_bust(&self, now: DateTime<Utc>) -> CacheBustStatus {
        let Some(buster) = &self.cache_buster else {
            return CacheBustStatus::Done(CacheBustOutcome::Skipped);
        };
        match buster.apply(&version_token(now)) {
            Ok(outcome) => CacheBustStatus::Done(outcome),
            Err(error) => {
                warn!(%error, path = %buster.path().display(), "cache-bust failed");
                CacheBustStatus::Failed(error.to_string())
            }
        }
    }
}
