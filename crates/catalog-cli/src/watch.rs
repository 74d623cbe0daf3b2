//! Watch mode: a start-up run, then one run per changed source file.
//!
//! The notify watcher thread only forwards events over a channel. All runs
//! happen on the calling thread, so triggers that arrive mid-run queue up
//! and are handled afterwards.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use catalog_core::Clock;
use catalog_ingest::{is_source_file, newest_source_file};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::{debug, error, info, warn};

use crate::pipeline::{Pipeline, RunOptions};
use crate::types::RunReport;

/// How often the loop wakes to check for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Coalesces repeated notifications for the same file.
///
/// A file name triggers only if it differs from the last one handled. Saving
/// a workbook fires several modify events; only the first starts a run.
#[derive(Debug, Default)]
pub struct Debouncer {
    last_handled: Option<String>,
}

impl Debouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `file_name` and report whether it should start a run.
    pub fn should_trigger(&mut self, file_name: &str) -> bool {
        if self.last_handled.as_deref() == Some(file_name) {
            return false;
        }
        self.last_handled = Some(file_name.to_string());
        true
    }

    #[must_use]
    pub fn last_handled(&self) -> Option<&str> {
        self.last_handled.as_deref()
    }
}

/// Source files named by a notify event worth acting on.
#[must_use]
pub fn triggering_paths(event: &Event, extensions: &[String]) -> Vec<PathBuf> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|path| is_source_file(path, extensions))
        .cloned()
        .collect()
}

/// Install SIGINT/SIGTERM handlers that raise the returned flag.
pub fn shutdown_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&flag))
            .with_context(|| format!("register handler for signal {signal}"))?;
    }
    Ok(flag)
}

/// Watches `watch_dir` and runs the pipeline until `shutdown` is raised.
pub struct WatchLoop<'a, C> {
    pipeline: &'a Pipeline<C>,
    watch_dir: PathBuf,
    extensions: Vec<String>,
    debouncer: Debouncer,
}

impl<'a, C: Clock> WatchLoop<'a, C> {
    #[must_use]
    pub fn new(pipeline: &'a Pipeline<C>, watch_dir: PathBuf, extensions: Vec<String>) -> Self {
        Self {
            pipeline,
            watch_dir,
            extensions,
            debouncer: Debouncer::new(),
        }
    }

    /// Publish the newest source already present, if any.
    pub fn startup_run(&self) -> Option<RunReport> {
        let newest = match newest_source_file(&self.watch_dir, &self.extensions, None) {
            Ok(newest) => newest,
            Err(error) => {
                warn!(%error, "could not scan watch directory");
                return None;
            }
        };
        let Some(path) = newest else {
            info!(dir = %self.watch_dir.display(), "no source file yet, waiting for changes");
            return None;
        };
        info!(path = %path.display(), "processing existing source file");
        self.run_logged(&path)
    }

    /// Handle one watcher event, returning the reports of any runs.
    pub fn handle_event(&mut self, event: &Event) -> Vec<RunReport> {
        let mut reports = Vec::new();
        for path in triggering_paths(event, &self.extensions) {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !self.debouncer.should_trigger(name) {
                debug!(file = name, "repeat notification ignored");
                continue;
            }
            info!(file = name, "change detected");
            if let Some(report) = self.run_logged(&path) {
                reports.push(report);
            }
        }
        reports
    }

    /// Watch until `shutdown` is raised, calling `on_report` after each run.
    pub fn run(
        &mut self,
        shutdown: &AtomicBool,
        mut on_report: impl FnMut(&RunReport),
    ) -> Result<()> {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx).context("create file watcher")?;
        watcher
            .watch(&self.watch_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watch {}", self.watch_dir.display()))?;
        info!(dir = %self.watch_dir.display(), "watching for changes (Ctrl+C to stop)");

        while !shutdown.load(Ordering::Relaxed) {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => {
                    for report in self.handle_event(&event) {
                        on_report(&report);
                    }
                }
                Ok(Err(error)) => warn!(%error, "watcher error"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("watcher stopped delivering events");
                    break;
                }
            }
        }

        drop(watcher);
        info!("shutting down");
        Ok(())
    }

    fn run_logged(&self, path: &Path) -> Option<RunReport> {
        match self.pipeline.run(path, RunOptions::default()) {
            Ok(report) => Some(report),
            Err(error) => {
                error!(error = %format!("{error:#}"), "run failed, previous publication kept");
                None
            }
        }
    }
}
