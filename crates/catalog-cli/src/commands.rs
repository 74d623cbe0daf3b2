use std::path::Path;

use anyhow::{Context, Result};
use catalog_core::{SecureEncoder, diff_snapshots};
use catalog_ingest::read_snapshot;
use catalog_model::{ChangeSet, PublicationDocument};
use tracing::info_span;

use catalog_cli::config::SyncConfig;
use catalog_cli::pipeline::{Pipeline, RunOptions};
use catalog_cli::types::RunReport;
use catalog_cli::watch::{WatchLoop, shutdown_flag};

use crate::cli::{DecodeArgs, DiffArgs, PublishArgs};
use crate::summary::{print_changes, print_run_summary};

pub fn run_watch(config: &SyncConfig) -> Result<()> {
    let shutdown = shutdown_flag()?;
    let pipeline = Pipeline::new(config)?;
    let mut watch = WatchLoop::new(&pipeline, config.watch_dir.clone(), config.extensions.clone());

    if let Some(report) = watch.startup_run() {
        print_run_summary(&report);
    }
    watch.run(&shutdown, print_run_summary)
}

pub fn run_publish(config: &SyncConfig, args: &PublishArgs) -> Result<RunReport> {
    let pipeline = Pipeline::new(config)?;
    pipeline.run(
        &args.source,
        RunOptions {
            dry_run: args.dry_run,
        },
    )
}

pub fn run_decode(config: &SyncConfig, args: &DecodeArgs) -> Result<PublicationDocument> {
    let path = args.file.as_deref().unwrap_or(config.publication_file.as_path());
    decode_file(&SecureEncoder::new(&config.secret), path)
}

pub fn run_diff(config: &SyncConfig, args: &DiffArgs) -> Result<Option<ChangeSet>> {
    let span = info_span!("diff", current = %args.current.display(), prior = %args.prior.display());
    let _guard = span.enter();
    let current = read_snapshot(&args.current, &config.columns)
        .with_context(|| format!("read {}", args.current.display()))?;
    let prior = read_snapshot(&args.prior, &config.columns)
        .with_context(|| format!("read {}", args.prior.display()))?;
    Ok(diff_snapshots(&current, &prior))
}

pub fn print_document(document: &PublicationDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("render document")?;
    println!("{json}");
    Ok(())
}

pub fn print_diff(changes: Option<&ChangeSet>) {
    match changes {
        Some(changes) => print_changes(changes),
        None => println!("No changes."),
    }
}

fn decode_file(encoder: &SecureEncoder, path: &Path) -> Result<PublicationDocument> {
    let payload =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    encoder
        .decode(&payload)
        .with_context(|| format!("decode {}", path.display()))
}
