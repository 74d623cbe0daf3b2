//! CLI argument definitions for catalog-sync.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "catalog-sync",
    version,
    about = "Publish a product catalog as an obfuscated feed whenever the source changes",
    long_about = "Watch a folder for catalog spreadsheets (.xlsx, .xls, .ods, .csv), diff each\n\
                  new version against the last archived one, and publish the encoded feed\n\
                  consumed by the web front-end."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./catalog-sync.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Publish the newest source file, then republish on every change.
    Watch,

    /// Run the pipeline once for a source file.
    Publish(PublishArgs),

    /// Decode a publication file and print it as JSON.
    Decode(DecodeArgs),

    /// Show the changes between two source files.
    Diff(DiffArgs),
}

#[derive(Parser)]
pub struct PublishArgs {
    /// Catalog spreadsheet or CSV export.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Detect, assemble and encode, but write nothing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct DecodeArgs {
    /// Publication file (default: the configured one).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// The newer source file.
    #[arg(value_name = "CURRENT")]
    pub current: PathBuf,

    /// The baseline to compare against.
    #[arg(value_name = "PRIOR")]
    pub prior: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
