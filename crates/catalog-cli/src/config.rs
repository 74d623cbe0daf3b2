//! Run configuration loaded from `catalog-sync.toml`.
//!
//! Every key is optional. The secret can also come from the
//! `CATALOG_SYNC_SECRET` environment variable, which wins over the file.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use catalog_core::DEFAULT_VERSION_KEY;
use catalog_ingest::{ColumnMap, DEFAULT_EXTENSIONS};
use serde::Deserialize;
use tracing::{debug, info};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "catalog-sync.toml";
/// Environment variable overriding `secret`.
pub const SECRET_ENV: &str = "CATALOG_SYNC_SECRET";

#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Directory watched for source files (non-recursive).
    pub watch_dir: PathBuf,
    /// Where published sources are copied; the next run's baseline.
    pub archive_dir: PathBuf,
    pub publication_file: PathBuf,
    /// Page whose `?v=` markers are refreshed. An empty path disables it.
    pub companion_file: Option<PathBuf>,
    pub version_key: String,
    pub secret: String,
    /// Recognized source extensions, without the dot.
    pub extensions: Vec<String>,
    pub columns: ColumnMap,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("."),
            archive_dir: PathBuf::from("excel"),
            publication_file: PathBuf::from("productos.json"),
            companion_file: Some(PathBuf::from("index.html")),
            version_key: DEFAULT_VERSION_KEY.to_string(),
            secret: String::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            columns: ColumnMap::default(),
        }
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("watch_dir", &self.watch_dir)
            .field("archive_dir", &self.archive_dir)
            .field("publication_file", &self.publication_file)
            .field("companion_file", &self.companion_file)
            .field("version_key", &self.version_key)
            .field("secret", &"<redacted>")
            .field("extensions", &self.extensions)
            .field("columns", &self.columns)
            .finish()
    }
}

impl SyncConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("parse configuration")?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Replace the secret when `secret` is set and non-empty.
    #[must_use]
    pub fn with_secret_override(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.secret = secret;
        }
        self
    }

    /// The companion page, unless disabled.
    #[must_use]
    pub fn companion(&self) -> Option<&Path> {
        self.companion_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.secret.is_empty() {
            bail!("secret is empty: set `secret` in {DEFAULT_CONFIG_FILE} or {SECRET_ENV}");
        }
        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            bail!("`extensions` must list at least one file extension");
        }
        if same_location(&self.watch_dir, &self.archive_dir) {
            bail!(
                "`archive_dir` must differ from `watch_dir` ({})",
                self.watch_dir.display()
            );
        }
        Ok(())
    }
}

/// Load the configuration for this process.
///
/// An explicit path must exist. Without one, `catalog-sync.toml` in the
/// working directory is used when present, otherwise the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<SyncConfig> {
    let config = match explicit {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            SyncConfig::from_file(path)?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            info!(path = DEFAULT_CONFIG_FILE, "loading configuration");
            SyncConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => {
            debug!("no configuration file, using defaults");
            SyncConfig::default()
        }
    };
    let config = config.with_secret_override(std::env::var(SECRET_ENV).ok());
    config.validate()?;
    debug!(?config, "configuration ready");
    Ok(config)
}

fn same_location(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| p.canonicalize().unwrap_or_else(|_| p.components().collect());
    resolve(a) == resolve(b)
}
