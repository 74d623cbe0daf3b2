//! Version-marker rewriting in the companion web page.
//!
//! The page links the publication as e.g. `productos.json?v=20260105100000`.
//! Refreshing the token after each publish forces browsers past stale caches.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::bytes::{NoExpand, Regex};
use tracing::{debug, info};

use crate::error::{CoreError, Result};

/// Marker key used when none is configured.
pub const DEFAULT_VERSION_KEY: &str = "v";

const TOKEN_FORMAT: &str = "%Y%m%d%H%M%S";

/// Cache-bust token for `now`: `YYYYMMDDhhmmss`.
#[must_use]
pub fn version_token(now: DateTime<Utc>) -> String {
    now.format(TOKEN_FORMAT).to_string()
}

/// What happened to the companion document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBustOutcome {
    /// No companion document configured.
    Skipped,
    /// Configured but absent on disk.
    Missing,
    /// Present but contains no marker.
    NoMarker,
    /// Markers already carry the token; nothing written.
    Unchanged,
    Rewritten { replacements: usize },
}

impl fmt::Display for CacheBustOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => f.write_str("skipped"),
            Self::Missing => f.write_str("missing"),
            Self::NoMarker => f.write_str("no marker"),
            Self::Unchanged => f.write_str("unchanged"),
            Self::Rewritten { replacements } => write!(f, "rewritten ({replacements})"),
        }
    }
}

/// Rewrites `key=token` markers in one document.
#[derive(Debug, Clone)]
pub struct CacheBuster {
    path: PathBuf,
    key: String,
    pattern: Regex,
}

impl CacheBuster {
    /// Prepare a rewriter for `path`.
    ///
    /// `key` must be non-empty and made of ASCII letters, digits or `_`.
    pub fn new(path: impl Into<PathBuf>, key: &str) -> Result<Self> {
        let valid = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
        if !valid {
            return Err(CoreError::InvalidVersionKey {
                key: key.to_string(),
            });
        }
        let pattern = Regex::new(&format!(r"\b{}=[A-Za-z0-9._-]+", regex::escape(key))).map_err(
            |_| CoreError::InvalidVersionKey {
                key: key.to_string(),
            },
        )?;
        Ok(Self {
            path: path.into(),
            key: key.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace every marker in `text` with `token`.
    ///
    /// Returns the new bytes and the number of markers found. Bytes outside
    /// markers are untouched.
    #[must_use]
    pub fn rewrite<'t>(&self, text: &'t [u8], token: &str) -> (Cow<'t, [u8]>, usize) {
        let count = self.pattern.find_iter(text).count();
        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }
        let replacement = format!("{}={token}", self.key);
        let rewritten = self
            .pattern
            .replace_all(text, NoExpand(replacement.as_bytes()));
        (rewritten, count)
    }

    /// Rewrite the document on disk, writing only when its bytes change.
    pub fn apply(&self, token: &str) -> Result<CacheBustOutcome> {
        let original = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "companion document not found");
                return Ok(CacheBustOutcome::Missing);
            }
            Err(e) => return Err(CoreError::io(&self.path, e)),
        };

        let (rewritten, replacements) = self.rewrite(&original, token);
        if replacements == 0 {
            debug!(path = %self.path.display(), key = %self.key, "no version marker");
            return Ok(CacheBustOutcome::NoMarker);
        }
        if rewritten.as_ref() == original.as_slice() {
            return Ok(CacheBustOutcome::Unchanged);
        }

        std::fs::write(&self.path, rewritten.as_ref()).map_err(|e| CoreError::io(&self.path, e))?;
        info!(
            path = %self.path.display(),
            replacements,
            token,
            "cache-bust markers updated"
        );
        Ok(CacheBustOutcome::Rewritten { replacements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn buster() -> CacheBuster {
        CacheBuster::new("index.html", DEFAULT_VERSION_KEY).unwrap()
    }

    #[test]
    fn token_format() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 3, 7).unwrap();
        assert_eq!(version_token(at), "20260105090307");
    }

    #[test]
    fn rewrites_every_marker() {
        let html = b"<script src=\"app.js?v=1\"></script><a href=\"productos.json?v=abc.1-2\">";
        let (out, count) = buster().rewrite(html, "20260105100000");
        assert_eq!(count, 2);
        assert_eq!(
            out.as_ref(),
            b"<script src=\"app.js?v=20260105100000\"></script><a href=\"productos.json?v=20260105100000\">"
                .as_slice()
        );
    }

    #[test]
    fn requires_word_boundary() {
        let (out, count) = buster().rewrite(b"dev=1 nav=2 ?v=3", "T");
        assert_eq!(count, 1);
        assert_eq!(out.as_ref(), b"dev=1 nav=2 ?v=T".as_slice());
    }

    #[test]
    fn non_utf8_bytes_survive() {
        let html = b"\xff\xfe caf\xe9 ?v=1 \x00";
        let (out, _) = buster().rewrite(html, "9");
        assert_eq!(out.as_ref(), b"\xff\xfe caf\xe9 ?v=9 \x00".as_slice());
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(CacheBuster::new("index.html", "").is_err());
        assert!(CacheBuster::new("index.html", "v.x").is_err());
        assert!(CacheBuster::new("index.html", "version_2").is_ok());
    }

    #[test]
    fn apply_outcomes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.html");
        let buster = CacheBuster::new(&path, "v").unwrap();

        assert_eq!(buster.apply("1").unwrap(), CacheBustOutcome::Missing);

        std::fs::write(&path, "<p>nothing here</p>").unwrap();
        assert_eq!(buster.apply("1").unwrap(), CacheBustOutcome::NoMarker);

        std::fs::write(&path, "a.js?v=0 b.css?v=0").unwrap();
        assert_eq!(
            buster.apply("1").unwrap(),
            CacheBustOutcome::Rewritten { replacements: 2 }
        );
        assert_eq!(buster.apply("1").unwrap(), CacheBustOutcome::Unchanged);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a.js?v=1 b.css?v=1");
    }

    #[test]
    fn outcome_display() {
        assert_eq!(
            CacheBustOutcome::Rewritten { replacements: 3 }.to_string(),
            "rewritten (3)"
        );
        assert_eq!(CacheBustOutcome::NoMarker.to_string(), "no marker");
    }
}
