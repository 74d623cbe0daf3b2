//! Error types for the publication stages.

use std::path::PathBuf;
use std::string::FromUtf8Error;

use catalog_ingest::IngestError;
use thiserror::Error;

/// Errors raised by change detection, encoding and file output.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Filesystem access failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive location exists but is not a directory.
    #[error("archive path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Document could not be serialized to JSON.
    #[error("failed to serialize publication document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Reading a source or archived snapshot failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Publication payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Cache-bust key would not form a usable marker pattern.
    #[error("invalid version key {key:?}: use letters, digits or '_'")]
    InvalidVersionKey { key: String },
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why an encoded payload could not be turned back into a document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Bad block length or padding; usually the wrong secret.
    #[error("payload does not decrypt with the configured secret")]
    Cipher,

    #[error("decrypted payload is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("decrypted payload is not a publication document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
