//! Publication stages for the catalog sync pipeline.
//!
//! Given a normalized [`catalog_model::Snapshot`], this crate:
//!
//! - diffs it against the archived baseline ([`detect`], [`diff_snapshots`])
//! - assembles the [`catalog_model::PublicationDocument`] ([`assemble`])
//! - obfuscates it for the web ([`SecureEncoder`])
//! - writes the publication file and archives the source ([`write_publication`], [`SnapshotArchive`])
//! - refreshes cache-bust markers in the companion page ([`CacheBuster`])

pub mod archive;
pub mod assemble;
pub mod cache_bust;
pub mod diff;
pub mod digest;
pub mod encode;
pub mod error;
pub mod publish;

pub use archive::{ArchiveBaseline, SnapshotArchive};
pub use assemble::{Clock, FixedClock, SystemClock, assemble};
pub use cache_bust::{CacheBustOutcome, CacheBuster, DEFAULT_VERSION_KEY, version_token};
pub use diff::{ArchiveLookup, BaselineSource, detect, diff_snapshots};
pub use digest::sha256_hex;
pub use encode::{KEY_LEN, SecureEncoder, derive_key};
pub use error::{CoreError, DecodeError, Result};
pub use publish::write_publication;
