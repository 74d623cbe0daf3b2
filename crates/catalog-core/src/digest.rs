//! SHA-256 fingerprints of published payloads.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of an in-memory payload.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
