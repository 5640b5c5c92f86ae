//! Content digests for encoded variants.

use sha2::{Digest, Sha256};

/// SHA-256 of `bytes`, returned as a lowercase hex string.
///
/// Reported with each variant; it plays no part in naming or deduplication.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}
