//! Cache-key derivation.
//!
//! A cache key is the SHA-256 digest of the exact query bytes, lowercase-hex
//! encoded. No normalization is applied: two queries differing only in
//! whitespace are distinct entries on purpose, since the derivation contract
//! is byte-exact over the input as received.

use sha2::{Digest, Sha256};

/// Length of a derived key in hex characters (SHA-256 = 32 bytes).
pub const KEY_LEN: usize = 64;

/// Derive the cache key for a query string.
///
/// Deterministic and unseeded: byte-identical queries always map to the same
/// key, and distinct queries collide only with cryptographic improbability.
pub fn derive(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    format!("{:x}", hasher.finalize())
}
