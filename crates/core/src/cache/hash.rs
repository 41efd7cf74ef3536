//! Short fingerprints for secrets that show up in logs.

use sha2::{Digest, Sha256};

/// Hex length of a fingerprint.
const FINGERPRINT_LEN: usize = 12;

/// Identify a signature or token in logs without writing the secret itself.
pub fn fingerprint(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(FINGERPRINT_LEN);
    digest
}
