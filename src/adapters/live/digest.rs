//! SHA-256 adapter for the `ContentDigest` port.

use sha2::{Digest, Sha256};

use crate::ports::digest::ContentDigest;

/// SHA-256 digest producing 64 lowercase hex characters.
pub struct Sha256Digest;

impl ContentDigest for Sha256Digest {
    fn hex_digest(&self, bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}
