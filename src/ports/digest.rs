//! Digest port for content hashing.

/// Computes a 256-bit content digest.
///
/// The digest defines template identity, so implementations must be stable
/// across processes and platforms for the same input bytes.
pub trait ContentDigest: Send + Sync {
    /// Returns the digest of `bytes` as 64 lowercase hex characters.
    fn hex_digest(&self, bytes: &[u8]) -> String;
}
