//! Service context bundling all port trait objects.

use chrono::DateTime;

use crate::adapters::live::{LiveClock, LiveFileSystem, Sha256Digest};
use crate::adapters::mem::{FixedClock, MemFileSystem};
use crate::ports::clock::Clock;
use crate::ports::digest::ContentDigest;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors wire up
/// different adapter families; tests may also assemble a context field by
/// field to mix adapters.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for store I/O.
    pub fs: Box<dyn FileSystem>,
    /// Digest used to derive template identity.
    pub digest: Box<dyn ContentDigest>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for filesystem, clock, and
    /// digest.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            digest: Box::new(Sha256Digest),
        }
    }

    /// Creates a fully in-memory context: empty filesystem, clock frozen at
    /// the Unix epoch, real SHA-256 digest.
    ///
    /// Useful for multi-store tests that must not touch the disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            clock: Box::new(FixedClock::at(DateTime::UNIX_EPOCH)),
            fs: Box::new(MemFileSystem::new()),
            digest: Box::new(Sha256Digest),
        }
    }
}
