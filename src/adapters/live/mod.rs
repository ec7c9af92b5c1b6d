//! Live adapters backed by the real system.

pub mod clock;
pub mod digest;
pub mod filesystem;

pub use clock::LiveClock;
pub use digest::Sha256Digest;
pub use filesystem::LiveFileSystem;
