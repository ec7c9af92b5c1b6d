//! Error taxonomy shared by the store, resolver, and migration engine.

/// Failure modes surfaced by the template store and its collaborators.
///
/// Validation problems are collected exhaustively before any write, so
/// [`StoreError::ValidationFailed`] always carries the full violation list.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No template matched the supplied identifier.
    #[error("no template matches '{0}'")]
    NotFound(String),

    /// A short-hash prefix matched more than one template on disk.
    #[error("identifier '{identifier}' is ambiguous: matches {}", .matches.join(", "))]
    Ambiguous {
        /// The prefix the caller supplied.
        identifier: String,
        /// Every id the prefix matched, sorted.
        matches: Vec<String>,
    },

    /// The computed id already has a directory in the store.
    #[error("template '{0}' already exists")]
    Conflict(String),

    /// Exhaustive list of validation rule violations; nothing was written.
    #[error("template validation failed:\n  {}", .0.join("\n  "))]
    ValidationFailed(Vec<String>),

    /// A dependency id could not be resolved while computing a closure.
    #[error("missing dependency '{0}'")]
    MissingDependency(String),

    /// A migration step failed after the backup was taken. The original
    /// definition file has already been restored when this surfaces.
    #[error("migration of '{template}' failed: {detail}")]
    Migration {
        /// Directory name of the template being migrated.
        template: String,
        /// The underlying failure.
        detail: String,
    },

    /// A document on disk could not be parsed or did not match the schema.
    #[error("malformed definition at {path}: {detail}")]
    Malformed {
        /// Path of the offending file.
        path: String,
        /// Parser diagnostic.
        detail: String,
    },

    /// An I/O or hashing failure, wrapped with the path or id being worked on.
    #[error("{context}: {source}")]
    Io {
        /// What the store was doing when the failure occurred.
        context: String,
        /// The underlying failure.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wraps a port-level failure with call-site context.
    pub(crate) fn io(
        context: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Io { context: context.into(), source }
    }
}

/// Result alias defaulting to [`StoreError`].
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
