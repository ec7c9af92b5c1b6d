//! Read-only listing projection.

use serde::{Deserialize, Serialize};

/// Projection of a template used for listings and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    /// Content hash identity.
    pub id: String,
    /// Template name.
    pub name: String,
    /// Semver version string.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Human aliases currently bound to the id.
    pub aliases: Vec<String>,
    /// Whether the template's directory is present in this store. Listings
    /// over the local store always report `true`; the flag exists for
    /// consumers merging entries from elsewhere.
    pub installed: bool,
}
