//! Core template type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rules::TemplateRules;

/// A reusable project template, identified by the hash of its content.
///
/// `id` is derived: it must equal the content hash of the semantic fields
/// (`name` through `dependencies`). `aliases`, `created`, `updated`, and
/// `id` itself are excluded from the hash input, so re-stamping or renaming
/// never changes identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Content hash of the semantic fields, 64 lowercase hex characters.
    /// Recomputed by the store on create/update; legacy values trigger
    /// migration.
    #[serde(default)]
    pub id: String,
    /// Human-readable template name. Not an identifier; see aliases.
    pub name: String,
    /// Semver version string.
    pub version: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Directory the template unpacks into: `"."` or a simple segment.
    #[serde(default = "default_root_folder")]
    pub root_folder: String,
    /// Relative folder paths created on instantiation.
    #[serde(default)]
    pub folders: Vec<String>,
    /// File entries stamped out on instantiation.
    #[serde(default)]
    pub files: Vec<TemplateFile>,
    /// Substitution variables the consumer must supply.
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
    /// Conformance rules applied when validating generated projects.
    #[serde(default)]
    pub rules: TemplateRules,
    /// Ids of templates this one depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// When this id first appeared in the store.
    #[serde(default = "epoch")]
    pub created: DateTime<Utc>,
    /// When this id's directory was last written.
    #[serde(default = "epoch")]
    pub updated: DateTime<Utc>,
    /// Human aliases bound to this id. Derived from the alias map at load
    /// time; never persisted with the template and never hashed.
    #[serde(skip)]
    pub aliases: Vec<String>,
}

/// One file stamped out by a template.
///
/// Exactly one of `content` (inline) or `source_path` (bundled payload under
/// the template's `files/` directory) must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    /// Relative destination path.
    pub path: String,
    /// Inline file contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Relative path of a bundled payload under `files/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
}

/// A substitution variable consumed by the templating layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    /// Variable name, unique within a template.
    pub name: String,
    /// What the variable controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value used when the consumer supplies none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Whether instantiation fails without a value.
    #[serde(default)]
    pub required: bool,
}

fn default_root_folder() -> String {
    ".".to_string()
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}
