//! Conformance rules carried by a template.

use serde::{Deserialize, Serialize};

/// How project validation treats files that already exist at a rule target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResolution {
    /// Leave the existing file untouched.
    #[default]
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Defer the decision to the caller.
    Prompt,
}

/// Rule set applied when validating a generated project against its template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRules {
    /// Whether deviations are errors rather than warnings.
    #[serde(default)]
    pub strict_mode: bool,
    /// Whether files absent from the template are tolerated.
    #[serde(default = "default_true")]
    pub allow_extra_files: bool,
    /// Whether folders absent from the template are tolerated.
    #[serde(default = "default_true")]
    pub allow_extra_folders: bool,
    /// Conflict policy when re-applying the template.
    #[serde(default)]
    pub conflict_resolution: ConflictResolution,
    /// Glob patterns exempt from rule checks.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Individual conformance rules.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl Default for TemplateRules {
    fn default() -> Self {
        Self {
            strict_mode: false,
            allow_extra_files: true,
            allow_extra_folders: true,
            conflict_resolution: ConflictResolution::default(),
            exclude_patterns: Vec::new(),
            rules: Vec::new(),
        }
    }
}

/// A single conformance rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEntry {
    /// Rule id, unique within a template.
    pub id: String,
    /// Relative path the rule checks.
    pub target: String,
    /// What the rule enforces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}
