//! Template domain model.
//!
//! A template's identity is the content hash of its semantic fields; see
//! `crate::hash` for the canonical serialization. All persisted JSON uses
//! camelCase field names.

pub mod bundle;
pub mod definition;
pub mod rules;
pub mod summary;

pub use bundle::ExportBundle;
pub use definition::{Template, TemplateFile, TemplateVariable};
pub use rules::{ConflictResolution, RuleEntry, TemplateRules};
pub use summary::TemplateSummary;
