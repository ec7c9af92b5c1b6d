//! Export document: one template plus its bundled payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::definition::Template;

/// The single-document form a template travels in between stores.
///
/// `files` maps each `sourcePath` referenced by the template to the payload's
/// UTF-8 contents. Inline-content files need no entry; their contents already
/// live in the definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// The full template definition.
    pub template: Template,
    /// Bundled payloads keyed by relative path.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}
