//! Exhaustive template validation.
//!
//! Validation collects every violation instead of failing fast, so a caller
//! can report all problems at once. It never performs I/O.

use std::collections::HashSet;
use std::path::{Component, Path};

use crate::hash;
use crate::template::Template;

/// Checks a template against every structural rule and returns the full
/// violation list; empty means valid.
#[must_use]
pub fn validate(template: &Template) -> Vec<String> {
    let mut violations = Vec::new();

    if !hash::is_content_hash(&template.id) {
        violations
            .push(format!("id '{}' must be exactly 64 lowercase hex characters", template.id));
    }

    if let Err(e) = semver::Version::parse(&template.version) {
        violations.push(format!("version '{}' is not valid semver: {e}", template.version));
    }

    if template.root_folder != "." && !is_simple_segment(&template.root_folder) {
        violations.push(format!(
            "rootFolder '{}' must be \".\" or a simple directory name",
            template.root_folder
        ));
    }

    for folder in &template.folders {
        check_path("folder", folder, &mut violations);
    }

    for file in &template.files {
        check_path("file", &file.path, &mut violations);
        if file.content.is_none() && file.source_path.is_none() {
            violations
                .push(format!("file '{}' must provide content or sourcePath", file.path));
        }
    }

    for rule in &template.rules.rules {
        check_path("rule target", &rule.target, &mut violations);
    }

    let mut names = HashSet::new();
    for variable in &template.variables {
        if !names.insert(variable.name.as_str()) {
            violations.push(format!("duplicate variable name '{}'", variable.name));
        }
    }

    let mut rule_ids = HashSet::new();
    for rule in &template.rules.rules {
        if !rule_ids.insert(rule.id.as_str()) {
            violations.push(format!("duplicate rule id '{}'", rule.id));
        }
    }

    violations
}

fn is_simple_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.starts_with('-')
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn check_path(kind: &str, path: &str, violations: &mut Vec<String>) {
    let p = Path::new(path);
    if p.is_absolute() {
        violations.push(format!("{kind} path '{path}' must be relative"));
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        violations.push(format!("{kind} path '{path}' must not contain a '..' segment"));
    }
}
