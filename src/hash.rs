//! Content hashing: the identity function of the store.
//!
//! A template's id is the digest of its canonical serialization. Canonical
//! means: only the nine semantic fields, camelCase keys, compact JSON, keys
//! sorted at every level (`serde_json`'s default map is a `BTreeMap`, so
//! sorting falls out of the round-trip through [`serde_json::Value`]). The
//! result is byte-stable across processes and platforms, which is what lets
//! identical templates collapse to one identity.

use serde_json::json;

use crate::context::ServiceContext;
use crate::error::{Result, StoreError};
use crate::template::Template;

/// Returns `true` if `id` is a well-formed content hash: exactly 64
/// lowercase hex characters.
#[must_use]
pub fn is_content_hash(id: &str) -> bool {
    id.len() == 64 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Serializes the semantic fields of a template into its canonical form.
///
/// `id`, `aliases`, `created`, and `updated` are excluded, so stamping or
/// aliasing a template never changes its identity.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn canonical_content(template: &Template) -> Result<String> {
    let value = json!({
        "name": template.name,
        "version": template.version,
        "description": template.description,
        "rootFolder": template.root_folder,
        "folders": template.folders,
        "files": template.files,
        "variables": template.variables,
        "rules": template.rules,
        "dependencies": template.dependencies,
    });
    serde_json::to_string(&value)
        .map_err(|e| StoreError::io(format!("canonicalize template '{}'", template.name), e.into()))
}

/// Computes the content hash of a template: 64 lowercase hex characters.
///
/// Pure apart from the injected digest; performs no I/O.
///
/// # Errors
///
/// Returns an error if canonical serialization fails.
pub fn compute_hash(ctx: &ServiceContext, template: &Template) -> Result<String> {
    let canonical = canonical_content(template)?;
    Ok(ctx.digest.hex_digest(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::template::{TemplateFile, TemplateRules, TemplateVariable};

    fn sample_template() -> Template {
        Template {
            id: String::new(),
            name: "X".to_string(),
            version: "1.0.0".to_string(),
            description: "d".to_string(),
            root_folder: ".".to_string(),
            folders: vec![],
            files: vec![TemplateFile {
                path: "a.txt".to_string(),
                content: Some("hi".to_string()),
                source_path: None,
            }],
            variables: vec![],
            rules: TemplateRules::default(),
            dependencies: vec![],
            created: DateTime::UNIX_EPOCH,
            updated: DateTime::UNIX_EPOCH,
            aliases: vec![],
        }
    }

    #[test]
    fn canonical_content_sorts_keys() {
        let canonical = canonical_content(&sample_template()).unwrap();
        assert_eq!(
            canonical,
            "{\"dependencies\":[],\"description\":\"d\",\"files\":[{\"content\":\"hi\",\
             \"path\":\"a.txt\"}],\"folders\":[],\"name\":\"X\",\"rootFolder\":\".\",\
             \"rules\":{\"allowExtraFiles\":true,\"allowExtraFolders\":true,\
             \"conflictResolution\":\"skip\",\"excludePatterns\":[],\"rules\":[],\
             \"strictMode\":false},\"variables\":[],\"version\":\"1.0.0\"}"
        );
    }

    #[test]
    fn hash_is_stable_across_runs_and_machines() {
        // Pinned digest: any platform or process must reproduce it exactly.
        let ctx = ServiceContext::in_memory();
        let hash = compute_hash(&ctx, &sample_template()).unwrap();
        assert_eq!(hash, "39274d8a0d80f92b4780922df5bcc48e5e02a4a26851c633f3b094d0632483c7");
        assert!(is_content_hash(&hash));
    }

    #[test]
    fn identical_semantic_fields_hash_identically() {
        let ctx = ServiceContext::in_memory();
        let mut a = sample_template();
        let mut b = sample_template();
        // Non-semantic fields differ in every way.
        a.id = "legacy-id".to_string();
        a.aliases = vec!["demo".to_string()];
        a.created = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        b.updated = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        assert_eq!(compute_hash(&ctx, &a).unwrap(), compute_hash(&ctx, &b).unwrap());
    }

    #[test]
    fn any_semantic_field_change_changes_the_hash() {
        let ctx = ServiceContext::in_memory();
        let base = compute_hash(&ctx, &sample_template()).unwrap();

        let mut renamed = sample_template();
        renamed.name = "Y".to_string();
        assert_ne!(compute_hash(&ctx, &renamed).unwrap(), base);

        let mut stricter = sample_template();
        stricter.rules.strict_mode = true;
        assert_ne!(compute_hash(&ctx, &stricter).unwrap(), base);

        let mut with_variable = sample_template();
        with_variable.variables.push(TemplateVariable {
            name: "port".to_string(),
            description: None,
            default: None,
            required: false,
        });
        assert_ne!(compute_hash(&ctx, &with_variable).unwrap(), base);

        let mut with_dependency = sample_template();
        with_dependency.dependencies.push("a".repeat(64));
        assert_ne!(compute_hash(&ctx, &with_dependency).unwrap(), base);
    }

    #[test]
    fn is_content_hash_accepts_only_64_lowercase_hex() {
        assert!(is_content_hash(&"a".repeat(64)));
        assert!(is_content_hash(&"0123456789abcdef".repeat(4)));
        assert!(!is_content_hash("python-fastapi"));
        assert!(!is_content_hash(&"a".repeat(63)));
        assert!(!is_content_hash(&"A".repeat(64)));
        assert!(!is_content_hash(&"g".repeat(64)));
        assert!(!is_content_hash(""));
    }
}
