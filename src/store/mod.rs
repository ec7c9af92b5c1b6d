//! Template store — content-addressed persistence layer.
//!
//! One directory per content hash, all I/O through the `FileSystem` port.
//! Directory layout:
//!
//! ```text
//! <root>/
//!   ├── <id>/template.json      one directory per content hash
//!   ├── <id>/files/**           bundled payloads referenced by sourcePath
//!   ├── aliases.json            id -> [alias, ...]
//!   └── .migration-backups/     timestamped bulk-migration backups
//! ```
//!
//! Single-writer model: the store provides no per-id mutual exclusion and no
//! cross-process locking. Two writers racing on the same id can corrupt the
//! alias map or interleave a temp-file-rename sequence; callers that need
//! stronger guarantees must serialize access themselves.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::context::ServiceContext;
use crate::error::{Result, StoreError};
use crate::hash;
use crate::migrate;
use crate::resolver::{self, IdentifierResolver};
use crate::template::{ExportBundle, Template, TemplateSummary};

pub mod validate;

pub use validate::validate;

/// Content-addressed template store rooted at one directory.
///
/// All I/O goes through `ctx.fs` so the store works with live and in-memory
/// adapters alike.
pub struct TemplateStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
    resolver: IdentifierResolver,
}

impl<'a> TemplateStore<'a> {
    /// Creates a store rooted at the given path, with its alias map at
    /// `<root>/aliases.json`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        let resolver = IdentifierResolver::new(root.join("aliases.json"));
        Self { ctx, root: root.to_path_buf(), resolver }
    }

    /// The service context this store was built with.
    #[must_use]
    pub fn context(&self) -> &ServiceContext {
        self.ctx
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The resolver bound to this store's alias map.
    #[must_use]
    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    /// Ids of the template directories currently on disk, sorted.
    ///
    /// A directory counts when it contains a `template.json`; anything else
    /// at the root (the alias map, backup directories) is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be listed.
    pub fn available_ids(&self) -> Result<Vec<String>> {
        if !self.ctx.fs.exists(&self.root) {
            return Ok(Vec::new());
        }
        let entries = self
            .ctx
            .fs
            .list_dir(&self.root)
            .map_err(|e| StoreError::io(format!("list store {}", self.root.display()), e))?;
        Ok(entries
            .into_iter()
            .filter(|name| self.ctx.fs.exists(&self.definition_path(name)))
            .collect())
    }

    /// Lists every readable, valid template as a summary projection.
    ///
    /// A directory that fails to parse or validate is skipped with a warning
    /// rather than aborting the whole listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store root cannot be listed or the alias map
    /// cannot be read.
    pub fn list(&self) -> Result<Vec<TemplateSummary>> {
        let ids = self.available_ids()?;
        let mut summaries = Vec::new();
        for dir in &ids {
            let template = match self.load_definition(dir) {
                Ok(t) => t,
                Err(e) => {
                    warn!("skipping template directory '{dir}': {e}");
                    continue;
                }
            };
            let violations = validate::validate(&template);
            if !violations.is_empty() {
                warn!("skipping invalid template '{dir}': {}", violations.join("; "));
                continue;
            }
            let aliases = self.resolver.aliases_of(self.ctx, &template.id, &ids)?;
            summaries.push(TemplateSummary {
                id: template.id,
                name: template.name,
                version: template.version,
                description: template.description,
                aliases,
                installed: true,
            });
        }
        Ok(summaries)
    }

    /// Loads the full template behind an identifier (full id, unique short
    /// hash, or alias).
    ///
    /// A definition still carrying a legacy id is migrated in place before
    /// it is returned, so callers only ever observe hash identities.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if resolution or the directory lookup fails;
    /// migration and I/O errors are propagated.
    pub fn get(&self, identifier: &str) -> Result<Template> {
        let available = self.available_ids()?;
        let dir = self.resolver.resolve(self.ctx, identifier, &available)?;
        let mut template = self.load_definition(&dir)?;
        if !hash::is_content_hash(&template.id) {
            let migrated = migrate::migrate_one(self, &dir)?;
            template = self.load_definition(&migrated.new_id)?;
        }
        let available = self.available_ids()?;
        template.aliases = self.resolver.aliases_of(self.ctx, &template.id, &available)?;
        Ok(template)
    }

    /// Stores a new template, deriving its id from content.
    ///
    /// The caller-supplied id is ignored; `created` and `updated` are
    /// stamped from the clock. Nothing is written unless validation passes.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] if the computed id already exists;
    /// [`StoreError::ValidationFailed`] with the full violation list.
    pub fn create(&self, template: &Template) -> Result<Template> {
        let mut stored = template.clone();
        stored.id = hash::compute_hash(self.ctx, &stored)?;
        if self.ctx.fs.exists(&self.template_dir(&stored.id)) {
            return Err(StoreError::Conflict(stored.id));
        }
        let violations = validate::validate(&stored);
        if !violations.is_empty() {
            return Err(StoreError::ValidationFailed(violations));
        }
        let now = self.ctx.clock.now();
        stored.created = now;
        stored.updated = now;
        self.write_definition(&stored)?;
        Ok(stored)
    }

    /// Writes a template under its recomputed content id.
    ///
    /// Because identity is content-derived this never rewrites an existing
    /// id's content: changed content lands in a new directory (preserving
    /// the caller-supplied `created`), unchanged content overwrites the
    /// existing directory keeping its original `created`.
    ///
    /// # Errors
    ///
    /// [`StoreError::ValidationFailed`] with the full violation list; I/O
    /// errors are propagated.
    pub fn update(&self, template: &Template) -> Result<Template> {
        let mut stored = template.clone();
        stored.id = hash::compute_hash(self.ctx, &stored)?;
        let violations = validate::validate(&stored);
        if !violations.is_empty() {
            return Err(StoreError::ValidationFailed(violations));
        }
        if self.ctx.fs.exists(&self.definition_path(&stored.id)) {
            let existing = self.load_definition(&stored.id)?;
            stored.created = existing.created;
        }
        stored.updated = self.ctx.clock.now();
        self.write_definition(&stored)?;
        Ok(stored)
    }

    /// Removes the directory behind an identifier and returns the deleted
    /// id. Aliases pointing at the id are left in the map as tombstones
    /// until explicitly pruned.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if resolution fails; I/O errors are
    /// propagated.
    pub fn delete(&self, identifier: &str) -> Result<String> {
        let available = self.available_ids()?;
        let id = self.resolver.resolve(self.ctx, identifier, &available)?;
        let dir = self.template_dir(&id);
        self.ctx
            .fs
            .remove_dir_all(&dir)
            .map_err(|e| StoreError::io(format!("remove template {}", dir.display()), e))?;
        Ok(id)
    }

    /// Writes a template plus its bundled payloads as one JSON document.
    ///
    /// # Errors
    ///
    /// Resolution, migration, and I/O errors are propagated; a missing
    /// payload file referenced by `sourcePath` is an I/O error.
    pub fn export(&self, identifier: &str, dest: &Path) -> Result<()> {
        let template = self.get(identifier)?;
        let mut files = std::collections::BTreeMap::new();
        for entry in &template.files {
            if let Some(source_path) = &entry.source_path {
                let payload_path = self.files_dir(&template.id).join(source_path);
                let payload = self.ctx.fs.read_to_string(&payload_path).map_err(|e| {
                    StoreError::io(format!("read payload {}", payload_path.display()), e)
                })?;
                files.insert(source_path.clone(), payload);
            }
        }
        let bundle = ExportBundle { template, files };
        let json = serde_json::to_string_pretty(&bundle)
            .map_err(|e| StoreError::io("serialize export bundle", e.into()))?;
        self.ctx
            .fs
            .write(dest, &json)
            .map_err(|e| StoreError::io(format!("write export {}", dest.display()), e))
    }

    /// Imports a previously exported bundle, re-validating it and migrating
    /// a legacy embedded id to the hash scheme first.
    ///
    /// # Errors
    ///
    /// [`StoreError::Malformed`] if the document does not parse;
    /// [`StoreError::ValidationFailed`] with the full violation list;
    /// [`StoreError::Conflict`] if the (possibly migrated) id already
    /// exists.
    pub fn import(&self, source: &Path) -> Result<Template> {
        let content = self
            .ctx
            .fs
            .read_to_string(source)
            .map_err(|e| StoreError::io(format!("read import {}", source.display()), e))?;
        let bundle: ExportBundle =
            serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
                path: source.display().to_string(),
                detail: e.to_string(),
            })?;

        let mut template = bundle.template;
        if !hash::is_content_hash(&template.id) {
            template = resolver::migrate_to_hash(self.ctx, &template)?;
        }
        let violations = validate::validate(&template);
        if !violations.is_empty() {
            return Err(StoreError::ValidationFailed(violations));
        }
        if self.ctx.fs.exists(&self.template_dir(&template.id)) {
            return Err(StoreError::Conflict(template.id));
        }

        self.write_definition(&template)?;
        for (relative_path, payload) in &bundle.files {
            let path = self.files_dir(&template.id).join(relative_path);
            self.ctx
                .fs
                .write(&path, payload)
                .map_err(|e| StoreError::io(format!("write payload {}", path.display()), e))?;
        }
        Ok(template)
    }

    pub(crate) fn template_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    pub(crate) fn definition_path(&self, id: &str) -> PathBuf {
        self.root.join(id).join("template.json")
    }

    pub(crate) fn files_dir(&self, id: &str) -> PathBuf {
        self.root.join(id).join("files")
    }

    pub(crate) fn load_definition(&self, dir_name: &str) -> Result<Template> {
        let path = self.definition_path(dir_name);
        let content = self
            .ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| StoreError::io(format!("read {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    pub(crate) fn write_definition(&self, template: &Template) -> Result<()> {
        let json = serde_json::to_string_pretty(template)
            .map_err(|e| StoreError::io(format!("serialize template '{}'", template.id), e.into()))?;
        let path = self.definition_path(&template.id);
        self.ctx
            .fs
            .write(&path, &json)
            .map_err(|e| StoreError::io(format!("write {}", path.display()), e))
    }
}
