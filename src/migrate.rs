//! Migration of legacy template identifiers to the content-hash scheme.
//!
//! A definition whose `id` is not a well-formed content hash gets rewritten:
//! back up the original, recompute the hash, write a temp file beside the
//! original, rename it into place, then move the directory under the new id.
//! The temp file lives in the same directory as its target so the rename
//! never crosses volumes. Any failure after the backup restores the original
//! before the error propagates.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::hash;
use crate::store::TemplateStore;
use crate::template::Template;

/// One successful identifier rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedTemplate {
    /// The legacy identifier the template carried.
    pub old_id: String,
    /// The content hash it now lives under.
    pub new_id: String,
}

/// One template the batch could not migrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFailure {
    /// Directory name of the template that failed.
    pub template: String,
    /// Why it failed.
    pub error: String,
}

/// Outcome of a bulk migration run.
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Shared backup directory for this run.
    pub backup_dir: PathBuf,
    /// Every rewrite that succeeded.
    pub migrated: Vec<MigratedTemplate>,
    /// Every template that failed; failures never abort the batch.
    pub failed: Vec<MigrationFailure>,
}

/// Migrates a single template directory under its own timestamped backup
/// directory. Called by the store when a loaded definition carries a legacy
/// id.
///
/// # Errors
///
/// Propagates [`StoreError::Migration`] and I/O failures; see
/// [`migrate_template`].
pub fn migrate_one(store: &TemplateStore<'_>, dir_name: &str) -> Result<MigratedTemplate> {
    let backup_dir = backup_dir_for_run(store);
    migrate_template(store, dir_name, &backup_dir)
}

/// Migrates one template directory, backing up into `backup_dir`.
///
/// An already-hash-identified template is a no-op: no backup is taken and
/// nothing is rewritten.
///
/// # Errors
///
/// [`StoreError::Malformed`] if the definition does not parse;
/// [`StoreError::Migration`] if a rewrite step fails (the original file has
/// been restored from backup by then); I/O errors from the backup copy.
pub fn migrate_template(
    store: &TemplateStore<'_>,
    dir_name: &str,
    backup_dir: &Path,
) -> Result<MigratedTemplate> {
    let ctx = store.context();
    let template = store.load_definition(dir_name)?;
    let old_id = template.id.clone();
    if hash::is_content_hash(&old_id) {
        return Ok(MigratedTemplate { new_id: old_id.clone(), old_id });
    }

    let definition_path = store.definition_path(dir_name);
    let backup_path = backup_dir.join(format!("{old_id}.backup.json"));
    ctx.fs
        .ensure_dir(backup_dir)
        .map_err(|e| StoreError::io(format!("create backup dir {}", backup_dir.display()), e))?;
    ctx.fs
        .copy(&definition_path, &backup_path)
        .map_err(|e| StoreError::io(format!("back up {}", definition_path.display()), e))?;

    let temp_path = store
        .template_dir(dir_name)
        .join(format!("template.json.tmp-{}", Uuid::new_v4()));
    let new_id = match rewrite_definition(store, &template, &definition_path, &temp_path) {
        Ok(new_id) => new_id,
        Err(e) => {
            // Undo before surfacing: the original must stay readable.
            let _ = ctx.fs.copy(&backup_path, &definition_path);
            if ctx.fs.exists(&temp_path) {
                let _ = ctx.fs.remove_file(&temp_path);
            }
            return Err(StoreError::Migration {
                template: dir_name.to_string(),
                detail: e.to_string(),
            });
        }
    };

    if dir_name != new_id {
        let from = store.template_dir(dir_name);
        let to = store.template_dir(&new_id);
        ctx.fs.rename(&from, &to).map_err(|e| StoreError::Migration {
            template: dir_name.to_string(),
            detail: format!("move directory to '{new_id}': {e}"),
        })?;
    }
    store.resolver().rebind(ctx, &old_id, &new_id)?;

    info!("migrated '{old_id}' -> {new_id}");
    Ok(MigratedTemplate { old_id, new_id })
}

/// Migrates every legacy template in the store under one shared timestamped
/// backup directory. A failing template is recorded and skipped, never
/// aborting the batch; re-running is idempotent because already-migrated
/// templates no longer match the trigger.
///
/// # Errors
///
/// Returns an error only if the store itself cannot be enumerated;
/// per-template failures land in the record.
pub fn migrate_all(store: &TemplateStore<'_>) -> Result<MigrationRecord> {
    let backup_dir = backup_dir_for_run(store);
    let mut record =
        MigrationRecord { backup_dir: backup_dir.clone(), migrated: Vec::new(), failed: Vec::new() };

    for dir_name in store.available_ids()? {
        let legacy = match store.load_definition(&dir_name) {
            Ok(template) => !hash::is_content_hash(&template.id),
            Err(e) => {
                warn!("cannot migrate '{dir_name}': {e}");
                record.failed.push(MigrationFailure { template: dir_name, error: e.to_string() });
                continue;
            }
        };
        if !legacy {
            continue;
        }
        match migrate_template(store, &dir_name, &backup_dir) {
            Ok(migrated) => record.migrated.push(migrated),
            Err(e) => {
                warn!("migration of '{dir_name}' failed: {e}");
                record.failed.push(MigrationFailure { template: dir_name, error: e.to_string() });
            }
        }
    }
    Ok(record)
}

/// Replays every `*.backup.json` in a backup directory, rewriting
/// `<root>/<id>/template.json` from each backup's own embedded id. Undoes a
/// prior bulk migration. Returns the number of restored templates.
///
/// # Errors
///
/// Returns an error if the backup directory cannot be listed, a backup does
/// not parse, or a restore write fails.
pub fn rollback(store: &TemplateStore<'_>, backup_dir: &Path) -> Result<usize> {
    let ctx = store.context();
    let entries = ctx
        .fs
        .list_dir(backup_dir)
        .map_err(|e| StoreError::io(format!("list backup dir {}", backup_dir.display()), e))?;

    let mut restored = 0;
    for name in entries {
        if !name.ends_with(".backup.json") {
            continue;
        }
        let backup_path = backup_dir.join(&name);
        let content = ctx
            .fs
            .read_to_string(&backup_path)
            .map_err(|e| StoreError::io(format!("read backup {}", backup_path.display()), e))?;
        let template: Template =
            serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
                path: backup_path.display().to_string(),
                detail: e.to_string(),
            })?;
        let dest = store.definition_path(&template.id);
        ctx.fs
            .write(&dest, &content)
            .map_err(|e| StoreError::io(format!("restore {}", dest.display()), e))?;
        info!("restored '{}' from {}", template.id, name);
        restored += 1;
    }
    Ok(restored)
}

fn rewrite_definition(
    store: &TemplateStore<'_>,
    template: &Template,
    definition_path: &Path,
    temp_path: &Path,
) -> Result<String> {
    let ctx = store.context();
    let mut migrated = template.clone();
    migrated.id = hash::compute_hash(ctx, template)?;
    let json = serde_json::to_string_pretty(&migrated)
        .map_err(|e| StoreError::io(format!("serialize '{}'", migrated.id), e.into()))?;
    ctx.fs
        .write(temp_path, &json)
        .map_err(|e| StoreError::io(format!("write temp {}", temp_path.display()), e))?;
    ctx.fs
        .rename(temp_path, definition_path)
        .map_err(|e| StoreError::io(format!("rename over {}", definition_path.display()), e))?;
    Ok(migrated.id)
}

fn backup_dir_for_run(store: &TemplateStore<'_>) -> PathBuf {
    let stamp = store.context().clock.now().format("%Y%m%dT%H%M%S%3f");
    store.root().join(".migration-backups").join(format!("migration-{stamp}"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::adapters::mem::MemFileSystem;
    use crate::context::ServiceContext;
    use crate::ports::filesystem::FileSystem;
    use crate::resolver::SetAliasOutcome;
    use crate::template::{TemplateFile, TemplateRules};

    fn legacy_template(name: &str) -> Template {
        Template {
            id: name.to_string(),
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: format!("{name} template"),
            root_folder: ".".to_string(),
            folders: vec![],
            files: vec![TemplateFile {
                path: "main.py".to_string(),
                content: Some("print('hi')".to_string()),
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

    fn seed_legacy(ctx: &ServiceContext, root: &Path, name: &str) {
        let json = serde_json::to_string_pretty(&legacy_template(name)).unwrap();
        ctx.fs.write(&root.join(name).join("template.json"), &json).unwrap();
    }

    #[test]
    fn migrate_template_rewrites_id_and_moves_directory() {
        let ctx = ServiceContext::in_memory();
        let root = Path::new("/store");
        let store = TemplateStore::new(&ctx, root);
        seed_legacy(&ctx, root, "python-fastapi");
        assert_eq!(
            store.resolver().set_alias(&ctx, "api", "python-fastapi").unwrap(),
            SetAliasOutcome::Bound
        );

        let outcome =
            migrate_template(&store, "python-fastapi", Path::new("/backups")).unwrap();

        assert_eq!(outcome.old_id, "python-fastapi");
        assert!(hash::is_content_hash(&outcome.new_id));
        assert!(!ctx.fs.exists(&root.join("python-fastapi")));
        let migrated = store.load_definition(&outcome.new_id).unwrap();
        assert_eq!(migrated.id, outcome.new_id);
        // Backup holds the original, under the old id.
        let backup = ctx
            .fs
            .read_to_string(Path::new("/backups/python-fastapi.backup.json"))
            .unwrap();
        assert!(backup.contains("\"python-fastapi\""));
        // The alias follows the template to its new identity.
        assert_eq!(store.get("api").unwrap().id, outcome.new_id);
    }

    #[test]
    fn migrating_a_hashed_template_is_a_no_op() {
        let ctx = ServiceContext::in_memory();
        let store = TemplateStore::new(&ctx, Path::new("/store"));
        let mut t = legacy_template("web");
        t.id = String::new();
        let stored = store.create(&t).unwrap();

        let outcome = migrate_template(&store, &stored.id, Path::new("/backups")).unwrap();

        assert_eq!(outcome.old_id, outcome.new_id);
        assert!(!ctx.fs.exists(Path::new("/backups")));
    }

    #[test]
    fn get_migrates_a_legacy_definition_transparently() {
        let ctx = ServiceContext::in_memory();
        let root = Path::new("/store");
        let store = TemplateStore::new(&ctx, root);
        seed_legacy(&ctx, root, "python-fastapi");

        let template = store.get("python-fastapi").unwrap();

        assert!(hash::is_content_hash(&template.id));
        assert!(!ctx.fs.exists(&root.join("python-fastapi")));
        // Resolvable under the new id from now on.
        assert_eq!(store.get(&template.id).unwrap().id, template.id);
    }

    #[test]
    fn migrate_all_reports_successes_and_failures() {
        let ctx = ServiceContext::in_memory();
        let root = Path::new("/store");
        let store = TemplateStore::new(&ctx, root);
        seed_legacy(&ctx, root, "python-fastapi");
        seed_legacy(&ctx, root, "node-express");
        ctx.fs.write(&root.join("broken").join("template.json"), "not json").unwrap();
        let mut hashed = legacy_template("hashed");
        hashed.id = String::new();
        let hashed = store.create(&hashed).unwrap();

        let record = migrate_all(&store).unwrap();

        assert_eq!(record.migrated.len(), 2);
        assert_eq!(record.failed.len(), 1);
        assert_eq!(record.failed[0].template, "broken");
        // Two backups in the shared run directory, none for the hashed one.
        let backups = ctx.fs.list_dir(&record.backup_dir).unwrap();
        assert_eq!(backups.len(), 2);
        assert!(store.load_definition(&hashed.id).is_ok());
    }

    #[test]
    fn migrate_all_twice_is_idempotent() {
        let ctx = ServiceContext::in_memory();
        let root = Path::new("/store");
        let store = TemplateStore::new(&ctx, root);
        seed_legacy(&ctx, root, "python-fastapi");

        let first = migrate_all(&store).unwrap();
        let second = migrate_all(&store).unwrap();

        assert_eq!(first.migrated.len(), 1);
        assert!(second.migrated.is_empty());
        assert!(second.failed.is_empty());
        // No new backups: one backup file per migrated template, total.
        let backups = ctx.fs.list_dir(&first.backup_dir).unwrap();
        assert_eq!(backups.len(), 1);
        // Same final id either way.
        let ids = store.available_ids().unwrap();
        assert_eq!(ids, vec![first.migrated[0].new_id.clone()]);
    }

    #[test]
    fn rollback_restores_definitions_from_backups() {
        let ctx = ServiceContext::in_memory();
        let root = Path::new("/store");
        let store = TemplateStore::new(&ctx, root);
        seed_legacy(&ctx, root, "python-fastapi");

        let record = migrate_all(&store).unwrap();
        assert_eq!(record.migrated.len(), 1);

        let restored = rollback(&store, &record.backup_dir).unwrap();

        assert_eq!(restored, 1);
        let legacy = store.load_definition("python-fastapi").unwrap();
        assert_eq!(legacy.id, "python-fastapi");
    }

    /// Filesystem that fails every rename onto a chosen path, for exercising
    /// the restore-from-backup path.
    struct RenameFailFs {
        inner: MemFileSystem,
        fail_on: std::path::PathBuf,
    }

    impl FileSystem for RenameFailFs {
        fn read_to_string(
            &self,
            path: &Path,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.read_to_string(path)
        }
        fn write(
            &self,
            path: &Path,
            contents: &str,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.write(path, contents)
        }
        fn copy(
            &self,
            from: &Path,
            to: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.copy(from, to)
        }
        fn rename(
            &self,
            from: &Path,
            to: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if to == self.fail_on {
                return Err("injected rename failure".into());
            }
            self.inner.rename(from, to)
        }
        fn remove_file(
            &self,
            path: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.remove_file(path)
        }
        fn remove_dir_all(
            &self,
            path: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.remove_dir_all(path)
        }
        fn ensure_dir(
            &self,
            path: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.ensure_dir(path)
        }
        fn list_dir(
            &self,
            path: &Path,
        ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.list_dir(path)
        }
        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }
    }

    #[test]
    fn failed_rewrite_restores_the_original_and_cleans_the_temp_file() {
        let mut ctx = ServiceContext::in_memory();
        let root = Path::new("/store");
        ctx.fs = Box::new(RenameFailFs {
            inner: MemFileSystem::new(),
            fail_on: root.join("python-fastapi").join("template.json"),
        });
        let store = TemplateStore::new(&ctx, root);
        seed_legacy(&ctx, root, "python-fastapi");
        let original = store.load_definition("python-fastapi").unwrap();

        let err =
            migrate_template(&store, "python-fastapi", Path::new("/backups")).unwrap_err();

        assert!(matches!(err, StoreError::Migration { .. }));
        // Original definition intact, no stray temp files.
        let after = store.load_definition("python-fastapi").unwrap();
        assert_eq!(after, original);
        let entries = ctx.fs.list_dir(&root.join("python-fastapi")).unwrap();
        assert_eq!(entries, vec!["template.json"]);
    }
}
