//! `stencil migrate` command.

use std::path::Path;

use crate::error::Result;
use crate::migrate;
use crate::store::TemplateStore;

/// Execute the `migrate` command: bulk migration, or rollback of a previous
/// run when `--rollback <DIR>` is given.
///
/// # Errors
///
/// Returns an error if the store cannot be enumerated or the rollback
/// replay fails; per-template migration failures are reported, not fatal.
pub fn run(store: &TemplateStore<'_>, rollback: Option<&Path>) -> Result<()> {
    if let Some(backup_dir) = rollback {
        let restored = migrate::rollback(store, backup_dir)?;
        println!("Restored {restored} template(s) from {}", backup_dir.display());
        return Ok(());
    }

    let record = migrate::migrate_all(store)?;
    if record.migrated.is_empty() && record.failed.is_empty() {
        println!("Nothing to migrate.");
        return Ok(());
    }
    for migrated in &record.migrated {
        println!("{} -> {}", migrated.old_id, migrated.new_id);
    }
    for failure in &record.failed {
        println!("FAILED {}: {}", failure.template, failure.error);
    }
    if !record.migrated.is_empty() {
        println!("Backups in {}", record.backup_dir.display());
    }
    Ok(())
}
