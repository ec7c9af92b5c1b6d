//! `stencil import` command.

use std::path::Path;

use crate::error::Result;
use crate::store::TemplateStore;

/// Execute the `import` command.
///
/// # Errors
///
/// Returns an error if the document does not parse, validation fails, or the
/// id already exists.
pub fn run(store: &TemplateStore<'_>, path: &Path) -> Result<()> {
    let imported = store.import(path)?;
    println!("Imported {}@{} as {}", imported.name, imported.version, imported.id);
    Ok(())
}
