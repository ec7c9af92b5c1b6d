//! `stencil export` command.

use std::path::Path;

use crate::error::Result;
use crate::store::TemplateStore;

/// Execute the `export` command.
///
/// # Errors
///
/// Returns an error if the identifier does not resolve or writing the bundle
/// fails.
pub fn run(store: &TemplateStore<'_>, identifier: &str, path: &Path) -> Result<()> {
    store.export(identifier, path)?;
    println!("Exported to {}", path.display());
    Ok(())
}
