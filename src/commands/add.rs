//! `stencil add` command.

use std::path::Path;

use crate::error::{Result, StoreError};
use crate::store::TemplateStore;
use crate::template::Template;

/// Execute the `add` command: store a template read from a definition file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, validation fails,
/// or the derived id already exists.
pub fn run(store: &TemplateStore<'_>, definition: &Path) -> Result<()> {
    let content = store
        .context()
        .fs
        .read_to_string(definition)
        .map_err(|e| StoreError::io(format!("read definition {}", definition.display()), e))?;
    let template: Template =
        serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            path: definition.display().to_string(),
            detail: e.to_string(),
        })?;
    let stored = store.create(&template)?;
    println!("Added {}@{} as {}", stored.name, stored.version, stored.id);
    Ok(())
}
