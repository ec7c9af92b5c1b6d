//! `stencil prune-aliases` command.

use crate::error::Result;
use crate::store::TemplateStore;

/// Execute the `prune-aliases` command: erase tombstoned alias bindings.
///
/// # Errors
///
/// Returns an error if the store cannot be enumerated or the alias map
/// cannot be rewritten.
pub fn run(store: &TemplateStore<'_>) -> Result<()> {
    let available = store.available_ids()?;
    let removed = store.resolver().prune(store.context(), &available)?;
    println!("Pruned {removed} alias(es)");
    Ok(())
}
