//! `stencil remove` command.

use crate::error::Result;
use crate::store::TemplateStore;

/// Execute the `remove` command.
///
/// # Errors
///
/// Returns an error if the identifier does not resolve or removal fails.
pub fn run(store: &TemplateStore<'_>, identifier: &str) -> Result<()> {
    let id = store.delete(identifier)?;
    println!("Removed {id}");
    Ok(())
}
