//! `stencil list` command.

use crate::error::Result;
use crate::store::TemplateStore;

/// Execute the `list` command.
///
/// # Errors
///
/// Returns an error if the store cannot be enumerated.
pub fn run(store: &TemplateStore<'_>) -> Result<()> {
    let summaries = store.list()?;
    if summaries.is_empty() {
        println!("No templates in store.");
        return Ok(());
    }
    for summary in summaries {
        let short = &summary.id[..summary.id.len().min(12)];
        let aliases = if summary.aliases.is_empty() {
            String::new()
        } else {
            format!("  ({})", summary.aliases.join(", "))
        };
        println!("{short}  {}@{}{aliases}", summary.name, summary.version);
        if !summary.description.is_empty() {
            println!("              {}", summary.description);
        }
    }
    Ok(())
}
