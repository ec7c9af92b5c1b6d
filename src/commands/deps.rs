//! `stencil deps` command.

use crate::deps;
use crate::error::Result;
use crate::store::TemplateStore;

/// Execute the `deps` command: print the transitive dependency closure.
///
/// # Errors
///
/// Returns an error if the identifier does not resolve or a dependency id is
/// missing from the store.
pub fn run(store: &TemplateStore<'_>, identifier: &str) -> Result<()> {
    let closure = deps::closure(store, identifier)?;
    if closure.is_empty() {
        println!("No dependencies.");
        return Ok(());
    }
    for template in closure {
        println!("{}  {}@{}", template.id, template.name, template.version);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::run;
    use crate::context::ServiceContext;
    use crate::error::StoreError;
    use crate::store::TemplateStore;

    #[test]
    fn deps_of_unknown_identifier_fails() {
        let ctx = ServiceContext::in_memory();
        let store = TemplateStore::new(&ctx, Path::new("/store"));
        assert!(matches!(run(&store, "missing"), Err(StoreError::NotFound(_))));
    }
}
