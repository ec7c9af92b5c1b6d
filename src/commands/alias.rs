//! `stencil alias` subcommands.

use crate::cli::AliasAction;
use crate::error::Result;
use crate::resolver::SetAliasOutcome;
use crate::store::TemplateStore;

/// Execute an `alias` subcommand.
///
/// # Errors
///
/// Returns an error if resolution or alias-map persistence fails.
pub fn run(store: &TemplateStore<'_>, action: &AliasAction) -> Result<()> {
    let ctx = store.context();
    match action {
        AliasAction::Set { alias, identifier } => {
            let template = store.get(identifier)?;
            match store.resolver().set_alias(ctx, alias, &template.id)? {
                SetAliasOutcome::Bound => println!("{alias} -> {}", template.id),
                SetAliasOutcome::AlreadyBound { existing_id } => {
                    println!(
                        "'{alias}' is already bound to {existing_id}; remove it first to rebind"
                    );
                }
            }
        }
        AliasAction::Rm { alias } => {
            if store.resolver().remove_alias(ctx, alias)? {
                println!("Removed alias '{alias}'");
            } else {
                println!("No such alias '{alias}'");
            }
        }
        AliasAction::Ls { identifier } => {
            let template = store.get(identifier)?;
            if template.aliases.is_empty() {
                println!("No aliases for {}", template.id);
            } else {
                for alias in &template.aliases {
                    println!("{alias}");
                }
            }
        }
    }
    Ok(())
}
