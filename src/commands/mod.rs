//! Command dispatch and handlers.

pub mod add;
pub mod alias;
pub mod deps;
pub mod export;
pub mod import;
pub mod list;
pub mod migrate;
pub mod prune;
pub mod remove;
pub mod show;

use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::store::TemplateStore;

/// Dispatch a parsed command to its handler against the configured store.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let ctx = ServiceContext::live();
    let root = store_root(cli.store.clone());
    let store = TemplateStore::new(&ctx, &root);
    run_command(&store, &cli.command).map_err(|e| e.to_string())
}

fn run_command(store: &TemplateStore<'_>, command: &Command) -> crate::error::Result<()> {
    match command {
        Command::List => list::run(store),
        Command::Show { identifier } => show::run(store, identifier),
        Command::Add { definition } => add::run(store, definition),
        Command::Remove { identifier } => remove::run(store, identifier),
        Command::Alias { action } => alias::run(store, action),
        Command::Deps { identifier } => deps::run(store, identifier),
        Command::Export { identifier, path } => export::run(store, identifier, path),
        Command::Import { path } => import::run(store, path),
        Command::Migrate { rollback } => migrate::run(store, rollback.as_deref()),
        Command::PruneAliases => prune::run(store),
    }
}

/// Store root precedence: `--store` flag, `STENCIL_STORE`, then `.stencil`.
fn store_root(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env::var("STENCIL_STORE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(".stencil"))
}
