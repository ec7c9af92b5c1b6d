//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `stencil`.
#[derive(Debug, Parser)]
#[command(name = "stencil", version, about = "Manage content-addressed project templates")]
pub struct Cli {
    /// Template store root. Defaults to `$STENCIL_STORE`, then `.stencil`.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the templates in the store.
    List,
    /// Show one template by id, short hash, or alias.
    Show {
        /// Full id, unique short-hash prefix, or alias.
        identifier: String,
    },
    /// Add a template from a definition file; its id is derived from content.
    Add {
        /// Path to a template definition (JSON).
        definition: PathBuf,
    },
    /// Remove a template from the store.
    Remove {
        /// Full id, unique short-hash prefix, or alias.
        identifier: String,
    },
    /// Manage human aliases for template ids.
    Alias {
        /// Alias operation to perform.
        #[command(subcommand)]
        action: AliasAction,
    },
    /// Print the transitive dependency closure of a template.
    Deps {
        /// Full id, unique short-hash prefix, or alias.
        identifier: String,
    },
    /// Export a template plus its bundled files as one JSON document.
    Export {
        /// Full id, unique short-hash prefix, or alias.
        identifier: String,
        /// Destination file.
        path: PathBuf,
    },
    /// Import a previously exported template document.
    Import {
        /// Source file.
        path: PathBuf,
    },
    /// Rewrite legacy template identifiers to content hashes.
    Migrate {
        /// Restore a previous run from its backup directory instead.
        #[arg(long, value_name = "DIR")]
        rollback: Option<PathBuf>,
    },
    /// Drop aliases whose template is no longer on disk.
    PruneAliases,
}

/// Alias subcommands.
#[derive(Debug, Subcommand)]
pub enum AliasAction {
    /// Bind an alias to a template.
    Set {
        /// The alias to bind.
        alias: String,
        /// Full id, unique short-hash prefix, or alias.
        identifier: String,
    },
    /// Remove an alias.
    Rm {
        /// The alias to remove.
        alias: String,
    },
    /// List the aliases of a template.
    Ls {
        /// Full id, unique short-hash prefix, or alias.
        identifier: String,
    },
}
