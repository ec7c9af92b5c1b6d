//! Core library entry for the `stencil` CLI.
//!
//! Templates are identified by the hash of their content: identical
//! templates collapse to one identity and any content change produces a new
//! one. The library is the identity layer — hashing, identifier resolution,
//! alias bookkeeping, dependency closures, and legacy-id migration — with a
//! thin CLI on top.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod deps;
pub mod error;
pub mod hash;
pub mod migrate;
pub mod ports;
pub mod resolver;
pub mod store;
pub mod template;

pub use error::{Result, StoreError};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution
/// fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}
