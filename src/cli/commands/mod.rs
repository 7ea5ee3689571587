//! Command implementations for the fuel directory CLI
//!
//! This module contains the command execution logic and shared output
//! helpers for the CLI interface. Each command is implemented in its own
//! module:
//! - `list`: filtered, sorted, paginated station listing
//! - `cache`: persistent tier inspection and maintenance

pub mod cache;
pub mod list;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};
use tokio_util::sync::CancellationToken;

/// Main command runner for the fuel directory
///
/// Dispatches to the appropriate subcommand handler based on CLI args.
/// The cancellation token aborts in-flight fetches on shutdown.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    match args.command {
        Some(Commands::List(list_args)) => list::run_list(list_args, cancellation_token).await,
        Some(Commands::Cache(cache_args)) => cache::run_cache(cache_args).await,
        None => Err(Error::configuration(
            "No command provided; run with --help for usage".to_string(),
        )),
    }
}
