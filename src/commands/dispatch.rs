//! Command dispatch logic for trackport
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use trackport_core::error::Result;
use trackport_core::store::Store;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    tracing::debug!(elapsed = ?start.elapsed(), root = %root.display(), "resolve_root");

    let Some(command) = &cli.command else {
        return handle_no_command();
    };

    match command {
        Commands::Init => commands::init::execute(cli, &root),
        Commands::Detect { input } => commands::detect::execute(cli, input),
        Commands::Pages => {
            let store = discover_or_open_store(cli, &root, start)?;
            commands::pages::execute(cli, &store)
        }
        Commands::Export {
            page,
            output,
            no_checkpoint,
        } => {
            let store = discover_or_open_store(cli, &root, start)?;
            commands::export::execute(cli, &store, *page, output.as_deref(), *no_checkpoint)
        }
        Commands::Import { input, page, mode } => {
            let store = discover_or_open_store(cli, &root, start)?;
            commands::import::execute(cli, &store, input, *page, *mode)
        }
        Commands::Diff => {
            let store = discover_or_open_store(cli, &root, start)?;
            commands::diff::execute(cli, &store)
        }
        Commands::Checkpoint => {
            let store = discover_or_open_store(cli, &root, start)?;
            commands::checkpoint::execute(cli, &store)
        }
    }
}

/// Resolve `--store` against the root, or walk up from the root
pub fn resolve_store_path(cli: &Cli, root: &Path) -> Option<PathBuf> {
    cli.store.as_ref().map(|path| {
        if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        }
    })
}

fn discover_or_open_store(cli: &Cli, root: &Path, start: Instant) -> Result<Store> {
    let store = match resolve_store_path(cli, root) {
        Some(path) => Store::open(&path)?,
        None => Store::discover(root)?,
    };
    tracing::debug!(elapsed = ?start.elapsed(), store = %store.root().display(), "discover_store");
    Ok(store)
}

fn handle_no_command() -> Result<()> {
    println!("trackport {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Import, export and change tracking for tracker pages.");
    println!();
    println!("Run `trackport --help` for usage information.");
    Ok(())
}
