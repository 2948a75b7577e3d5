//! `trackport init` command - create a new store
//!
//! Idempotent: an existing store and its config are left as they are.

use std::path::Path;

use crate::cli::Cli;
use crate::commands::dispatch::resolve_store_path;
use crate::output_by_format_result;
use trackport_core::error::Result;
use trackport_core::store::Store;

pub fn execute(cli: &Cli, root: &Path) -> Result<()> {
    let store = match resolve_store_path(cli, root) {
        Some(path) => Store::init_at(&path)?,
        None => Store::init(root)?,
    };

    output_by_format_result!(cli.format,
        json => {
            let output = serde_json::json!({
                "status": "ok",
                "store": store.root().display().to_string(),
                "message": "Store initialized"
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), trackport_core::TrackportError>(())
        },
        human => {
            if !cli.quiet {
                println!("Initialized trackport store at {}", store.root().display());
            }
        }
    )
}
