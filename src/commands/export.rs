//! `trackport export` command - write an export document
//!
//! The document is always JSON; `--format` only affects the status line
//! printed when writing to a file.

use std::fs;
use std::path::Path;

use crate::cli::Cli;
use crate::output_by_format_result;
use trackport_core::domain::Domain;
use trackport_core::engine::EngineOptions;
use trackport_core::error::Result;
use trackport_core::store::Store;

pub fn execute(
    cli: &Cli,
    store: &Store,
    page: Option<Domain>,
    output: Option<&Path>,
    no_checkpoint: bool,
) -> Result<()> {
    let mut options = EngineOptions::from(store.config());
    if no_checkpoint {
        options.checkpoint_on_export = false;
    }
    let mut engine = store.engine_with(options)?;

    let document = engine.export(page)?;
    let rendered = if store.config().pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };

    let Some(path) = output else {
        println!("{}", rendered);
        return Ok(());
    };

    fs::write(path, format!("{}\n", rendered))?;
    tracing::info!(path = %path.display(), page = ?page, "export written");

    output_by_format_result!(cli.format,
        json => {
            let status = serde_json::json!({
                "status": "ok",
                "path": path.display().to_string(),
                "page": page.map(|d| d.name()),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok::<(), trackport_core::TrackportError>(())
        },
        human => {
            if !cli.quiet {
                let what = page.map_or("all pages", |d| d.name());
                println!("Exported {} to {}", what, path.display());
            }
        }
    )
}
