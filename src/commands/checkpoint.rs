//! `trackport checkpoint` command - record current page hashes

use crate::cli::Cli;
use crate::output_by_format_result;
use trackport_core::error::Result;
use trackport_core::store::Store;

pub fn execute(cli: &Cli, store: &Store) -> Result<()> {
    let mut engine = store.engine()?;
    let hashes = engine.checkpoint()?;

    output_by_format_result!(cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&hashes)?);
            Ok::<(), trackport_core::TrackportError>(())
        },
        human => {
            if !cli.quiet {
                println!("Recorded checkpoint for {} pages", hashes.len());
                for (domain, page_hash) in &hashes {
                    println!("  {:<12} {}", domain.name(), page_hash);
                }
            }
        }
    )
}
