//! `trackport diff` command - pages changed since the last checkpoint

use crate::cli::Cli;
use crate::output_by_format_result;
use trackport_core::error::Result;
use trackport_core::store::Store;

pub fn execute(cli: &Cli, store: &Store) -> Result<()> {
    let engine = store.engine()?;
    let changes = engine.diff_since_checkpoint();

    output_by_format_result!(cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&changes)?);
            Ok::<(), trackport_core::TrackportError>(())
        },
        human => {
            let changed: Vec<_> = changes
                .iter()
                .filter(|(_, changed)| **changed)
                .map(|(domain, _)| domain.name())
                .collect();
            if changed.is_empty() {
                if !cli.quiet {
                    println!("No changes since last checkpoint");
                }
            } else {
                for name in changed {
                    println!("changed: {}", name);
                }
            }
        }
    )
}
