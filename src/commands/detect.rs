//! `trackport detect` command - classify a JSON document

use serde_json::Value;

use crate::cli::Cli;
use crate::commands::read_input;
use crate::output_by_format_result;
use trackport_core::detect::detect_format;
use trackport_core::error::Result;

pub fn execute(cli: &Cli, input: &str) -> Result<()> {
    let raw = read_input(input)?;
    let data: Value = serde_json::from_str(&raw)?;
    let detected = detect_format(&data);

    output_by_format_result!(cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&detected)?);
            Ok::<(), trackport_core::TrackportError>(())
        },
        human => {
            println!("{}", detected.description);
            if !detected.domains.is_empty() {
                let names: Vec<_> = detected.domains.iter().map(|d| d.name()).collect();
                println!("pages: {}", names.join(", "));
            } else if let Some(domain) = detected.domain {
                println!("page: {}", domain);
            }
        }
    )
}
