//! `trackport pages` command - list pages and their current state

use crate::cli::Cli;
use crate::output_by_format_result;
use trackport_core::domain::Domain;
use trackport_core::error::Result;
use trackport_core::hash;
use trackport_core::store::Store;

pub fn execute(cli: &Cli, store: &Store) -> Result<()> {
    let engine = store.engine()?;
    let pages = engine.pages();

    let rows: Vec<_> = Domain::ALL
        .into_iter()
        .map(|domain| {
            let has_data = pages.get_page_data(domain).is_some();
            let page_hash = if domain.is_excluded() {
                String::new()
            } else {
                hash::calculate_page_hash(pages, domain)
            };
            (domain, has_data, page_hash)
        })
        .collect();

    output_by_format_result!(cli.format,
        json => {
            let output: Vec<_> = rows
                .iter()
                .map(|(domain, has_data, page_hash)| {
                    serde_json::json!({
                        "page": domain.name(),
                        "key": domain.storage_key(),
                        "excluded": domain.is_excluded(),
                        "has_data": has_data,
                        "hash": page_hash,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), trackport_core::TrackportError>(())
        },
        human => {
            for (domain, has_data, page_hash) in &rows {
                let state = if domain.is_excluded() {
                    "excluded"
                } else if *has_data {
                    "data"
                } else {
                    "empty"
                };
                println!(
                    "{:<12} {:<24} {:<9} {}",
                    domain.name(),
                    domain.storage_key(),
                    state,
                    page_hash
                );
            }
        }
    )
}
