//! `trackport import` command - import a JSON document
//!
//! Exits with a failure when the import reported errors and nothing was
//! created or updated.

use serde_json::Value;

use crate::cli::{Cli, OutputFormat};
use crate::commands::read_input;
use trackport_core::domain::Domain;
use trackport_core::error::{Result, TrackportError};
use trackport_core::import::ImportMode;
use trackport_core::store::Store;

pub fn execute(
    cli: &Cli,
    store: &Store,
    input: &str,
    page: Option<Domain>,
    mode: Option<ImportMode>,
) -> Result<()> {
    let mode = mode.unwrap_or(store.config().default_mode);
    let raw = read_input(input)?;
    let mut engine = store.engine()?;

    let (report, total_failure) = match page {
        Some(domain) => {
            let data: Value = serde_json::from_str(&raw)?;
            let result = engine.import_page(domain, &data, mode);
            if result.is_clean() {
                engine.checkpoint()?;
            }
            let total_failure = result.errors > 0 && result.success == 0 && result.updated == 0;
            (serde_json::to_value(&result)?, total_failure)
        }
        None => {
            let result = engine.import_json(&raw, mode);
            (serde_json::to_value(&result)?, result.is_total_failure())
        }
    };

    print_report(cli, mode, &report)?;

    if total_failure {
        return Err(TrackportError::Other("import failed".to_string()));
    }
    Ok(())
}

fn print_report(cli: &Cli, mode: ImportMode, report: &Value) -> Result<()> {
    if cli.format == OutputFormat::Json {
        let mut output = serde_json::json!({ "mode": mode });
        if let (Some(target), Some(fields)) = (output.as_object_mut(), report.as_object()) {
            target.extend(fields.clone());
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if cli.quiet {
        return Ok(());
    }

    let count = |field: &str| report.get(field).and_then(Value::as_u64).unwrap_or(0);
    println!(
        "Imported ({}): {} new, {} updated, {} errors",
        mode,
        count("success"),
        count("updated"),
        count("errors")
    );
    if let Some(messages) = report.get("messages").and_then(Value::as_array) {
        for message in messages.iter().filter_map(Value::as_str) {
            println!("  - {}", message);
        }
    }
    Ok(())
}
