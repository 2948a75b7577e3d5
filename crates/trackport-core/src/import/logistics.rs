//! Logistics import
//!
//! Companies are keyed by `company_name` (case-insensitive), licenses and jobs
//! by `id`. `config` is shallow-merged in merge mode and substituted in
//! replace mode.

use serde_json::{Map, Value};

use super::merge::merge_records;
use super::{ImportMode, ImportResult};
use crate::bail_structural;
use crate::domain::Domain;
use crate::error::Result;
use crate::value::{identity_key, merged_object, name_key};

type Identity = fn(&Value) -> Option<String>;

const COLLECTIONS: [(&str, &str, Identity); 3] = [
    ("companies", "company", by_company_name),
    ("licenses", "license", by_id),
    ("jobs", "job", by_id),
];

pub(super) fn import(
    current: Option<Value>,
    data: &Value,
    mode: ImportMode,
) -> Result<(Value, ImportResult)> {
    if COLLECTIONS
        .iter()
        .all(|(field, _, _)| !data.get(*field).is_some_and(Value::is_array))
    {
        bail_structural!(Domain::Logistics, "expected companies, licenses or jobs arrays");
    }
    if data.get("config").is_some_and(|config| !config.is_object()) {
        bail_structural!(Domain::Logistics, "config must be an object");
    }

    let mut document = match current {
        Some(Value::Object(map)) => map,
        _ => match Domain::Logistics.empty_data() {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    };
    let mut result = ImportResult::default();

    for (field, label, identity) in COLLECTIONS {
        let incoming = data.get(field).and_then(Value::as_array);
        let collection = match mode {
            ImportMode::Replace => {
                let replaced = incoming.cloned().unwrap_or_default();
                result.success += replaced.len();
                replaced
            }
            ImportMode::Merge => {
                let mut existing = document
                    .get(field)
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                if let Some(incoming) = incoming {
                    merge_records(&mut existing, incoming, label, identity, &mut result);
                }
                existing
            }
        };
        document.insert(field.to_string(), Value::Array(collection));
    }

    let config = match mode {
        ImportMode::Merge => merged_object(document.get("config"), data.get("config")),
        ImportMode::Replace => merged_object(None, data.get("config")),
    };
    document.insert("config".to_string(), config);

    Ok((Value::Object(document), result))
}

fn by_company_name(record: &Value) -> Option<String> {
    name_key(record.get("company_name"))
}

fn by_id(record: &Value) -> Option<String> {
    identity_key(record.get("id"))
}
