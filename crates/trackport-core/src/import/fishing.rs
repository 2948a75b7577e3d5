//! Fishing tracker import
//!
//! Three independent collections, each keyed by `id`.

use serde_json::{Map, Value};

use super::merge::merge_records;
use super::{ImportMode, ImportResult};
use crate::bail_structural;
use crate::domain::Domain;
use crate::error::Result;
use crate::value::identity_key;

const COLLECTIONS: [(&str, &str); 3] = [
    ("locations", "location"),
    ("fish", "fish"),
    ("rewards", "reward"),
];

pub(super) fn import(
    current: Option<Value>,
    data: &Value,
    mode: ImportMode,
) -> Result<(Value, ImportResult)> {
    let source = match data.get("fishing") {
        Some(nested) if nested.is_object() => nested,
        _ => data,
    };

    if COLLECTIONS
        .iter()
        .all(|(field, _)| !source.get(*field).is_some_and(Value::is_array))
    {
        bail_structural!(Domain::Fishing, "expected locations, fish or rewards arrays");
    }

    let mut document = match current {
        Some(Value::Object(map)) => map,
        _ => match Domain::Fishing.empty_data() {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    };
    let mut result = ImportResult::default();

    for (field, label) in COLLECTIONS {
        let incoming = source.get(field).and_then(Value::as_array);
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
                    merge_records(&mut existing, incoming, label, by_id, &mut result);
                }
                existing
            }
        };
        document.insert(field.to_string(), Value::Array(collection));
    }

    if let Some(version) = source.get("version") {
        if mode == ImportMode::Replace || !document.contains_key("version") {
            document.insert("version".to_string(), version.clone());
        }
    }

    Ok((Value::Object(document), result))
}

fn by_id(record: &Value) -> Option<String> {
    identity_key(record.get("id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current() -> Value {
        json!({
            "locations": [{"id": 1, "name": "Pier"}],
            "fish": [{"id": "bass", "rarity": "common"}],
            "rewards": [],
            "version": 2
        })
    }

    #[test]
    fn test_merge_each_collection_independently() {
        let payload = json!({
            "locations": [{"id": 1, "name": "Old Pier"}, {"id": 2, "name": "Lake"}],
            "fish": [{"id": "bass", "rarity": "rare"}],
            "rewards": [{"id": 9, "item": "rod"}]
        });

        let (document, result) = import(Some(current()), &payload, ImportMode::Merge).unwrap();

        assert_eq!(document["locations"].as_array().unwrap().len(), 2);
        assert_eq!(document["locations"][0]["name"], "Old Pier");
        assert_eq!(document["fish"][0]["rarity"], "rare");
        assert_eq!(document["rewards"], json!([{"id": 9, "item": "rod"}]));
        assert_eq!(document["version"], 2);
        assert_eq!((result.success, result.updated, result.errors), (2, 2, 0));
    }

    #[test]
    fn test_nested_under_fishing_key() {
        let payload = json!({"fishing": {"locations": [{"id": 3}], "fish": [], "rewards": []}});
        let (document, result) = import(None, &payload, ImportMode::Merge).unwrap();
        assert_eq!(document["locations"], json!([{"id": 3}]));
        assert_eq!(result.success, 1);
    }

    #[test]
    fn test_merge_with_missing_collection_keeps_existing() {
        let payload = json!({"rewards": [{"id": 1}]});
        let (document, _) = import(Some(current()), &payload, ImportMode::Merge).unwrap();
        assert_eq!(document["locations"], current()["locations"]);
        assert_eq!(document["fish"], current()["fish"]);
    }

    #[test]
    fn test_replace_substitutes_all_three() {
        let payload = json!({"locations": [], "fish": [{"id": "pike"}], "rewards": [], "version": 3});
        let (document, result) = import(Some(current()), &payload, ImportMode::Replace).unwrap();
        assert_eq!(
            document,
            json!({"locations": [], "fish": [{"id": "pike"}], "rewards": [], "version": 3})
        );
        assert_eq!(result.success, 1);
    }

    #[test]
    fn test_merge_idempotent() {
        let payload = json!({"locations": [{"id": 5}], "fish": [{"id": "carp"}], "rewards": []});
        let (once, _) = import(Some(current()), &payload, ImportMode::Merge).unwrap();
        let (twice, _) = import(Some(once.clone()), &payload, ImportMode::Merge).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_collections_is_structural() {
        assert!(import(None, &json!({"version": 1}), ImportMode::Merge).is_err());
    }
}
