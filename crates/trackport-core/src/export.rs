//! Export documents for one domain or for all domains at once

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::domain::Domain;
use crate::hash::{calculate_all_hashes, calculate_page_hash};
use crate::kv::KeyValueStore;
use crate::pages::Pages;

/// Version string written into export documents unless configured otherwise
pub const EXPORT_VERSION: &str = "1.0.0";

fn export_date() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Export one domain.
///
/// Returns `None` for excluded domains and domains without data.
pub fn export_page_data<S: KeyValueStore>(
    pages: &Pages<S>,
    domain: Domain,
    version: &str,
) -> Option<Value> {
    if domain.is_excluded() {
        return None;
    }
    let data = pages.get_page_data(domain)?;

    let mut document = Map::new();
    document.insert("export_date".to_string(), export_date());
    document.insert("version".to_string(), Value::from(version));
    document.insert(domain.name().to_string(), data);
    document.insert(
        "hash".to_string(),
        Value::String(calculate_page_hash(pages, domain)),
    );
    Some(Value::Object(document))
}

/// Export every non-excluded domain that has data, plus the current hashes
pub fn export_all_data<S: KeyValueStore>(pages: &Pages<S>, version: &str) -> Value {
    let mut document = Map::new();
    document.insert("export_date".to_string(), export_date());
    document.insert("version".to_string(), Value::from(version));

    let hashes: Map<String, Value> = calculate_all_hashes(pages)
        .into_iter()
        .map(|(domain, hash)| (domain.name().to_string(), Value::String(hash)))
        .collect();
    document.insert("hashes".to_string(), Value::Object(hashes));

    for (domain, data) in pages.get_all_page_data() {
        if let Some(data) = data {
            document.insert(domain.name().to_string(), data);
        }
    }

    Value::Object(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde_json::json;

    fn seeded() -> Pages<MemoryStore> {
        let mut store = MemoryStore::new();
        store
            .set("educationTimers", r#"[{"name":"Welding","level":1}]"#)
            .unwrap();
        store.set("traveling_merchants", r#"{"m1":{}}"#).unwrap();
        Pages::new(store)
    }

    #[test]
    fn test_single_page_document_shape() {
        let pages = seeded();
        let document = export_page_data(&pages, Domain::Education, EXPORT_VERSION).unwrap();

        let keys: Vec<&str> = document
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["export_date", "version", "education", "hash"]);
        assert_eq!(document["version"], "1.0.0");
        assert_eq!(document["education"], json!([{"name": "Welding", "level": 1}]));
        assert_eq!(
            document["hash"],
            Value::String(calculate_page_hash(&pages, Domain::Education))
        );
        assert!(document["export_date"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_excluded_or_empty_page_exports_nothing() {
        let pages = seeded();
        assert_eq!(export_page_data(&pages, Domain::Merchants, EXPORT_VERSION), None);
        assert_eq!(export_page_data(&pages, Domain::Fishing, EXPORT_VERSION), None);
    }

    #[test]
    fn test_export_all_omits_empty_and_excluded() {
        let pages = seeded();
        let document = export_all_data(&pages, "2.0.0");

        assert_eq!(document["version"], "2.0.0");
        assert!(document.get("education").is_some());
        assert!(document.get("fishing").is_none());
        assert!(document.get("merchants").is_none());
        let hashes = document["hashes"].as_object().unwrap();
        assert_eq!(hashes.len(), 5);
        assert!(!hashes.contains_key("vehicles"));
        assert_eq!(hashes["fishing"], "");
    }

    #[test]
    fn test_export_does_not_mutate_storage() {
        let pages = seeded();
        let before = pages.store().keys().unwrap();
        export_all_data(&pages, EXPORT_VERSION);
        assert_eq!(pages.store().keys().unwrap(), before);
    }
}
