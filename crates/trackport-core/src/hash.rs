//! Content hashing and change detection
//!
//! Hashes are a djb2-style rolling hash (seed 5381, multiplier 33) over the
//! UTF-16 code units of the serialized JSON, kept as a wrapping `u32` and
//! rendered as lower-case hex. Collisions are possible; the hash only needs to
//! answer "did this page change since the last checkpoint".

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::{Domain, HASHES_KEY};
use crate::error::Result;
use crate::kv::KeyValueStore;
use crate::pages::Pages;

const SEED: u32 = 5381;
const MULTIPLIER: u32 = 33;

/// Hash a string. The empty string hashes to the empty string.
pub fn hash_str(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let hash = input.encode_utf16().fold(SEED, |hash, unit| {
        hash.wrapping_mul(MULTIPLIER).wrapping_add(u32::from(unit))
    });
    format!("{:x}", hash)
}

/// Hash the compact JSON serialization of a value. `null` hashes to the empty string.
pub fn generate_hash(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    // serializing a Value cannot fail: keys are always strings
    hash_str(&serde_json::to_string(value).unwrap_or_default())
}

/// Hash of a domain's current document, or of the empty string if it has none
pub fn calculate_page_hash<S: KeyValueStore>(pages: &Pages<S>, domain: Domain) -> String {
    match pages.get_page_data(domain) {
        Some(data) => hash_str(&serde_json::to_string(&data).unwrap_or_default()),
        None => hash_str(""),
    }
}

/// Current hashes for every non-excluded domain
pub fn calculate_all_hashes<S: KeyValueStore>(pages: &Pages<S>) -> BTreeMap<Domain, String> {
    pages
        .get_available_pages()
        .into_iter()
        .map(|domain| (domain, calculate_page_hash(pages, domain)))
        .collect()
}

/// Record a hash map as the new checkpoint
pub fn store_hashes<S: KeyValueStore>(
    pages: &mut Pages<S>,
    hashes: &BTreeMap<Domain, String>,
) -> Result<()> {
    let serialized = serde_json::to_string(hashes)?;
    pages.write_key(HASHES_KEY, &serialized)
}

/// The last recorded checkpoint. Unreadable or malformed checkpoints read as empty.
pub fn get_stored_hashes<S: KeyValueStore>(pages: &Pages<S>) -> BTreeMap<Domain, String> {
    let raw = match pages.read_key(HASHES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read stored hashes");
            return BTreeMap::new();
        }
    };

    let parsed: BTreeMap<String, Value> = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored hashes are not valid JSON");
            return BTreeMap::new();
        }
    };

    parsed
        .into_iter()
        .filter_map(|(name, hash)| {
            let domain = name.parse::<Domain>().ok()?;
            Some((domain, hash.as_str()?.to_string()))
        })
        .collect()
}

/// Per domain, whether the content changed since the last checkpoint.
///
/// Only flags a domain when both the current and the stored hash are
/// non-empty and differ: a domain never checkpointed, or with no data now,
/// reads as unchanged.
pub fn compare_hashes<S: KeyValueStore>(pages: &Pages<S>) -> BTreeMap<Domain, bool> {
    let stored = get_stored_hashes(pages);
    calculate_all_hashes(pages)
        .into_iter()
        .map(|(domain, current)| {
            let changed = match stored.get(&domain) {
                Some(previous) => !previous.is_empty() && !current.is_empty() && *previous != current,
                None => false,
            };
            (domain, changed)
        })
        .collect()
}

/// Recompute and store all hashes
pub fn checkpoint<S: KeyValueStore>(pages: &mut Pages<S>) -> Result<BTreeMap<Domain, String>> {
    let hashes = calculate_all_hashes(pages);
    store_hashes(pages, &hashes)?;
    tracing::debug!(pages = hashes.len(), "hash checkpoint recorded");
    Ok(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_hash_str_known_values() {
        assert_eq!(hash_str(""), "");
        // 5381 * 33 + 'a'(97) = 177670
        assert_eq!(hash_str("a"), format!("{:x}", 177_670u32));
    }

    #[test]
    fn test_hash_wraps_instead_of_overflowing() {
        let long = "z".repeat(10_000);
        let hash = hash_str(&long);
        assert!(!hash.is_empty());
        assert!(hash.len() <= 8);
    }

    #[test]
    fn test_hash_uses_utf16_code_units() {
        // U+1F41F is a surrogate pair in UTF-16
        let expected = [0xD83Du32, 0xDC1F]
            .iter()
            .fold(SEED, |h, u| h.wrapping_mul(MULTIPLIER).wrapping_add(*u));
        assert_eq!(hash_str("\u{1F41F}"), format!("{:x}", expected));
    }

    #[test]
    fn test_generate_hash_stable_and_discriminating() {
        let corpus = [
            json!({"a": 1}),
            json!({"a": 2}),
            json!([{"name": "Welding", "level": 1}]),
            json!([{"name": "Welding", "level": 2}]),
            json!({"apartments": [], "version": 1}),
            json!("text"),
        ];
        for (i, a) in corpus.iter().enumerate() {
            assert_eq!(generate_hash(a), generate_hash(a));
            for b in corpus.iter().skip(i + 1) {
                assert_ne!(generate_hash(a), generate_hash(b), "{a} vs {b}");
            }
        }
        assert_eq!(generate_hash(&Value::Null), "");
    }

    #[test]
    fn test_page_hash_without_data_is_empty() {
        let pages = Pages::new(MemoryStore::new());
        assert_eq!(calculate_page_hash(&pages, Domain::Fishing), "");
    }

    #[test]
    fn test_compare_without_checkpoint_is_false() {
        let mut pages = Pages::new(MemoryStore::new());
        pages
            .set_page_data(Domain::Education, json!([{"name": "Welding"}]))
            .unwrap();

        let diff = compare_hashes(&pages);
        assert!(diff.values().all(|changed| !changed));
    }

    #[test]
    fn test_compare_after_checkpoint_and_mutation() {
        let mut pages = Pages::new(MemoryStore::new());
        pages
            .set_page_data(Domain::Education, json!([{"name": "Welding"}]))
            .unwrap();
        checkpoint(&mut pages).unwrap();
        assert!(!compare_hashes(&pages)[&Domain::Education]);

        pages
            .set_page_data(Domain::Education, json!([{"name": "Welding", "level": 2}]))
            .unwrap();
        let diff = compare_hashes(&pages);
        assert!(diff[&Domain::Education]);
        assert!(!diff[&Domain::Fishing]);
    }

    #[test]
    fn test_domain_with_no_prior_hash_not_flagged() {
        let mut pages = Pages::new(MemoryStore::new());
        checkpoint(&mut pages).unwrap();
        pages
            .set_page_data(Domain::Fishing, Domain::Fishing.empty_data())
            .unwrap();
        // stored hash for fishing is "" so it is never flagged
        assert!(!compare_hashes(&pages)[&Domain::Fishing]);
    }

    #[test]
    fn test_stored_hashes_roundtrip_and_ignore_garbage() {
        let mut pages = Pages::new(MemoryStore::new());
        let mut hashes = BTreeMap::new();
        hashes.insert(Domain::Checklist, "abc".to_string());
        store_hashes(&mut pages, &hashes).unwrap();
        assert_eq!(get_stored_hashes(&pages), hashes);

        pages
            .write_key(HASHES_KEY, r#"{"checklist":"abc","boats":"x","fishing":7}"#)
            .unwrap();
        assert_eq!(get_stored_hashes(&pages), hashes);

        pages.write_key(HASHES_KEY, "not json").unwrap();
        assert!(get_stored_hashes(&pages).is_empty());
    }
}
