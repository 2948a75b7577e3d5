//! Domain registry and storage adapter
//!
//! `Pages` owns the key/value store and an in-memory cache of parsed domain
//! documents. Reads go through the cache; `set_page_data` writes through
//! immediately. `stage_page_data` defers the write until `flush()`.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;

use crate::domain::Domain;
use crate::error::Result;
use crate::kv::KeyValueStore;

/// Cached, store-backed access to every domain document
#[derive(Debug)]
pub struct Pages<S: KeyValueStore> {
    store: S,
    cache: RefCell<HashMap<Domain, Option<Value>>>,
    dirty: BTreeSet<Domain>,
}

impl<S: KeyValueStore> Pages<S> {
    pub fn new(store: S) -> Self {
        Pages {
            store,
            cache: RefCell::new(HashMap::new()),
            dirty: BTreeSet::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store. Drops the cache, since the caller
    /// may write keys behind its back.
    pub fn store_mut(&mut self) -> &mut S {
        self.cache.get_mut().clear();
        self.dirty.clear();
        &mut self.store
    }

    /// Whether the domain is filtered from bulk operations
    pub fn is_page_excluded(&self, domain: Domain) -> bool {
        domain.is_excluded()
    }

    /// Domains that take part in import/export
    pub fn get_available_pages(&self) -> Vec<Domain> {
        Domain::available()
    }

    /// Read and parse a domain's document.
    ///
    /// Absent keys, unreadable keys and malformed JSON all yield `None`; the
    /// latter two are logged.
    pub fn get_page_data(&self, domain: Domain) -> Option<Value> {
        if let Some(cached) = self.cache.borrow().get(&domain) {
            return cached.clone();
        }

        let data = self.read_page(domain);
        self.cache.borrow_mut().insert(domain, data.clone());
        data
    }

    fn read_page(&self, domain: Domain) -> Option<Value> {
        let key = domain.storage_key();
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(page = %domain, key, error = %e, "failed to read page data");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(page = %domain, key, error = %e, "stored page data is not valid JSON");
                None
            }
        }
    }

    /// The domain's document, or its empty shape when nothing is stored
    pub fn page_data_or_empty(&self, domain: Domain) -> Value {
        self.get_page_data(domain)
            .unwrap_or_else(|| domain.empty_data())
    }

    /// Read every non-excluded domain
    pub fn get_all_page_data(&self) -> BTreeMap<Domain, Option<Value>> {
        Domain::available()
            .into_iter()
            .map(|domain| (domain, self.get_page_data(domain)))
            .collect()
    }

    /// Serialize and persist a domain's document immediately
    pub fn set_page_data(&mut self, domain: Domain, data: Value) -> Result<()> {
        self.stage_page_data(domain, data);
        self.flush_page(domain)
    }

    /// Update the cached document without writing it; `flush()` persists it
    pub fn stage_page_data(&mut self, domain: Domain, data: Value) {
        self.cache.get_mut().insert(domain, Some(data));
        self.dirty.insert(domain);
    }

    /// Whether staged changes are waiting for `flush()`
    pub fn has_pending_writes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Write every staged document back to the store
    pub fn flush(&mut self) -> Result<()> {
        let pending: Vec<Domain> = self.dirty.iter().copied().collect();
        for domain in pending {
            self.flush_page(domain)?;
        }
        Ok(())
    }

    fn flush_page(&mut self, domain: Domain) -> Result<()> {
        let Some(Some(data)) = self.cache.get_mut().get(&domain).cloned() else {
            self.dirty.remove(&domain);
            return Ok(());
        };

        let serialized = serde_json::to_string(&data)?;
        match self.store.set(domain.storage_key(), &serialized) {
            Ok(()) => {
                self.dirty.remove(&domain);
                tracing::debug!(page = %domain, bytes = serialized.len(), "page data written");
                Ok(())
            }
            Err(e) => {
                // the cached copy no longer mirrors storage
                self.cache.get_mut().remove(&domain);
                self.dirty.remove(&domain);
                Err(e)
            }
        }
    }

    /// Read a raw key that is not a domain document
    pub fn read_key(&self, key: &str) -> Result<Option<String>> {
        self.store.get(key)
    }

    /// Write a raw key that is not a domain document
    pub fn write_key(&mut self, key: &str, value: &str) -> Result<()> {
        self.store.set(key, value)
    }

    /// Drop the cache and any staged writes; the next read hits the store
    pub fn reload(&mut self) {
        self.cache.get_mut().clear();
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackportError;
    use crate::kv::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_absent_page_is_none() {
        let pages = Pages::new(MemoryStore::new());
        assert_eq!(pages.get_page_data(Domain::Fishing), None);
        assert_eq!(
            pages.page_data_or_empty(Domain::Education),
            json!([])
        );
    }

    #[test]
    fn test_malformed_json_is_none() {
        let mut store = MemoryStore::new();
        store.set("educationTimers", "{not json").unwrap();
        let pages = Pages::new(store);
        assert_eq!(pages.get_page_data(Domain::Education), None);
    }

    #[test]
    fn test_set_page_data_writes_through() {
        let mut pages = Pages::new(MemoryStore::new());
        pages
            .set_page_data(Domain::Education, json!([{"name": "Welding"}]))
            .unwrap();

        let raw = pages.store().get("educationTimers").unwrap().unwrap();
        assert_eq!(raw, r#"[{"name":"Welding"}]"#);
        assert!(!pages.has_pending_writes());
    }

    #[test]
    fn test_stage_then_flush() {
        let mut pages = Pages::new(MemoryStore::new());
        pages.stage_page_data(Domain::Logistics, Domain::Logistics.empty_data());
        assert!(pages.has_pending_writes());
        assert_eq!(pages.store().get("logisticsData").unwrap(), None);
        assert!(pages.get_page_data(Domain::Logistics).is_some());

        pages.flush().unwrap();
        assert!(!pages.has_pending_writes());
        assert!(pages.store().get("logisticsData").unwrap().is_some());
    }

    #[test]
    fn test_reload_discards_staged_and_rereads() {
        let mut pages = Pages::new(MemoryStore::new());
        pages.stage_page_data(Domain::Fishing, Domain::Fishing.empty_data());
        pages.reload();
        assert_eq!(pages.get_page_data(Domain::Fishing), None);

        pages
            .store_mut()
            .set("fishingData", r#"{"locations":[],"fish":[],"rewards":[]}"#)
            .unwrap();
        assert!(pages.get_page_data(Domain::Fishing).is_some());
    }

    #[test]
    fn test_get_all_page_data_skips_excluded() {
        let mut store = MemoryStore::new();
        store.set("traveling_merchants", "{}").unwrap();
        let pages = Pages::new(store);

        let all = pages.get_all_page_data();
        assert!(!all.contains_key(&Domain::Merchants));
        assert!(!all.contains_key(&Domain::Vehicles));
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_failed_write_surfaces_error() {
        let mut pages = Pages::new(MemoryStore::with_quota(8));
        let err = pages
            .set_page_data(Domain::Checklist, Domain::Checklist.empty_data())
            .unwrap_err();
        assert!(matches!(err, TrackportError::StorageQuota { .. }));
        assert_eq!(pages.get_page_data(Domain::Checklist), None);
    }
}
