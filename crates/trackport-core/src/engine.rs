//! Reconciliation engine facade
//!
//! `Engine` bundles the page repository with export/import/detection and the
//! hash checkpoint. Import entry points never fail: every outcome, including
//! parse errors and unknown formats, is reported through the result object.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::StoreConfig;
use crate::detect::{detect_format, DetectedFormat};
use crate::domain::Domain;
use crate::error::{Result, TrackportError};
use crate::export::{export_all_data, export_page_data};
use crate::hash;
use crate::import::{self, AggregateResult, ImportMode, ImportResult};
use crate::kv::KeyValueStore;
use crate::pages::Pages;

/// Engine behaviour that comes from store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub export_version: String,
    pub checkpoint_on_export: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions::from(&StoreConfig::default())
    }
}

impl From<&StoreConfig> for EngineOptions {
    fn from(config: &StoreConfig) -> Self {
        EngineOptions {
            export_version: config.export_version.clone(),
            checkpoint_on_export: config.checkpoint_on_export,
        }
    }
}

/// Single-user reconciliation engine over a key/value store.
///
/// Mutating operations take `&mut self`, so one engine serializes every
/// read-merge-write sequence for its store.
#[derive(Debug)]
pub struct Engine<S: KeyValueStore> {
    pages: Pages<S>,
    options: EngineOptions,
}

impl<S: KeyValueStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, EngineOptions::default())
    }

    pub fn with_options(store: S, options: EngineOptions) -> Self {
        Engine {
            pages: Pages::new(store),
            options,
        }
    }

    pub fn pages(&self) -> &Pages<S> {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut Pages<S> {
        &mut self.pages
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Export one domain, or every domain when `domain` is `None`.
    ///
    /// Records a hash checkpoint afterwards when configured to.
    #[tracing::instrument(skip(self))]
    pub fn export(&mut self, domain: Option<Domain>) -> Result<Value> {
        let document = match domain {
            Some(domain) if domain.is_excluded() => {
                return Err(TrackportError::ExcludedDomain {
                    domain: domain.to_string(),
                });
            }
            Some(domain) => export_page_data(&self.pages, domain, &self.options.export_version)
                .ok_or_else(|| TrackportError::NoData(domain.to_string()))?,
            None => export_all_data(&self.pages, &self.options.export_version),
        };

        if self.options.checkpoint_on_export {
            hash::checkpoint(&mut self.pages)?;
        }

        Ok(document)
    }

    /// Import a parsed payload, detecting its format
    pub fn import(&mut self, data: &Value, mode: ImportMode) -> AggregateResult {
        import::import_with_format_detection(&mut self.pages, data, mode)
    }

    /// Import raw JSON text, detecting its format
    pub fn import_json(&mut self, raw: &str, mode: ImportMode) -> AggregateResult {
        import::import_json(&mut self.pages, raw, mode)
    }

    /// Import a payload into one named domain, bypassing detection
    pub fn import_page(&mut self, domain: Domain, data: &Value, mode: ImportMode) -> ImportResult {
        import::import_page_data(&mut self.pages, domain, data, mode)
    }

    pub fn detect_format(&self, data: &Value) -> DetectedFormat {
        detect_format(data)
    }

    /// Per domain, whether content changed since the last checkpoint
    pub fn diff_since_checkpoint(&self) -> BTreeMap<Domain, bool> {
        hash::compare_hashes(&self.pages)
    }

    /// Record the current hashes as the checkpoint
    pub fn checkpoint(&mut self) -> Result<BTreeMap<Domain, String>> {
        hash::checkpoint(&mut self.pages)
    }

    pub fn current_hashes(&self) -> BTreeMap<Domain, String> {
        hash::calculate_all_hashes(&self.pages)
    }

    pub fn stored_hashes(&self) -> BTreeMap<Domain, String> {
        hash::get_stored_hashes(&self.pages)
    }
}
