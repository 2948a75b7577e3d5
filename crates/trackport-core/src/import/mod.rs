//! Import: per-domain merge/replace reconciliation and unified orchestration
//!
//! Every domain importer is a pure function from (current document, payload,
//! mode) to (new document, counts). The new document is only written once the
//! importer has finished, so a structural abort never touches storage.

mod apartments;
mod checklist;
mod education;
mod fishing;
mod logistics;
mod merge;
mod passthrough;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::detect::{detect_format, FormatKind};
use crate::domain::Domain;
use crate::error::{Result, TrackportError};
use crate::hash;
use crate::kv::KeyValueStore;
use crate::pages::Pages;
use crate::trace_time;

/// How incoming records reconcile with stored ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Discard the stored collection and substitute the incoming one
    Replace,
    /// Overlay matched records, append unseen ones, delete nothing
    #[default]
    Merge,
}

impl FromStr for ImportMode {
    type Err = TrackportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            other => Err(TrackportError::unsupported("import mode", other, "replace, merge")),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Replace => write!(f, "replace"),
            ImportMode::Merge => write!(f, "merge"),
        }
    }
}

/// Outcome of importing one domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    /// Newly created records
    pub success: usize,
    /// Existing records modified
    pub updated: usize,
    /// Records (or whole imports) that failed
    pub errors: usize,
    pub messages: Vec<String>,
}

impl ImportResult {
    /// A result for an import that aborted as a whole
    pub fn failed(message: impl Into<String>) -> Self {
        ImportResult {
            errors: 1,
            messages: vec![message.into()],
            ..Default::default()
        }
    }

    pub(crate) fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "record skipped");
        self.errors += 1;
        self.messages.push(message);
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Outcome of importing a payload that may span several domains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub success: usize,
    pub updated: usize,
    pub errors: usize,
    pub messages: Vec<String>,
    pub page_results: BTreeMap<Domain, ImportResult>,
}

impl AggregateResult {
    pub fn failed(message: impl Into<String>) -> Self {
        AggregateResult {
            errors: 1,
            messages: vec![message.into()],
            ..Default::default()
        }
    }

    fn absorb(&mut self, domain: Domain, result: ImportResult) {
        self.success += result.success;
        self.updated += result.updated;
        self.errors += result.errors;
        self.messages
            .extend(result.messages.iter().map(|m| format!("{}: {}", domain, m)));
        self.page_results.insert(domain, result);
    }

    fn passthrough(domain: Domain, result: ImportResult) -> Self {
        AggregateResult {
            success: result.success,
            updated: result.updated,
            errors: result.errors,
            messages: result.messages.clone(),
            page_results: BTreeMap::from([(domain, result)]),
        }
    }

    /// Nothing failed
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    /// Something failed and nothing was created or updated
    pub fn is_total_failure(&self) -> bool {
        self.errors > 0 && self.success == 0 && self.updated == 0
    }
}

/// Compute a domain's new document without touching storage.
///
/// Policy exclusion is not checked here; `merchants` and `vehicles` resolve to
/// a plain overwrite.
pub fn apply_import(
    domain: Domain,
    current: Option<Value>,
    data: &Value,
    mode: ImportMode,
) -> Result<(Value, ImportResult)> {
    match domain {
        Domain::Checklist => checklist::import(current, data, mode),
        Domain::Apartments => apartments::import(current, data, mode),
        Domain::Education => education::import(current, data, mode),
        Domain::Fishing => fishing::import(current, data, mode),
        Domain::Logistics => logistics::import(current, data, mode),
        Domain::Merchants | Domain::Vehicles => passthrough::import(domain, data),
    }
}

/// Import one domain's payload and persist the result.
///
/// Excluded domains, structural failures and storage failures all come back
/// as a single-error result with nothing written.
#[tracing::instrument(skip_all, fields(page = %domain, mode = %mode))]
pub fn import_page_data<S: KeyValueStore>(
    pages: &mut Pages<S>,
    domain: Domain,
    data: &Value,
    mode: ImportMode,
) -> ImportResult {
    if domain.is_excluded() {
        return ImportResult::failed(TrackportError::ExcludedDomain {
            domain: domain.to_string(),
        }
        .to_string());
    }

    let start = Instant::now();
    let current = pages.get_page_data(domain);

    let (document, result) = match apply_import(domain, current, data, mode) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "import aborted");
            return ImportResult::failed(e.to_string());
        }
    };

    if let Err(e) = pages.set_page_data(domain, document) {
        tracing::error!(error = %e, "failed to save imported data");
        return ImportResult::failed(format!("failed to save {}: {}", domain, e));
    }

    tracing::info!(
        success = result.success,
        updated = result.updated,
        errors = result.errors,
        "page imported"
    );
    trace_time!(start, "import_page");
    result
}

/// Detect the payload's format and import every domain it carries.
///
/// Hashes are checkpointed only when the whole import finished without errors.
#[tracing::instrument(skip_all, fields(mode = %mode))]
pub fn import_with_format_detection<S: KeyValueStore>(
    pages: &mut Pages<S>,
    data: &Value,
    mode: ImportMode,
) -> AggregateResult {
    let detected = detect_format(data);
    tracing::debug!(format = ?detected.kind, "detected import format");

    let aggregate = match detected.kind {
        FormatKind::Unknown => {
            return AggregateResult::failed(
                TrackportError::UnrecognizedFormat(
                    "payload does not match any known page data".to_string(),
                )
                .to_string(),
            );
        }
        FormatKind::Unified => {
            let mut aggregate = AggregateResult::default();
            for domain in detected.domains {
                if domain.is_excluded() {
                    tracing::info!(page = %domain, "skipping excluded page");
                    aggregate
                        .messages
                        .push(format!("skipped {}: excluded from import/export", domain));
                    continue;
                }
                let payload = data.get(domain.name()).unwrap_or(&Value::Null);
                let result = import_page_data(pages, domain, payload, mode);
                aggregate.absorb(domain, result);
            }
            aggregate
        }
        kind => {
            let Some(domain) = kind.domain() else {
                return AggregateResult::failed(
                    TrackportError::UnrecognizedFormat(format!("{:?} has no target page", kind))
                        .to_string(),
                );
            };
            if domain.is_excluded() {
                return AggregateResult::failed(
                    TrackportError::ExcludedDomain {
                        domain: domain.to_string(),
                    }
                    .to_string(),
                );
            }
            AggregateResult::passthrough(domain, import_page_data(pages, domain, data, mode))
        }
    };

    finish(pages, aggregate)
}

/// Parse raw JSON text, then import it with format detection
pub fn import_json<S: KeyValueStore>(
    pages: &mut Pages<S>,
    raw: &str,
    mode: ImportMode,
) -> AggregateResult {
    match serde_json::from_str::<Value>(raw) {
        Ok(data) => import_with_format_detection(pages, &data, mode),
        Err(e) => AggregateResult::failed(format!("invalid JSON: {}", e)),
    }
}

fn finish<S: KeyValueStore>(pages: &mut Pages<S>, mut aggregate: AggregateResult) -> AggregateResult {
    if aggregate.is_clean() {
        if let Err(e) = hash::checkpoint(pages) {
            tracing::warn!(error = %e, "failed to record hash checkpoint");
            aggregate.errors += 1;
            aggregate
                .messages
                .push(format!("hash checkpoint not recorded: {}", e));
        }
    }
    aggregate
}
