//! Trackport Core Library
//!
//! Reconciliation engine for tracker page data: per-domain storage, content
//! hashing and change detection, import format detection, and merge/replace
//! import across independent domains.

pub mod config;
pub mod detect;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod hash;
pub mod import;
pub mod kv;
pub mod logging;
pub mod pages;
pub mod store;
pub mod value;

pub use detect::{detect_format, DetectedFormat, FormatKind};
pub use domain::Domain;
pub use engine::{Engine, EngineOptions};
pub use error::{Result, TrackportError};
pub use import::{AggregateResult, ImportMode, ImportResult};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
