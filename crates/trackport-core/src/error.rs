//! Error types and exit codes for trackport
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store, excluded domain, unrecognized payload, etc.)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the trackport CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during trackport operations
#[derive(Error, Debug)]
pub enum TrackportError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("unknown page: {0}")]
    UnknownDomain(String),

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    #[error("{domain} is excluded from import/export")]
    ExcludedDomain { domain: String },

    #[error("invalid {domain} data: {reason}")]
    Structural { domain: String, reason: String },

    #[error("unrecognized import format: {0}")]
    UnrecognizedFormat(String),

    #[error("no data for page: {0}")]
    NoData(String),

    // Storage failures (exit code 1)
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, {available} available")]
    StorageQuota {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("failed to {operation} {key}: {reason}")]
    Storage {
        operation: String,
        key: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Other(String),
}

impl TrackportError {
    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        TrackportError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Create a structural validation error for a domain payload
    pub fn structural(domain: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        TrackportError::Structural {
            domain: domain.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an error for a failed storage operation on a key
    pub fn storage(operation: &str, key: &str, error: impl std::fmt::Display) -> Self {
        TrackportError::Storage {
            operation: operation.to_string(),
            key: key.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            TrackportError::UsageError(_)
            | TrackportError::UnknownDomain(_)
            | TrackportError::Unsupported { .. } => ExitCode::Usage,

            TrackportError::StoreNotFound { .. }
            | TrackportError::InvalidStore { .. }
            | TrackportError::ExcludedDomain { .. }
            | TrackportError::Structural { .. }
            | TrackportError::UnrecognizedFormat(_)
            | TrackportError::NoData(_) => ExitCode::Data,

            TrackportError::StorageQuota { .. }
            | TrackportError::Storage { .. }
            | TrackportError::Io(_)
            | TrackportError::Json(_)
            | TrackportError::Toml(_)
            | TrackportError::Sqlite(_)
            | TrackportError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            TrackportError::UsageError(_) => "usage_error",
            TrackportError::UnknownDomain(_) => "unknown_page",
            TrackportError::Unsupported { .. } => "unsupported",
            TrackportError::StoreNotFound { .. } => "store_not_found",
            TrackportError::InvalidStore { .. } => "invalid_store",
            TrackportError::ExcludedDomain { .. } => "excluded_page",
            TrackportError::Structural { .. } => "structural",
            TrackportError::UnrecognizedFormat(_) => "unrecognized_format",
            TrackportError::NoData(_) => "no_data",
            TrackportError::StorageQuota { .. } => "storage_quota",
            TrackportError::Storage { .. } => "storage",
            TrackportError::Io(_) => "io_error",
            TrackportError::Json(_) => "json_error",
            TrackportError::Toml(_) => "toml_error",
            TrackportError::Sqlite(_) => "sqlite_error",
            TrackportError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for trackport operations
pub type Result<T> = std::result::Result<T, TrackportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            TrackportError::UsageError("x".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            TrackportError::ExcludedDomain {
                domain: "merchants".into()
            }
            .exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            TrackportError::storage("write", "k", "disk full").exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_excluded_message() {
        let err = TrackportError::ExcludedDomain {
            domain: "vehicles".into(),
        };
        assert_eq!(err.to_string(), "vehicles is excluded from import/export");
    }

    #[test]
    fn test_to_json_envelope() {
        let err = TrackportError::structural("checklist", "businesses must be an array");
        let json = err.to_json();
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["type"], "structural");
        assert_eq!(
            json["error"]["message"],
            "invalid checklist data: businesses must be an array"
        );
    }
}
