use std::path::PathBuf;
use thiserror::Error;

use crate::models::EntityKind;

/// All errors produced by the admin dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A record file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// An entity name is not one of the recognised entity kinds.
    #[error("Unknown entity kind: {0}")]
    UnknownEntity(String),

    /// The configured record store directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A per-day count source could not be fetched, so no report can be built.
    #[error("Report unavailable: failed to fetch {kind} counts: {reason}")]
    ReportUnavailable { kind: EntityKind, reason: String },

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
