//! Error types for Fedicensus.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Fedicensus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Config,
    Authentication,
    Fetch,
    Validate,
    Storage,
    Io,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Authentication => "authentication",
            Stage::Fetch => "fetch",
            Stage::Validate => "validate",
            Stage::Storage => "storage",
            Stage::Io => "io",
        };
        f.write_str(name)
    }
}

/// Unified error type for Fedicensus.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Authentication(String),

    // Fetch errors (20-29)
    #[error("network request failed: {0}")]
    Network(String),

    #[error("network request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    // Validation errors (30-39)
    #[error("schema error: {0}")]
    Schema(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    // Storage errors (40-49)
    #[error("cannot read {store} store {}: {reason}", .path.display())]
    StorageRead {
        store: String,
        path: PathBuf,
        reason: String,
    },

    #[error("cannot write {store} store {}: {reason}", .path.display())]
    StorageWrite {
        store: String,
        path: PathBuf,
        reason: String,
    },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting and exit status mapping.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Authentication(_) => 11,
            Error::Network(_) => 20,
            Error::Timeout { .. } => 21,
            Error::Schema(_) => 30,
            Error::InsufficientData(_) => 31,
            Error::StorageRead { .. } => 40,
            Error::StorageWrite { .. } => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// The pipeline stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Config(_) => Stage::Config,
            Error::Authentication(_) => Stage::Authentication,
            Error::Network(_) | Error::Timeout { .. } => Stage::Fetch,
            Error::Schema(_) | Error::InsufficientData(_) => Stage::Validate,
            Error::StorageRead { .. } | Error::StorageWrite { .. } => Stage::Storage,
            Error::Io(_) | Error::Json(_) => Stage::Io,
        }
    }

    /// True for every failure of the network call, including the deadline.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout { .. })
    }
}
