//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a store file.
///
/// These carry no path; `ParquetTable` attaches the path and store name when
/// converting into `fc_common::Error`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store file does not exist
    #[error("store file does not exist")]
    Missing,

    /// Refusing to overwrite an existing store
    #[error("store file already exists")]
    AlreadyExists,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parquet encoding/decoding error
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow array construction or cast error
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Columns missing, mistyped or holding invalid values
    #[error("corrupt store: {0}")]
    Corrupt(String),

    /// File written by an incompatible schema version
    #[error("unsupported schema version {found} (current {current})")]
    UnsupportedVersion { found: String, current: String },
}
