//! Exit codes for the fedicensus binary.
//!
//! Exit codes communicate which stage failed without requiring log parsing.
//! A scheduler only needs to distinguish zero from non-zero.

use fc_common::Error;

/// Exit codes for fedicensus operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed and both stores were written
    Success = 0,

    /// Settings could not be resolved
    ConfigError = 10,

    /// Token missing or blank
    AuthError = 11,

    /// Request failed or timed out
    NetworkError = 20,

    /// Response could not be typed, or no usable timestamps
    DataError = 30,

    /// A store could not be read or written
    StorageError = 40,

    /// I/O error outside the stores
    IoError = 60,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) => ExitCode::ConfigError,
            Error::Authentication(_) => ExitCode::AuthError,
            Error::Network(_) | Error::Timeout { .. } => ExitCode::NetworkError,
            Error::Schema(_) | Error::InsufficientData(_) => ExitCode::DataError,
            Error::StorageRead { .. } | Error::StorageWrite { .. } => ExitCode::StorageError,
            Error::Io(_) | Error::Json(_) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
