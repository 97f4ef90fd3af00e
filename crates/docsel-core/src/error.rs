//! Error types and error code constants for docsel.
//!
//! `DocselError` bridges the errors of the individual subsystems (filter
//! parsing, discovery, configuration) into one type suitable for the CLI and
//! its JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad filter expression, bad configuration value)
//! - `3`: Discovery errors (missing module, unreadable test document)
//! - `10`: Internal errors (I/O, serialization, unexpected state)

use std::fmt;
use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::filter::InvalidFilterError;
use crate::finder::FindError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output and process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad filter, bad config).
    InvalidArguments = 2,
    /// Test discovery failed.
    DiscoveryError = 3,
    /// Internal errors (I/O, serialization, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum DocselError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// The filter expression does not parse.
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] InvalidFilterError),

    /// Test discovery failed.
    #[error(transparent)]
    Discovery(#[from] FindError),

    /// I/O failure reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<&DocselError> for OutputErrorCode {
    fn from(err: &DocselError) -> Self {
        match err {
            DocselError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            DocselError::InvalidFilter(_) => OutputErrorCode::InvalidArguments,
            DocselError::Discovery(_) => OutputErrorCode::DiscoveryError,
            DocselError::Io(_) => OutputErrorCode::InternalError,
            DocselError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Bridge: ConfigError -> DocselError
// ============================================================================

impl From<ConfigError> for DocselError {
    fn from(err: ConfigError) -> Self {
        DocselError::InvalidArguments {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DocselError {
    fn from(err: serde_json::Error) -> Self {
        DocselError::Internal {
            message: format!("JSON error: {err}"),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl DocselError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        DocselError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        DocselError::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}
