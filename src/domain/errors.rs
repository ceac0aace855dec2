//! Domain error types
//!
//! This module defines the error hierarchy for dwgbatch. Errors are grouped the
//! way the export job reacts to them: configuration problems stop the job before
//! any export, validation failures only escape when the resolution engine
//! deliberately rolls a transaction back, and host/codec errors abort the
//! remaining view list.

use thiserror::Error;

/// Main dwgbatch error type
#[derive(Debug, Error)]
pub enum DwgBatchError {
    /// Configuration-related errors (bad params, missing override file, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// View selection resolved to nothing or referenced a missing view set
    #[error("Configuration error: {0}")]
    Selection(String),

    /// A nested transaction was rolled back while resolving validation failures
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document-model command was rejected by the host
    #[error("Host error: {0}")]
    Host(String),

    /// Export codec errors
    #[error("Export error: {0}")]
    Codec(#[from] CodecError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl DwgBatchError {
    /// Whether the error belongs to the configuration class (exit code 2)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DwgBatchError::Configuration(_) | DwgBatchError::Selection(_)
        )
    }
}

/// Errors raised by the export codec
///
/// Each variant carries the codec's message and, optionally, the underlying
/// cause so that callers can report both.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Output directory or file name cannot be used
    #[error("Invalid path: {message}")]
    InvalidPath {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// An argument (view list, options) was rejected
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The document is in a state that does not allow export
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl CodecError {
    /// Creates an invalid-path error without an inner cause
    pub fn invalid_path(message: impl Into<String>) -> Self {
        CodecError::InvalidPath {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CodecError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid-operation error wrapping an I/O failure
    pub fn invalid_operation(message: impl Into<String>, source: std::io::Error) -> Self {
        CodecError::InvalidOperation {
            message: message.into(),
            source: Some(source),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for DwgBatchError {
    fn from(err: std::io::Error) -> Self {
        DwgBatchError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DwgBatchError {
    fn from(err: serde_json::Error) -> Self {
        DwgBatchError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DwgBatchError {
    fn from(err: toml::de::Error) -> Self {
        DwgBatchError::Configuration(format!("TOML parse error: {err}"))
    }
}
