//! Error types and handling for `TourMap`

use thiserror::Error;

/// Main error type for the `TourMap` pipeline
#[derive(Error, Debug)]
pub enum TourMapError {
    /// Missing or malformed credential and other configuration problems.
    /// Fatal: raised before any request is attempted.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Remote catalog could not be reached or answered with garbage
    #[error("Fetch failure: {0}")]
    Fetch(#[from] FetchFailure),

    /// A single raw record did not match the expected shape
    #[error("Schema mismatch: {0}")]
    Schema(#[from] SchemaMismatch),

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

/// Classification of a failed catalog call.
///
/// These never escape the catalog boundary as errors; they travel alongside an
/// empty payload so the caller can show a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Body is not JSON, or JSON without the catalog envelope
    #[error("response body is not a catalog JSON document: {0}")]
    InvalidBody(String),

    #[error("catalog returned result code {code}: {message}")]
    Api { code: String, message: String },
}

/// Why a raw record was dropped by the normalizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaMismatch {
    #[error("item is not an object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: {value}")]
    NotNumeric { field: &'static str, value: String },

    #[error("field `{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

impl TourMapError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the current request cycle has to stop
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, TourMapError::Config { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TourMapError::Config { .. } => {
                "Configuration error. Please check your config file and the catalog API key."
                    .to_string()
            }
            TourMapError::Fetch(_) => {
                "Unable to reach the tourism catalog. Showing no data; reload to try again."
                    .to_string()
            }
            TourMapError::Schema(e) => format!("Skipped a malformed record: {e}"),
            TourMapError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}
