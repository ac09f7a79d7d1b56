//! Error types for the Falcata library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`FalcataError`] enum. Most engines never fail: a prefix that is not in the
//! index or a corpus with no close match simply yields an empty result. Only
//! arguments that make an operation meaningless are surfaced as
//! [`FalcataError::InvalidArgument`].
//!
//! # Examples
//!
//! ```
//! use falcata::error::{FalcataError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FalcataError::invalid_argument("limit must be at least 1"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Falcata operations.
#[derive(Error, Debug)]
pub enum FalcataError {
    /// A caller-supplied argument makes the operation undefined
    /// (non-positive limit, mismatched vector dimensions, unknown user, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors (bad values, unreadable config file contents).
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (dictionary, corpus or config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FalcataError.
pub type Result<T> = std::result::Result<T, FalcataError>;

impl FalcataError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FalcataError::InvalidArgument(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        FalcataError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FalcataError::Other(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        FalcataError::InvalidArgument(format!(
            "Vector dimension mismatch: expected {expected}, got {actual}"
        ))
    }

    /// Whether this error reports a bad caller argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, FalcataError::InvalidArgument(_))
    }
}
