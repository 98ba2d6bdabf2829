//! Error types for the simvec library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SimvecError`] enum.
//!
//! # Examples
//!
//! ```
//! use simvec::error::{Result, SimvecError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SimvecError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for simvec operations.
#[derive(Error, Debug)]
pub enum SimvecError {
    /// I/O errors (snapshot files, CLI input files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller supplied an argument the store cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Vector dimension does not match the dimension of the store.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Persisted data is malformed or inconsistent.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// The embedding provider failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SimvecError.
pub type Result<T> = std::result::Result<T, SimvecError>;

impl SimvecError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SimvecError::InvalidArgument(msg.into())
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        SimvecError::DimensionMismatch { expected, actual }
    }

    /// Create a new snapshot error.
    pub fn snapshot<S: Into<String>>(msg: S) -> Self {
        SimvecError::Snapshot(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        SimvecError::Embedding(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SimvecError::Serialization(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        SimvecError::InvalidOperation(msg.into())
    }
}

impl From<bincode::Error> for SimvecError {
    fn from(err: bincode::Error) -> Self {
        SimvecError::Serialization(err.to_string())
    }
}
