//! Error types for the Primer library.
//!
//! All fallible operations in this crate return [`PrimerError`] through the
//! [`Result`] alias. Morphology, text and regression code share the enum so
//! that the command line tools can report every failure the same way.
//!
//! # Examples
//!
//! ```
//! use primer::error::{PrimerError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PrimerError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

use crate::ml::MLError;

/// The main error type for Primer operations.
#[derive(Error, Debug)]
pub enum PrimerError {
    /// I/O errors (dataset files, dictionaries, saved models)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid stem pattern in a paradigm dictionary
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// No candidate tag survived the selection filter
    #[error("No matching tag: {0}")]
    NoMatchingTag(String),

    /// Empty string where a non-empty one is required
    #[error("{0} cannot be empty")]
    EmptyInput(String),

    /// Absent value where one is required
    #[error("Value cannot be null: {0}")]
    NullInput(String),

    /// Morphology dictionary or analysis errors
    #[error("Morphology error: {0}")]
    Morphology(String),

    /// Column and schema errors in data views
    #[error("Data error: {0}")]
    Data(String),

    /// Training, evaluation and prediction errors
    #[error("ML error: {0}")]
    Ml(#[from] MLError),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PrimerError.
pub type Result<T> = std::result::Result<T, PrimerError>;

impl PrimerError {
    /// Create a new no-matching-tag error.
    pub fn no_matching_tag<S: Into<String>>(msg: S) -> Self {
        PrimerError::NoMatchingTag(msg.into())
    }

    /// Create a new empty-input error naming the offending argument.
    pub fn empty_input<S: Into<String>>(name: S) -> Self {
        PrimerError::EmptyInput(name.into())
    }

    /// Create a new null-input error naming the offending argument.
    pub fn null_input<S: Into<String>>(name: S) -> Self {
        PrimerError::NullInput(name.into())
    }

    /// Create a new morphology error.
    pub fn morphology<S: Into<String>>(msg: S) -> Self {
        PrimerError::Morphology(msg.into())
    }

    /// Create a new data error.
    pub fn data<S: Into<String>>(msg: S) -> Self {
        PrimerError::Data(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        PrimerError::Data(format!("Parse error: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PrimerError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PrimerError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
