//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The state machine specification is missing or unusable
    #[error("Specification error: {0}")]
    Spec(String),

    /// Specification parsing errors
    #[error("Specification parsing error in {file:?}: {message}")]
    SpecParse { file: PathBuf, message: String },

    /// An order record that could not be decoded into its seven fields
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    /// Parser errors
    #[error("Parser error: {0}")]
    Parser(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a specification error
    pub fn spec(msg: impl Into<String>) -> Self {
        Self::Spec(msg.into())
    }

    /// Create a malformed record error for the given input line
    pub fn malformed(line: u64, msg: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            message: msg.into(),
        }
    }
}

// Implement From traits for common external error types

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parser(format!("JSON error: {}", err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            _ => Error::MalformedRecord { line, message },
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(format!("invalid pattern: {}", err))
    }
}
