//! Error types for Sparqvis operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Sparqvis crates. Uses `thiserror` for derive macros.
//!
//! Data-quality problems (unknown scheme names, empty domains, short ranges)
//! are not errors: they surface as warnings next to a usable result.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in Sparqvis operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The encoding specification cannot drive a transformation.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an I/O error.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Create an I/O error that remembers the path involved.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source: err,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a malformed encoding error.
    pub fn malformed_encoding(msg: impl Into<String>) -> Self {
        Self::MalformedEncoding(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Whether this error was caused by the encoding specification.
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, Self::MalformedEncoding(_))
    }
}

/// Result type alias using Sparqvis's Error type.
pub type Result<T> = std::result::Result<T, Error>;
