//! Error types for Journal operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Journal crates. Uses `thiserror` for derive macros.
//!
//! The variants follow the request taxonomy: the first four are caller
//! mistakes, the rest are server-side failures whose detail must stay out
//! of response bodies.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Journal operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No session, or the session could not be resolved.
    #[error("Authentication required")]
    Unauthenticated,

    /// A valid session whose role is not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Operation on an identifier that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed input fields.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Server configuration is missing or unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the persistence backend.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific file.
    #[error("I/O error at {}: {source}", path.display())]
    IoWithPath {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a forbidden error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Wrap an I/O error with the path it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error is a [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the caller caused this error (as opposed to the server).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Forbidden(_) | Self::NotFound(_) | Self::Validation(_)
        )
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Config(_) => "configuration",
            Self::Storage(_) | Self::Io(_) | Self::IoWithPath { .. } | Self::Serialization(_) => {
                "internal"
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using Journal's Error type.
pub type Result<T> = std::result::Result<T, Error>;
