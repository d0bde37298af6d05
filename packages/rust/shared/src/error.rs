//! Error types for pharmacorpus.
//!
//! Library crates use [`PharmaCorpusError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pharmacorpus operations.
#[derive(Debug, thiserror::Error)]
pub enum PharmaCorpusError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input file exists but could not be decoded (spreadsheet, CSV, JSON).
    #[error("failed to load {path:?}: {message}")]
    Load { path: PathBuf, message: String },

    /// An output file could not be encoded or written.
    #[error("failed to write {path:?}: {message}")]
    Write { path: PathBuf, message: String },

    /// Data validation error (missing column, malformed template, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A field pattern failed to compile.
    #[error("invalid pattern for '{field}': {message}")]
    Pattern { field: String, message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PharmaCorpusError>;

impl PharmaCorpusError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a load error for the given input path.
    pub fn load(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a write error for the given output path.
    pub fn write(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
