//! Error types for the engine's fallible edges.
//!
//! Editing itself never fails: out-of-range requests clamp or do nothing.
//! Errors only come from the outside world (clipboard backends, option
//! files, `:set` arguments).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A clipboard read or write that did not happen.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard is reachable (headless session, disabled feature).
    #[error("clipboard unavailable")]
    Unavailable,

    /// The backend refused the request.
    #[error("clipboard backend error: {0}")]
    Backend(String),
}

/// Loading, saving or changing editor options failed.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid options file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize options: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid argument: {name}={value}")]
    InvalidValue { name: String, value: String },
}
