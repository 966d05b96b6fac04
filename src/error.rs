//! Error types for passkeeper.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected input for a save action.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Website must not be empty")]
    EmptyWebsite,

    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Main error type for passkeeper operations.
#[derive(Error, Debug)]
pub enum PassError {
    #[error("Please don't leave any fields empty: {0}")]
    Validation(#[from] ValidationError),

    #[error("Data file {path} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("Clipboard operation failed")]
    ClipboardFailed,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl PassError {
    /// True for errors the user fixes by correcting their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, PassError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, PassError>;
