//! Custom error types for StickyWheel.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for StickyWheel operations.
#[derive(Error, Debug)]
pub enum StickyWheelError {
    // Strategy errors
    #[error("Unknown constraint strategy: {0}")]
    UnknownStrategy(String),

    // Descriptor errors
    #[error("No pyproject.toml found at {0}")]
    DescriptorNotFound(PathBuf),

    #[error("{0} is not a poetry project")]
    NotAPoetryProject(PathBuf),

    #[error("Missing required field '{field}' in {path}")]
    MissingField { field: String, path: PathBuf },

    // TOML parsing errors
    #[error("TOML edit error: {0}")]
    TomlEditError(#[from] toml_edit::TomlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StickyWheelError {
    /// Create an unknown strategy error
    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::UnknownStrategy(name.into())
    }

    /// Create a missing field error for a descriptor file
    pub fn missing_field(
        field: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::MissingField {
            field: field.into(),
            path: path.into(),
        }
    }
}
