// Pwman - Top-level error types
//
// Wraps store errors and the CLI shell's own failures into one enum for the
// application boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all pwman operations.
#[derive(Debug, Error)]
pub enum PwmanError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Database file does not exist: {}", .0.display())]
    DatabaseMissing(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PwmanError>;
