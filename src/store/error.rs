// Pwman - Store error types

use std::path::PathBuf;

use thiserror::Error;

use super::models::SecretId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable at {}: {reason}", .path.display())]
    Unavailable { path: PathBuf, reason: String },

    #[error("Secret not found: {0}")]
    NotFound(SecretId),

    #[error("Scope violation: {0}")]
    ScopeViolation(String),

    #[error("Transaction failed to commit: {0}")]
    TransactionFailure(#[source] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
