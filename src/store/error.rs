//! Store Errors
//!
//! Error types for ledger store operations.

use crate::domain::{AccountId, DomainError};

/// SQLSTATE codes for which a fresh attempt may succeed
const RETRYABLE_SQLSTATES: &[&str] = &[
    "40001", // serialization_failure
    "40P01", // deadlock_detected
];

/// Errors that can occur in a ledger store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No provisioned account with this id
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Posting rejected by the limit rule inside the commit
    #[error(transparent)]
    Rejected(#[from] DomainError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Maximum retries exceeded
    #[error("Maximum retries exceeded for commit")]
    MaxRetriesExceeded,

    /// Stored row violates a domain invariant
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

impl StoreError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Database(sqlx::Error::Database(db_err)) => db_err
                .code()
                .map(|code| RETRYABLE_SQLSTATES.iter().any(|s| *s == code))
                .unwrap_or(false),
            StoreError::Database(sqlx::Error::PoolTimedOut) => true,
            _ => false,
        }
    }

    /// Check if a retry can never help (business or lookup failure)
    pub fn is_terminal(&self) -> bool {
        matches!(self, StoreError::AccountNotFound(_) | StoreError::Rejected(_))
    }
}
