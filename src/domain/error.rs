//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::amount::{AmountError, DescriptionError};

/// Domain-specific errors
///
/// These errors represent business rule violations and malformed postings.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Amount is zero, negative or not an integer
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Description is empty or longer than 10 characters
    #[error("Invalid description: {0}")]
    InvalidDescription(#[from] DescriptionError),

    /// Kind is neither credit ("c") nor debit ("d")
    #[error("Invalid transaction kind: {0:?}")]
    InvalidKind(String),

    /// Posting would push the balance below the negative of the limit
    #[error("Limit exceeded: balance {balance} {delta:+} would fall below -{limit}")]
    LimitExceeded { balance: i64, delta: i64, limit: i64 },

    /// Amount cannot be applied without overflowing the balance
    #[error("Balance overflow")]
    BalanceOverflow,
}

impl DomainError {
    /// Create a limit exceeded error
    pub fn limit_exceeded(balance: i64, delta: i64, limit: i64) -> Self {
        Self::LimitExceeded {
            balance,
            delta,
            limit,
        }
    }

    /// Check if the caller must fix the request before trying again
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidDescription(_)
                | Self::InvalidKind(_)
                | Self::BalanceOverflow
        )
    }
}
