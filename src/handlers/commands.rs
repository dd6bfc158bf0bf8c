//! Command definitions
//!
//! Commands carry raw caller input into the handlers; results carry what
//! the gateway serializes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Transaction};

// =========================================================================
// PostTransactionCommand
// =========================================================================

/// Command to post a credit or debit against an account.
///
/// Fields are unvalidated; the poster validates them after resolving the
/// account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTransactionCommand {
    pub account_id: AccountId,
    /// Magnitude in cents
    pub amount: i64,
    /// "c" or "d"
    pub kind: String,
    pub description: String,
}

impl PostTransactionCommand {
    pub fn new(
        account_id: AccountId,
        amount: i64,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            amount,
            kind: kind.into(),
            description: description.into(),
        }
    }

    pub fn credit(account_id: AccountId, amount: i64, description: impl Into<String>) -> Self {
        Self::new(account_id, amount, "c", description)
    }

    pub fn debit(account_id: AccountId, amount: i64, description: impl Into<String>) -> Self {
        Self::new(account_id, amount, "d", description)
    }
}

/// Result of a successful posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingResult {
    pub balance: i64,
    pub limit: i64,
}

/// Point-in-time view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementResult {
    pub balance: i64,
    pub limit: i64,
    pub as_of: DateTime<Utc>,
    /// Newest first
    pub recent_transactions: Vec<Transaction>,
}
