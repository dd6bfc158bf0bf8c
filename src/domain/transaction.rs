//! Transactions
//!
//! A posting request before it is accepted (`NewTransaction`) and the
//! immutable ledger record it becomes once committed (`Transaction`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::amount::{Amount, Description};
use super::error::DomainError;

/// Direction of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "c")]
    Credit,
    #[serde(rename = "d")]
    Debit,
}

impl TransactionKind {
    /// Wire/storage tag ("c" or "d")
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "c",
            TransactionKind::Debit => "d",
        }
    }

    /// Signed balance delta for an amount of this kind
    pub fn signed(&self, amount: Amount) -> i64 {
        match self {
            TransactionKind::Credit => amount.value(),
            TransactionKind::Debit => -amount.value(),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(TransactionKind::Credit),
            "d" => Ok(TransactionKind::Debit),
            other => Err(DomainError::InvalidKind(other.to_string())),
        }
    }
}

/// A validated posting that has not been committed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Amount,
    pub description: Description,
}

impl NewTransaction {
    /// Validate raw posting fields.
    ///
    /// Kind is checked first, then amount, then description.
    pub fn validate(kind: &str, amount: i64, description: &str) -> Result<Self, DomainError> {
        let kind: TransactionKind = kind.parse()?;
        let amount = Amount::new(amount)?;
        let description = Description::new(description)?;

        Ok(Self {
            kind,
            amount,
            description,
        })
    }

    /// Signed balance delta of this posting
    pub fn delta(&self) -> i64 {
        self.kind.signed(self.amount)
    }

    /// Stamp the posting, producing the immutable ledger record
    pub fn into_transaction(self, occurred_at: DateTime<Utc>) -> Transaction {
        Transaction {
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            occurred_at,
        }
    }
}

/// Committed ledger record. Never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub amount: Amount,
    pub description: Description,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn delta(&self) -> i64 {
        self.kind.signed(self.amount)
    }
}

/// Pick the timestamp for a new posting so that timestamps never go
/// backwards within one account's log, even if the wall clock does.
pub fn next_occurred_at(now: DateTime<Utc>, last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match last {
        Some(last) if last > now => last,
        _ => now,
    }
}
