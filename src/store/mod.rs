//! Ledger Store module
//!
//! Persistence layer for account balances and their transaction logs.
//! A store owns both and mutates them together: a posting is either fully
//! visible (new balance and log entry) or not visible at all.

mod error;
mod memory;
mod repository;

use async_trait::async_trait;

use crate::domain::{Account, AccountId, NewTransaction, Transaction};

pub use error::StoreError;
pub use memory::{InMemoryStore, LedgerLog};
pub use repository::PgLedgerStore;

/// Accounts provisioned at startup: (id, limit). Mirrors the migration seed.
pub const DEFAULT_ACCOUNTS: [(AccountId, i64); 5] = [
    (1, 100_000),
    (2, 80_000),
    (3, 1_000_000),
    (4, 10_000_000),
    (5, 500_000),
];

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// Account state right after the commit
    pub account: Account,
    /// The appended log entry, with its assigned timestamp
    pub transaction: Transaction,
}

/// Balance/limit plus the newest log entries, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSnapshot {
    pub account: Account,
    pub recent: Vec<Transaction>,
}

/// Storage boundary used by the poster and the statement builder.
///
/// Implementations serialize commits per account and never across accounts.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Current balance and limit, or `None` for an unknown account
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Atomically check the limit, update the balance and append the
    /// transaction. On any error nothing is changed.
    async fn commit(&self, id: AccountId, tx: &NewTransaction) -> Result<Committed, StoreError>;

    /// Balance, limit and up to `recent` newest transactions read together
    async fn statement(
        &self,
        id: AccountId,
        recent: usize,
    ) -> Result<Option<StatementSnapshot>, StoreError>;
}
