//! In-Memory Ledger Store
//!
//! Each account owns a cell (balance plus log) behind its own mutex. The map
//! of cells is fixed at provisioning, so postings on different accounts never
//! contend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{next_occurred_at, Account, AccountId, NewTransaction, Transaction};

use super::{Committed, LedgerStore, StatementSnapshot, StoreError};

/// Append-only, per-account ordered record of posted transactions.
#[derive(Debug, Default, Clone)]
pub struct LedgerLog {
    entries: Vec<Transaction>,
}

impl LedgerLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only called from inside a commit, with the account cell locked.
    fn append(&mut self, transaction: Transaction) {
        self.entries.push(transaction);
    }

    /// Up to `n` newest entries, newest first.
    ///
    /// The iterator is lazy and `Clone`, so it can be restarted.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Transaction> + Clone + '_ {
        self.entries.iter().rev().take(n)
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Balance and log of one account, guarded together.
#[derive(Debug)]
struct AccountCell {
    account: Account,
    log: LedgerLog,
}

/// In-memory ledger store.
///
/// The account map is fixed at construction; only cells are locked, so
/// postings against different accounts never contend.
#[derive(Debug)]
pub struct InMemoryStore {
    cells: HashMap<AccountId, Mutex<AccountCell>>,
}

impl InMemoryStore {
    /// Provision accounts, all with a zero balance.
    pub fn new(accounts: impl IntoIterator<Item = (AccountId, i64)>) -> Self {
        let cells = accounts
            .into_iter()
            .map(|(id, limit)| {
                let cell = AccountCell {
                    account: Account::new(id, limit, 0),
                    log: LedgerLog::new(),
                };
                (id, Mutex::new(cell))
            })
            .collect();

        Self { cells }
    }

    /// Provision the standard five clients
    pub fn with_default_accounts() -> Self {
        Self::new(super::DEFAULT_ACCOUNTS)
    }

    fn cell(&self, id: AccountId) -> Result<&Mutex<AccountCell>, StoreError> {
        self.cells.get(&id).ok_or(StoreError::AccountNotFound(id))
    }

    /// Number of committed log entries for an account
    pub async fn log_len(&self, id: AccountId) -> Result<usize, StoreError> {
        Ok(self.cell(id)?.lock().await.log.len())
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        match self.cells.get(&id) {
            Some(cell) => Ok(Some(cell.lock().await.account)),
            None => Ok(None),
        }
    }

    async fn commit(&self, id: AccountId, tx: &NewTransaction) -> Result<Committed, StoreError> {
        let mut cell = self.cell(id)?.lock().await;

        // No await points past this line: the guard is held until both
        // mutations are done, so cancellation cannot split them.
        let new_balance = cell.account.apply(tx.delta())?;
        let occurred_at = next_occurred_at(Utc::now(), cell.log.last().map(|t| t.occurred_at));
        let transaction = tx.clone().into_transaction(occurred_at);

        cell.log.append(transaction.clone());
        cell.account.balance = new_balance;

        Ok(Committed {
            account: cell.account,
            transaction,
        })
    }

    async fn statement(
        &self,
        id: AccountId,
        recent: usize,
    ) -> Result<Option<StatementSnapshot>, StoreError> {
        let Some(cell) = self.cells.get(&id) else {
            return Ok(None);
        };
        let cell = cell.lock().await;

        Ok(Some(StatementSnapshot {
            account: cell.account,
            recent: cell.log.recent(recent).cloned().collect(),
        }))
    }
}
