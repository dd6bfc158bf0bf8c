//! Statement Builder
//!
//! Reads an account's balance, limit and newest transactions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::AccountId;
use crate::error::{AppError, AppResult};
use crate::store::LedgerStore;

use super::StatementResult;

/// Number of transactions included in a statement
pub const RECENT_TRANSACTIONS: usize = 10;

/// Handler for account statements
#[derive(Clone)]
pub struct StatementBuilder {
    store: Arc<dyn LedgerStore>,
    timeout: Duration,
}

impl StatementBuilder {
    pub fn new(store: Arc<dyn LedgerStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Build the statement within the configured deadline
    pub async fn execute(&self, account_id: AccountId) -> AppResult<StatementResult> {
        let read = self.store.statement(account_id, RECENT_TRANSACTIONS);

        let snapshot = tokio::time::timeout(self.timeout, read)
            .await
            .map_err(|_| {
                tracing::warn!(account_id, "Statement timed out");
                AppError::Timeout
            })??
            .ok_or(AppError::AccountNotFound(account_id))?;

        Ok(StatementResult {
            balance: snapshot.account.balance,
            limit: snapshot.account.limit,
            as_of: Utc::now(),
            recent_transactions: snapshot.recent,
        })
    }
}
