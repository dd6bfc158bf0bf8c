//! Transaction Poster
//!
//! Validates a posting and hands it to the store's atomic commit.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{NewTransaction, OperationContext};
use crate::error::{AppError, AppResult};
use crate::store::LedgerStore;

use super::{PostTransactionCommand, PostingResult};

/// Handler for credit/debit postings
#[derive(Clone)]
pub struct TransactionPoster {
    store: Arc<dyn LedgerStore>,
    timeout: Duration,
}

impl TransactionPoster {
    pub fn new(store: Arc<dyn LedgerStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Execute the posting command within the configured deadline.
    ///
    /// On deadline expiry the in-flight commit is dropped, which either
    /// never happened or completed in full.
    pub async fn execute(
        &self,
        command: PostTransactionCommand,
        context: &OperationContext,
    ) -> AppResult<PostingResult> {
        let account_id = command.account_id;

        match tokio::time::timeout(self.timeout, self.post(command, context)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    account_id,
                    correlation_id = ?context.correlation_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Posting timed out"
                );
                Err(AppError::Timeout)
            }
        }
    }

    async fn post(
        &self,
        command: PostTransactionCommand,
        context: &OperationContext,
    ) -> AppResult<PostingResult> {
        let account_id = command.account_id;

        // 1. Resolve the account
        self.store
            .account(account_id)
            .await?
            .ok_or(AppError::AccountNotFound(account_id))?;

        // 2. Validate fields before touching stored state
        let new_tx =
            NewTransaction::validate(&command.kind, command.amount, &command.description)?;

        // 3-4. Delta, limit check, balance update and log append in one unit
        let committed = self.store.commit(account_id, &new_tx).await.map_err(|e| {
            if e.is_terminal() {
                tracing::debug!(account_id, error = %e, "Posting rejected");
            } else {
                tracing::error!(
                    account_id,
                    correlation_id = ?context.correlation_id,
                    error = %e,
                    "Posting commit failed"
                );
            }
            AppError::from(e)
        })?;

        tracing::debug!(
            account_id,
            kind = %new_tx.kind,
            amount = new_tx.amount.value(),
            balance = committed.account.balance,
            correlation_id = ?context.correlation_id,
            "Posting committed"
        );

        // 5. Post-commit balance and limit
        Ok(PostingResult {
            balance: committed.account.balance,
            limit: committed.account.limit,
        })
    }
}
