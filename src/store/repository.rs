//! PostgreSQL Ledger Store
//!
//! Postings take a row lock on the client (`SELECT ... FOR UPDATE`), so the
//! read-check-write sequence is serialized per client while other clients
//! proceed in parallel. Balance update and log insert share one database
//! transaction; dropping it before `COMMIT` rolls both back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction as DbTransaction};
use std::future::Future;
use std::time::Duration;

use crate::domain::{
    next_occurred_at, Account, AccountId, Amount, Description, NewTransaction, Transaction,
    TransactionKind,
};

use super::{Committed, LedgerStore, StatementSnapshot, StoreError};

/// Row of `transacoes` as selected for statements
type TransactionRow = (i64, String, String, DateTime<Utc>);

/// Ledger store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    /// Create a new PgLedgerStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    // try_commit (single attempt)
    // =========================================================================

    async fn try_commit(
        &self,
        id: AccountId,
        new_tx: &NewTransaction,
    ) -> Result<Committed, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (limit, balance, last_posted_at) = self
            .lock_account(&mut tx, id)
            .await?
            .ok_or(StoreError::AccountNotFound(id))?;

        // An early return drops `tx`, which rolls back and releases the lock
        let account = Account::new(id, limit, balance);
        let new_balance = account.apply(new_tx.delta())?;
        let occurred_at = next_occurred_at(Utc::now(), last_posted_at);

        sqlx::query(
            r#"
            UPDATE clientes
            SET saldo = $2, ultima_transacao_em = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(new_balance)
        .bind(occurred_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO transacoes (cliente_id, valor, tipo, descricao, realizada_em)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(new_tx.amount.value())
        .bind(new_tx.kind.as_str())
        .bind(new_tx.description.as_str())
        .bind(occurred_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Committed {
            account: Account::new(id, limit, new_balance),
            transaction: new_tx.clone().into_transaction(occurred_at),
        })
    }

    /// Lock the client row for the rest of the transaction
    async fn lock_account(
        &self,
        tx: &mut DbTransaction<'_, Postgres>,
        id: AccountId,
    ) -> Result<Option<(i64, i64, Option<DateTime<Utc>>)>, StoreError> {
        let row = sqlx::query_as(
            r#"
            SELECT limite, saldo, ultima_transacao_em
            FROM clientes
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row)
    }

    fn decode_transaction(row: TransactionRow) -> Result<Transaction, StoreError> {
        let (valor, tipo, descricao, realizada_em) = row;

        let kind: TransactionKind = tipo
            .parse()
            .map_err(|e| StoreError::InvalidRow(format!("tipo: {}", e)))?;
        let amount =
            Amount::new(valor).map_err(|e| StoreError::InvalidRow(format!("valor: {}", e)))?;
        let description = Description::new(descricao)
            .map_err(|e| StoreError::InvalidRow(format!("descricao: {}", e)))?;

        Ok(Transaction {
            kind,
            amount,
            description,
            occurred_at: realizada_em,
        })
    }
}

/// Maximum commit attempts before giving up with `MaxRetriesExceeded`
const MAX_RETRIES: u32 = 3;

/// Run `attempt` until it succeeds, fails terminally, or runs out of retries.
///
/// Backs off linearly (50ms, 100ms) between attempts.
async fn with_retries<T, F, Fut>(id: AccountId, mut attempt: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    for n in 0..MAX_RETRIES {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && n < MAX_RETRIES - 1 => {
                let delay = Duration::from_millis(50 * (n as u64 + 1));
                tracing::warn!(
                    account_id = id,
                    error = %e,
                    "Commit failed, retrying (attempt {}/{})",
                    n + 1,
                    MAX_RETRIES
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) if e.is_retryable() => break,
            Err(e) => return Err(e),
        }
    }

    Err(StoreError::MaxRetriesExceeded)
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT limite, saldo FROM clientes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(limit, balance)| Account::new(id, limit, balance)))
    }

    /// Commit with retry on serialization failures, deadlocks and pool timeouts
    async fn commit(&self, id: AccountId, tx: &NewTransaction) -> Result<Committed, StoreError> {
        with_retries(id, || self.try_commit(id, tx)).await
    }

    async fn statement(
        &self,
        id: AccountId,
        recent: usize,
    ) -> Result<Option<StatementSnapshot>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // One snapshot for the balance and the list
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT limite, saldo FROM clientes WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((limit, balance)) = row else {
            return Ok(None);
        };

        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT valor, tipo, descricao, realizada_em
            FROM transacoes
            WHERE cliente_id = $1
            ORDER BY realizada_em DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(id)
        .bind(i64::try_from(recent).unwrap_or(i64::MAX))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let recent = rows
            .into_iter()
            .map(Self::decode_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(StatementSnapshot {
            account: Account::new(id, limit, balance),
            recent,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_transaction() {
        let now = Utc::now();
        let tx = PgLedgerStore::decode_transaction((
            500,
            "d".to_string(),
            "pix".to_string(),
            now,
        ))
        .unwrap();

        assert_eq!(tx.kind, TransactionKind::Debit);
        assert_eq!(tx.delta(), -500);
        assert_eq!(tx.occurred_at, now);
    }

    #[test]
    fn test_decode_transaction_rejects_bad_rows() {
        let now = Utc::now();
        let bad_kind =
            PgLedgerStore::decode_transaction((1, "x".to_string(), "ok".to_string(), now));
        assert!(matches!(bad_kind, Err(StoreError::InvalidRow(_))));

        let bad_amount =
            PgLedgerStore::decode_transaction((0, "c".to_string(), "ok".to_string(), now));
        assert!(matches!(bad_amount, Err(StoreError::InvalidRow(_))));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let mut calls = 0;
        let result = with_retries(1, || {
            calls += 1;
            let outcome = if calls < 3 {
                Err(StoreError::Database(sqlx::Error::PoolTimedOut))
            } else {
                Ok(calls)
            };
            async move { outcome }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(1, || {
            calls += 1;
            async { Err(StoreError::Database(sqlx::Error::PoolTimedOut)) }
        })
        .await;

        assert!(matches!(result, Err(StoreError::MaxRetriesExceeded)));
        assert_eq!(calls, MAX_RETRIES);
    }

    #[tokio::test]
    async fn test_terminal_error_is_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = with_retries(1, || {
            calls += 1;
            async { Err(StoreError::AccountNotFound(1)) }
        })
        .await;

        assert!(matches!(result, Err(StoreError::AccountNotFound(1))));
        assert_eq!(calls, 1);
    }
}
