//! Integration tests for the PostgreSQL ledger store
//!
//! Need a database with migrations/0001_init.sql applied:
//! DATABASE_URL=... cargo test --test integration_store -- --ignored --test-threads=1

use std::sync::Arc;
use std::time::Duration;

use clientes_ledger::domain::{DomainError, NewTransaction, OperationContext};
use clientes_ledger::handlers::{PostTransactionCommand, StatementBuilder, TransactionPoster};
use clientes_ledger::store::{LedgerStore, PgLedgerStore, StoreError};
use clientes_ledger::ErrorKind;

mod common;

async fn log_len(store: &PgLedgerStore, account_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transacoes WHERE cliente_id = $1")
        .bind(account_id)
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_commit_and_statement() {
    let pool = common::setup_test_db().await;
    let store = PgLedgerStore::new(pool);

    let tx = NewTransaction::validate("c", 500, "deposito").unwrap();
    let committed = store.commit(1, &tx).await.unwrap();
    assert_eq!(committed.account.balance, 500);
    assert_eq!(committed.account.limit, 100000);

    let tx = NewTransaction::validate("d", 200, "saque").unwrap();
    store.commit(1, &tx).await.unwrap();

    let snapshot = store.statement(1, 10).await.unwrap().unwrap();
    assert_eq!(snapshot.account.balance, 300);
    assert_eq!(snapshot.recent.len(), 2);
    assert_eq!(snapshot.recent[0].description.as_str(), "saque");
    assert_eq!(snapshot.recent[1].description.as_str(), "deposito");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_limit_exceeded_rolls_back() {
    let pool = common::setup_test_db().await;
    let store = PgLedgerStore::new(pool);

    // Client 2 has a limit of 80000
    let tx = NewTransaction::validate("d", 80000, "tudo").unwrap();
    store.commit(2, &tx).await.unwrap();

    let tx = NewTransaction::validate("d", 1, "mais").unwrap();
    let err = store.commit(2, &tx).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Rejected(DomainError::LimitExceeded { .. })
    ));

    let account = store.account(2).await.unwrap().unwrap();
    assert_eq!(account.balance, -80000);
    assert_eq!(log_len(&store, 2).await, 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_unknown_account() {
    let pool = common::setup_test_db().await;
    let store = PgLedgerStore::new(pool);

    assert!(store.account(6).await.unwrap().is_none());
    assert!(store.statement(6, 10).await.unwrap().is_none());

    let tx = NewTransaction::validate("c", 1, "x").unwrap();
    assert!(matches!(
        store.commit(6, &tx).await,
        Err(StoreError::AccountNotFound(6))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_concurrent_debits_never_breach_limit() {
    let pool = common::setup_test_db().await;
    let store = Arc::new(PgLedgerStore::new(pool));
    let dyn_store: Arc<dyn LedgerStore> = store.clone();
    let poster = TransactionPoster::new(dyn_store.clone(), Duration::from_secs(10));

    // Client 2: limit 80000, 100 debits of 1000 -> exactly 80 fit
    let mut handles = Vec::new();
    for i in 0..100 {
        let poster = poster.clone();
        handles.push(tokio::spawn(async move {
            poster
                .execute(
                    PostTransactionCommand::debit(2, 1000, format!("d{i}")),
                    &OperationContext::new(),
                )
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::LimitExceeded),
        }
    }
    assert_eq!(accepted, 80);

    let statement = StatementBuilder::new(dyn_store, Duration::from_secs(5))
        .execute(2)
        .await
        .unwrap();
    assert_eq!(statement.balance, -80000);
    assert_eq!(log_len(&store, 2).await, 80);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_equal_timestamps_newest_appended_first() {
    let pool = common::setup_test_db().await;
    let store = PgLedgerStore::new(pool);

    let at = chrono::Utc::now();
    for (valor, descricao) in [(100_i64, "primeiro"), (200, "segundo")] {
        sqlx::query(
            "INSERT INTO transacoes (cliente_id, valor, tipo, descricao, realizada_em) \
             VALUES ($1, $2, 'c', $3, $4)",
        )
        .bind(3)
        .bind(valor)
        .bind(descricao)
        .bind(at)
        .execute(store.pool())
        .await
        .unwrap();
    }

    let snapshot = store.statement(3, 10).await.unwrap().unwrap();
    assert_eq!(snapshot.recent.len(), 2);
    assert_eq!(snapshot.recent[0].description.as_str(), "segundo");
    assert_eq!(snapshot.recent[1].description.as_str(), "primeiro");
    assert_eq!(snapshot.recent[0].occurred_at, snapshot.recent[1].occurred_at);
}
