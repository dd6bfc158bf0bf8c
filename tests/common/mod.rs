//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use clientes_ledger::api::{self, AppState};
use clientes_ledger::store::{InMemoryStore, LedgerStore};

/// Router over a fresh in-memory store with the standard five clients
pub fn memory_app() -> Router {
    let store: Arc<dyn LedgerStore> = Arc::new(InMemoryStore::with_default_accounts());
    api::build_router(AppState::new(store, Duration::from_secs(5)))
}

/// Send a request and decode the JSON body (Null when the body is empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Setup test database - reset balances and clear the log
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    sqlx::query("TRUNCATE TABLE transacoes")
        .execute(&mut *tx)
        .await
        .expect("Failed to clean up DB");

    sqlx::query("UPDATE clientes SET saldo = 0, ultima_transacao_em = NULL")
        .execute(&mut *tx)
        .await
        .expect("Failed to reset balances");

    tx.commit().await.expect("Failed to commit transaction");

    pool
}
