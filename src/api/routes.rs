//! API Routes
//!
//! HTTP endpoint definitions.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, OperationContext, Transaction};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    PostTransactionCommand, PostingResult, StatementBuilder, StatementResult, TransactionPoster,
};
use crate::store::LedgerStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub poster: TransactionPoster,
    pub statements: StatementBuilder,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>, request_timeout: Duration) -> Self {
        Self {
            poster: TransactionPoster::new(store.clone(), request_timeout),
            statements: StatementBuilder::new(store, request_timeout),
        }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub valor: i64,
    pub tipo: String,
    #[serde(default)]
    pub descricao: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub limite: i64,
    pub saldo: i64,
}

impl From<PostingResult> for TransactionResponse {
    fn from(result: PostingResult) -> Self {
        Self {
            limite: result.limit,
            saldo: result.balance,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total: i64,
    pub data_extrato: DateTime<Utc>,
    pub limite: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatementEntry {
    pub valor: i64,
    pub tipo: String,
    pub descricao: String,
    pub realizada_em: DateTime<Utc>,
}

impl From<Transaction> for StatementEntry {
    fn from(tx: Transaction) -> Self {
        Self {
            valor: tx.amount.value(),
            tipo: tx.kind.as_str().to_string(),
            descricao: tx.description.into(),
            realizada_em: tx.occurred_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatementResponse {
    pub saldo: BalanceSummary,
    pub ultimas_transacoes: Vec<StatementEntry>,
}

impl From<StatementResult> for StatementResponse {
    fn from(result: StatementResult) -> Self {
        Self {
            saldo: BalanceSummary {
                total: result.balance,
                data_extrato: result.as_of,
                limite: result.limit,
            },
            ultimas_transacoes: result
                .recent_transactions
                .into_iter()
                .map(StatementEntry::from)
                .collect(),
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/clientes/:id/transacoes", post(post_transaction))
        .route("/clientes/:id/extrato", get(get_statement))
}

fn account_id(path: Result<Path<AccountId>, PathRejection>) -> AppResult<AccountId> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid client id: {}", e.body_text())))
}

// =========================================================================
// POST /clientes/:id/transacoes
// =========================================================================

/// Post a credit or debit
async fn post_transaction(
    State(state): State<AppState>,
    context: Option<Extension<OperationContext>>,
    path: Result<Path<AccountId>, PathRejection>,
    body: Result<Json<TransactionRequest>, JsonRejection>,
) -> AppResult<Json<TransactionResponse>> {
    let account_id = account_id(path)?;
    let Json(request) =
        body.map_err(|e| AppError::InvalidRequest(format!("Invalid body: {}", e.body_text())))?;
    let context = context.map(|Extension(ctx)| ctx).unwrap_or_default();

    let command = PostTransactionCommand::new(
        account_id,
        request.valor,
        request.tipo,
        request.descricao.unwrap_or_default(),
    );

    let result = state.poster.execute(command, &context).await?;

    Ok(Json(result.into()))
}

// =========================================================================
// GET /clientes/:id/extrato
// =========================================================================

/// Get the account statement
async fn get_statement(
    State(state): State<AppState>,
    path: Result<Path<AccountId>, PathRejection>,
) -> AppResult<Json<StatementResponse>> {
    let account_id = account_id(path)?;

    let result = state.statements.execute(account_id).await?;

    Ok(Json(result.into()))
}
