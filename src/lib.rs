//! clientes-ledger Library
//!
//! Re-exports modules for the server binary, integration tests and tools.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod store;

mod error;

pub use config::{Config, LogFormat, StoreBackend};
pub use domain::{Account, AccountId, Amount, Description, DomainError, OperationContext};
pub use domain::{NewTransaction, Transaction, TransactionKind};
pub use error::{AppError, AppResult, ErrorKind};
pub use store::{InMemoryStore, LedgerStore, PgLedgerStore, StoreError};
