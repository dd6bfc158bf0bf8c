//! Domain module
//!
//! Core domain types and business rules.

pub mod account;
pub mod amount;
pub mod context;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountId};
pub use amount::{Amount, AmountError, Description, DescriptionError, MAX_DESCRIPTION_CHARS};
pub use context::OperationContext;
pub use error::DomainError;
pub use transaction::{next_occurred_at, NewTransaction, Transaction, TransactionKind};
