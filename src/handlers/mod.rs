//! Command Handlers module
//!
//! Handlers that orchestrate the write path (postings) and the read path
//! (statements) on top of a ledger store.

mod commands;
mod post_handler;
mod statement_handler;


pub use commands::*;
pub use post_handler::TransactionPoster;
pub use statement_handler::{StatementBuilder, RECENT_TRANSACTIONS};
