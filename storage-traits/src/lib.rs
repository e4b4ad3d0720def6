mod error;
mod ledger_context;
mod ledger_storage;
mod ledger_transaction;

pub use crate::{
    error::{error_backend, error_conflict, Error},
    ledger_context::LedgerContext,
    ledger_storage::LedgerStorage,
    ledger_transaction::LedgerTransaction,
};
pub type Result<T> = std::result::Result<T, Error>;
