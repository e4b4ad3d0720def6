mod ledger_storage_sqlite;

pub use crate::ledger_storage_sqlite::{LedgerStorageSQLite, LedgerTransactionSQLite};
