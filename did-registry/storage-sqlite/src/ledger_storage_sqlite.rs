use sqlx::SqlitePool;
use storage_traits::{error_backend, LedgerContext, LedgerTransaction, Result};

#[derive(Clone)]
pub struct LedgerStorageSQLite {
    sqlite_pool: SqlitePool,
}

impl LedgerStorageSQLite {
    pub async fn open_and_run_migrations(sqlite_pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!().run(&sqlite_pool).await.map_err(|err| {
            error_backend(format!(
                "Failed to run SQLite database migrations; error was: {}",
                err
            ))
        })?;
        Ok(Self { sqlite_pool })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl storage_traits::LedgerStorage for LedgerStorageSQLite {
    async fn begin_transaction(&self) -> Result<Box<dyn LedgerTransaction>> {
        let transaction = self.sqlite_pool.begin().await?;
        Ok(Box::new(LedgerTransactionSQLite {
            transaction_o: Some(transaction),
        }))
    }
}

/// Wraps a sqlx transaction, which rolls itself back if dropped before commit.
pub struct LedgerTransactionSQLite {
    /// Only None after commit or rollback has taken it.
    transaction_o: Option<sqlx::Transaction<'static, sqlx::Sqlite>>,
}

impl LedgerTransactionSQLite {
    fn transaction_mut(&mut self) -> Result<&mut sqlx::Transaction<'static, sqlx::Sqlite>> {
        self.transaction_o
            .as_mut()
            .ok_or_else(|| error_backend("transaction already finished"))
    }
    fn take_transaction(&mut self) -> Result<sqlx::Transaction<'static, sqlx::Sqlite>> {
        self.transaction_o
            .take()
            .ok_or_else(|| error_backend("transaction already finished"))
    }
}

impl std::ops::Drop for LedgerTransactionSQLite {
    fn drop(&mut self) {
        if self.transaction_o.is_some() {
            tracing::trace!("LedgerTransactionSQLite dropped without commit; rolling back");
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl LedgerContext for LedgerTransactionSQLite {
    async fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let transaction = self.transaction_mut()?;
        let value_o =
            sqlx::query_scalar::<_, Vec<u8>>("select value from ledger_state where key = $1")
                .bind(key)
                .fetch_optional(transaction.as_mut())
                .await?;
        Ok(value_o)
    }
    async fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let transaction = self.transaction_mut()?;
        sqlx::query(
            r#"
                insert into ledger_state(key, value)
                values ($1, $2)
                on conflict(key) do update set value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(transaction.as_mut())
        .await?;
        Ok(())
    }
    async fn del_state(&mut self, key: &str) -> Result<()> {
        let transaction = self.transaction_mut()?;
        sqlx::query("delete from ledger_state where key = $1")
            .bind(key)
            .execute(transaction.as_mut())
            .await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl LedgerTransaction for LedgerTransactionSQLite {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        Ok(self.take_transaction()?.commit().await?)
    }
    async fn rollback(mut self: Box<Self>) -> Result<()> {
        Ok(self.take_transaction()?.rollback().await?)
    }
}
