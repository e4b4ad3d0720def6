use crate::HostConfig;
use did_registry::{DIDRecord, DIDRegistry, Error, Invocation, Result};
use std::sync::Arc;
use storage_traits::{LedgerStorage, LedgerTransaction};

#[derive(Clone)]
pub struct HostAppState {
    pub ledger_storage_a: Arc<dyn LedgerStorage>,
    pub did_registry: DIDRegistry,
    pub host_config: HostConfig,
}

impl HostAppState {
    /// Run the invocation inside its own ledger transaction, committing on success and rolling back
    /// on failure.  A read-only invocation (GetDID) is always rolled back.  Store errors (including a commit conflict) are retried as whole transactions, up to
    /// the configured number of attempts.
    pub async fn invoke(&self, invocation: &Invocation) -> Result<Option<DIDRecord>> {
        let max_transaction_attempts = self.host_config.max_transaction_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.invoke_in_transaction(invocation).await {
                Err(err) if err.kind().is_retryable() && attempt < max_transaction_attempts => {
                    tracing::warn!(
                        "{} on DID {:?} failed on attempt {} of {}; retrying: {}",
                        invocation.function_name(),
                        invocation.did(),
                        attempt,
                        max_transaction_attempts,
                        err
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
    async fn invoke_in_transaction(&self, invocation: &Invocation) -> Result<Option<DIDRecord>> {
        let mut transaction_b = self
            .ledger_storage_a
            .begin_transaction()
            .await
            .map_err(|err| Error::storage_error("failed to begin transaction", err))?;
        match self
            .did_registry
            .invoke(&mut *transaction_b, invocation)
            .await
        {
            Ok(did_record_o) if invocation.is_read_only() => {
                // Nothing was written, so there is nothing to commit.
                transaction_b.rollback().await.map_err(|err| {
                    Error::storage_error(
                        format!("failed to end read transaction for DID {}", invocation.did()),
                        err,
                    )
                })?;
                Ok(did_record_o)
            }
            Ok(did_record_o) => {
                transaction_b.commit().await.map_err(|err| {
                    Error::storage_error(
                        format!("failed to commit transaction for DID {}", invocation.did()),
                        err,
                    )
                })?;
                Ok(did_record_o)
            }
            Err(err) => {
                if let Err(rollback_err) = transaction_b.rollback().await {
                    tracing::error!(
                        "failed to roll back transaction for DID {:?}: {}",
                        invocation.did(),
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}
