use crate::{LedgerTransaction, Result};

/// Object-safe ledger storage, able to begin a transaction of the appropriate type.  Storage
/// impls can be plugged into a host without changing a generic.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait LedgerStorage: Send + Sync {
    async fn begin_transaction(&self) -> Result<Box<dyn LedgerTransaction>>;
}
