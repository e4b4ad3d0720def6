use crate::Result;

/// Read/write/delete access to the ledger key-space within a single transaction.  Reads must
/// observe the writes and deletes previously issued through the same context.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait LedgerContext: Send + Sync {
    /// Returns None if the key has no value.
    async fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Sets the value of the key, replacing any existing value.
    async fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()>;
    /// Removes the key.  Deleting an absent key is not an error.
    async fn del_state(&mut self, key: &str) -> Result<()>;
}
