use crate::{LedgerContext, Result};

/// A LedgerContext whose writes become visible to other transactions only upon commit.
/// The Drop impl must discard any uncommitted writes.
#[allow(drop_bounds)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait LedgerTransaction: LedgerContext + std::ops::Drop {
    /// Commit the transaction, consuming it in the process.  Fails with Error::Conflict if a
    /// concurrently committed transaction invalidated this one.
    async fn commit(self: Box<Self>) -> Result<()>;
    /// Rollback the transaction, consuming it in the process.
    async fn rollback(self: Box<Self>) -> Result<()>;
}
