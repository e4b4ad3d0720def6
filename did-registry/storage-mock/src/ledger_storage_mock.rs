use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};
use storage_traits::{error_backend, error_conflict, LedgerContext, LedgerTransaction, Result};

#[derive(Clone, Debug)]
struct VersionedValue {
    value: Vec<u8>,
    /// The commit sequence number of the transaction that last wrote this value.
    version: u64,
}

#[derive(Default)]
struct LedgerStorageMockState {
    next_version: u64,
    /// This is what actually stores the committed world state.
    world_state_m: HashMap<String, VersionedValue>,
}

impl LedgerStorageMockState {
    fn version_of(&self, key: &str) -> Option<u64> {
        self.world_state_m
            .get(key)
            .map(|versioned_value| versioned_value.version)
    }
}

/// In-memory ledger with optimistic (read-set validated) transactions.  A transaction commits only
/// if nothing it read has been changed by a transaction that committed after the read.
#[derive(Clone, Default)]
pub struct LedgerStorageMock {
    state_la: Arc<RwLock<LedgerStorageMockState>>,
}

impl LedgerStorageMock {
    pub fn new() -> Self {
        Self::default()
    }
    /// Begin a transaction with its concrete type, for callers that don't need dynamic dispatch.
    pub fn begin(&self) -> LedgerTransactionMock {
        LedgerTransactionMock {
            state_la: self.state_la.clone(),
            read_version_m: HashMap::new(),
            write_m: HashMap::new(),
        }
    }
    /// A copy of the committed world state.
    pub fn snapshot(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        let state_g = self
            .state_la
            .read()
            .map_err(|_| error_backend("ledger state lock poisoned"))?;
        Ok(state_g
            .world_state_m
            .iter()
            .map(|(key, versioned_value)| (key.clone(), versioned_value.value.clone()))
            .collect())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl storage_traits::LedgerStorage for LedgerStorageMock {
    async fn begin_transaction(&self) -> Result<Box<dyn LedgerTransaction>> {
        Ok(Box::new(self.begin()))
    }
}

pub struct LedgerTransactionMock {
    state_la: Arc<RwLock<LedgerStorageMockState>>,
    /// The committed version observed by the first read of each key (None means absent).
    read_version_m: HashMap<String, Option<u64>>,
    /// Uncommitted writes; None means delete.
    write_m: HashMap<String, Option<Vec<u8>>>,
}

impl LedgerTransactionMock {
    fn commit_impl(&mut self) -> Result<()> {
        let mut state_g = self
            .state_la
            .write()
            .map_err(|_| error_backend("ledger state lock poisoned"))?;
        for (key, read_version_o) in self.read_version_m.iter() {
            if state_g.version_of(key) != *read_version_o {
                tracing::debug!("LedgerTransactionMock commit conflict on key {:?}", key);
                return Err(error_conflict(format!(
                    "key {:?} was modified by a concurrent transaction",
                    key
                )));
            }
        }
        if self.write_m.is_empty() {
            return Ok(());
        }
        let version = state_g.next_version;
        state_g.next_version += 1;
        for (key, value_o) in self.write_m.drain() {
            match value_o {
                Some(value) => {
                    state_g
                        .world_state_m
                        .insert(key, VersionedValue { value, version });
                }
                None => {
                    state_g.world_state_m.remove(&key);
                }
            }
        }
        Ok(())
    }
}

impl std::ops::Drop for LedgerTransactionMock {
    fn drop(&mut self) {
        // Nothing to do; uncommitted writes only live in write_m.
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl LedgerContext for LedgerTransactionMock {
    async fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(value_o) = self.write_m.get(key) {
            return Ok(value_o.clone());
        }
        let state_g = self
            .state_la
            .read()
            .map_err(|_| error_backend("ledger state lock poisoned"))?;
        let versioned_value_o = state_g.world_state_m.get(key);
        let read_version_o = versioned_value_o.map(|versioned_value| versioned_value.version);
        self.read_version_m
            .entry(key.to_string())
            .or_insert(read_version_o);
        Ok(versioned_value_o.map(|versioned_value| versioned_value.value.clone()))
    }
    async fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.write_m.insert(key.to_string(), Some(value.to_vec()));
        Ok(())
    }
    async fn del_state(&mut self, key: &str) -> Result<()> {
        self.write_m.insert(key.to_string(), None);
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl LedgerTransaction for LedgerTransactionMock {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.commit_impl()
    }
    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.write_m.clear();
        Ok(())
    }
}
