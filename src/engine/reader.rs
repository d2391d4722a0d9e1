use crate::error::StorageFetchError;
use crate::tezos::AccountId;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A contract's storage value and the Micheline type it is declared with.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractStorage {
    pub storage: Value,
    pub storage_type: Value,
}

/// Source of on-chain contract storage.
#[async_trait]
pub trait ContractStorageReader: Send + Sync {
    async fn fetch(&self, contract: &AccountId) -> Result<ContractStorage, StorageFetchError>;
}

/// Serves storage from a fixed snapshot, counting every fetch.
#[derive(Debug, Default)]
pub struct SnapshotReader {
    scripts: HashMap<AccountId, ContractStorage>,
    fetches: AtomicUsize,
}

impl SnapshotReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(mut self, contract: AccountId, storage: ContractStorage) -> Self {
        self.scripts.insert(contract, storage);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContractStorageReader for SnapshotReader {
    async fn fetch(&self, contract: &AccountId) -> Result<ContractStorage, StorageFetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.scripts
            .get(contract)
            .cloned()
            .ok_or_else(|| StorageFetchError::Status {
                contract: contract.to_string(),
                status: 404,
                body: "contract not in snapshot".to_string(),
            })
    }
}
