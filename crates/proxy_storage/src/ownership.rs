#![forbid(unsafe_code)]

use proxy_kernel_contracts::primitives::Address;

use crate::table::{PutMode, RecordTable, TableKey};
use crate::StorageError;

/// Asset id -> owning address, written once per asset. There is no update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipRegistry<K> {
    owners: RecordTable<K, Address>,
}

impl<K: TableKey> OwnershipRegistry<K> {
    pub fn new(table: &'static str) -> Self {
        Self {
            owners: RecordTable::new(table),
        }
    }

    pub fn check_register(&self, asset_id: &K) -> Result<(), StorageError> {
        self.owners.check_put(asset_id, PutMode::InsertOnly)
    }

    pub fn register(&mut self, asset_id: K, owner: Address) -> Result<(), StorageError> {
        owner.validate_nonzero("ownership_registry.owner")?;
        self.owners.put(asset_id.clone(), owner, PutMode::InsertOnly)?;
        tracing::debug!(table = self.owners.name(), %asset_id, %owner, "asset registered");
        Ok(())
    }

    pub fn owner_of(&self, asset_id: &K) -> Option<Address> {
        self.owners.get(asset_id).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
