#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use proxy_kernel_contracts::primitives::{Address, CartridgeId, Namespace, TapeId};
use proxy_kernel_contracts::schema::tables::{
    CARTRIDGE_ASSET_ADDRESS, CARTRIDGE_OWNER, INPUT_BOX_ADDRESS, TAPE_ASSET_ADDRESS, TAPE_CREATOR,
};
use proxy_kernel_contracts::schema::{FieldType, TableSpec, WorldSchema};
use proxy_kernel_contracts::Validate;

use crate::bijective::{BijectiveIndex, BindOutcome};
use crate::diagnostics::{DiagnosticEntry, DiagnosticLog};
use crate::models::{ModelConfigRecord, ModelRegistry};
use crate::ownership::OwnershipRegistry;
use crate::table::SingletonSlot;
use crate::StorageError;

/// The materialized world: every table of the bound schema, owned by one value.
///
/// All mutators either apply fully or return an error with the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldStore {
    schema: WorldSchema,
    fingerprint: String,
    input_box_address: SingletonSlot<Address>,
    cartridge_asset_address: SingletonSlot<Address>,
    tape_asset_address: SingletonSlot<Address>,
    namespace_index: BijectiveIndex,
    cartridge_owners: OwnershipRegistry<CartridgeId>,
    tape_creators: OwnershipRegistry<TapeId>,
    models: ModelRegistry,
    diagnostics: DiagnosticLog,
}

impl WorldStore {
    pub fn new_in_memory() -> Self {
        Self::materialize(WorldSchema::core_v1())
    }

    /// Binds a store to `schema`. The schema must declare exactly the tables this store
    /// materializes, with matching keys and field types; its namespace is free.
    pub fn new(schema: WorldSchema) -> Result<Self, StorageError> {
        schema.validate()?;
        check_schema_layout(&schema)?;
        Ok(Self::materialize(schema))
    }

    fn materialize(schema: WorldSchema) -> Self {
        let fingerprint = schema.fingerprint();
        Self {
            schema,
            fingerprint,
            input_box_address: SingletonSlot::new(INPUT_BOX_ADDRESS),
            cartridge_asset_address: SingletonSlot::new(CARTRIDGE_ASSET_ADDRESS),
            tape_asset_address: SingletonSlot::new(TAPE_ASSET_ADDRESS),
            namespace_index: BijectiveIndex::new(),
            cartridge_owners: OwnershipRegistry::new(CARTRIDGE_OWNER),
            tape_creators: OwnershipRegistry::new(TAPE_CREATOR),
            models: ModelRegistry::new(),
            diagnostics: DiagnosticLog::new(),
        }
    }

    pub fn schema(&self) -> &WorldSchema {
        &self.schema
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn namespace(&self) -> &str {
        &self.schema.namespace
    }

    // Registry singletons.

    pub fn input_box_address(&self) -> Option<Address> {
        self.input_box_address.get().copied()
    }

    pub fn set_input_box_address(&mut self, address: Address) -> Result<(), StorageError> {
        address.validate_nonzero("input_box_address.value")?;
        self.input_box_address.set(address)?;
        Ok(())
    }

    pub fn cartridge_asset_address(&self) -> Option<Address> {
        self.cartridge_asset_address.get().copied()
    }

    pub fn set_cartridge_asset_address(&mut self, address: Address) -> Result<(), StorageError> {
        address.validate_nonzero("cartridge_asset_address.value")?;
        self.cartridge_asset_address.set(address)?;
        Ok(())
    }

    pub fn tape_asset_address(&self) -> Option<Address> {
        self.tape_asset_address.get().copied()
    }

    pub fn set_tape_asset_address(&mut self, address: Address) -> Result<(), StorageError> {
        address.validate_nonzero("tape_asset_address.value")?;
        self.tape_asset_address.set(address)?;
        Ok(())
    }

    // Namespace index.

    pub fn bind_namespace(
        &mut self,
        dapp_address: Address,
        namespace: Namespace,
    ) -> Result<BindOutcome, StorageError> {
        dapp_address.validate_nonzero("dapp_address_namespace.dapp_address")?;
        namespace.validate()?;
        self.namespace_index.bind(dapp_address, namespace)
    }

    pub fn unbind_namespace(&mut self, dapp_address: Address) -> Result<Namespace, StorageError> {
        self.namespace_index.unbind(dapp_address)
    }

    pub fn namespace_of(&self, dapp_address: &Address) -> Option<Namespace> {
        self.namespace_index.lookup_by_address(dapp_address)
    }

    pub fn dapp_address_of(&self, namespace: &Namespace) -> Option<Address> {
        self.namespace_index.lookup_by_namespace(namespace)
    }

    pub fn namespace_index(&self) -> &BijectiveIndex {
        &self.namespace_index
    }

    // Asset ownership.

    pub fn register_cartridge(
        &mut self,
        cartridge_id: CartridgeId,
        owner: Address,
    ) -> Result<(), StorageError> {
        cartridge_id.validate()?;
        self.cartridge_owners.register(cartridge_id, owner)
    }

    pub fn cartridge_owner(&self, cartridge_id: &CartridgeId) -> Option<Address> {
        self.cartridge_owners.owner_of(cartridge_id)
    }

    pub fn register_tape(&mut self, tape_id: TapeId, creator: Address) -> Result<(), StorageError> {
        tape_id.validate()?;
        self.tape_creators.register(tape_id, creator)
    }

    pub fn tape_creator(&self, tape_id: &TapeId) -> Option<Address> {
        self.tape_creators.owner_of(tape_id)
    }

    pub fn cartridge_owners(&self) -> &OwnershipRegistry<CartridgeId> {
        &self.cartridge_owners
    }

    pub fn tape_creators(&self) -> &OwnershipRegistry<TapeId> {
        &self.tape_creators
    }

    // Models.

    pub fn set_model_active(
        &mut self,
        model_address: Address,
        active: bool,
    ) -> Result<(), StorageError> {
        self.models.set_active(model_address, active)
    }

    pub fn is_model_active(&self, model_address: &Address) -> bool {
        self.models.is_active(model_address)
    }

    pub fn set_insertion_model(
        &mut self,
        model_address: Address,
        config: Vec<u8>,
    ) -> Result<(), StorageError> {
        let record = ModelConfigRecord::v1(model_address, config)?;
        self.models.set_insertion_model(record)
    }

    pub fn insertion_model(&self) -> Option<&ModelConfigRecord> {
        self.models.insertion_model()
    }

    pub fn set_submission_model(
        &mut self,
        cartridge_id: CartridgeId,
        model_address: Address,
        config: Vec<u8>,
    ) -> Result<(), StorageError> {
        let record = ModelConfigRecord::v1(model_address, config)?;
        self.models.set_submission_model(cartridge_id, record)
    }

    pub fn submission_model(&self, cartridge_id: &CartridgeId) -> Option<&ModelConfigRecord> {
        self.models.submission_model(cartridge_id)
    }

    pub fn remove_submission_model(
        &mut self,
        cartridge_id: &CartridgeId,
    ) -> Result<ModelConfigRecord, StorageError> {
        self.models.remove_submission_model(cartridge_id)
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    // Diagnostic log.

    pub fn check_diagnostic_append(&self, message: &str, data: &[u8]) -> Result<u32, StorageError> {
        self.diagnostics.check_append(message, data)
    }

    pub fn append_diagnostic(
        &mut self,
        message: String,
        data: Vec<u8>,
    ) -> Result<u32, StorageError> {
        self.diagnostics.append(message, data)
    }

    pub fn diagnostic_entry(&self, index: u32) -> Option<&DiagnosticEntry> {
        self.diagnostics.entry(index)
    }

    pub fn debug_counter(&self) -> u32 {
        self.diagnostics.counter()
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Counter fixture for exhaustion tests in dependent crates.
    #[doc(hidden)]
    pub fn set_debug_counter_for_tests(&mut self, value: u32) {
        self.diagnostics.set_counter_unchecked(value);
    }
}

impl Default for WorldStore {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

fn field_layout(spec: &TableSpec) -> BTreeMap<&str, FieldType> {
    spec.fields.iter().map(|f| (f.name.as_str(), f.ty)).collect()
}

fn check_schema_layout(schema: &WorldSchema) -> Result<(), StorageError> {
    let expected = WorldSchema::core_v1();
    for want in &expected.tables {
        let Some(got) = schema.table(&want.name) else {
            return Err(StorageError::SchemaMismatch {
                table: want.name.clone(),
                reason: "table missing",
            });
        };
        if got.key != want.key {
            return Err(StorageError::SchemaMismatch {
                table: want.name.clone(),
                reason: "key fields differ",
            });
        }
        if field_layout(got) != field_layout(want) {
            return Err(StorageError::SchemaMismatch {
                table: want.name.clone(),
                reason: "field layout differs",
            });
        }
    }
    if let Some(extra) = schema
        .tables
        .iter()
        .find(|t| expected.table(&t.name).is_none())
    {
        return Err(StorageError::SchemaMismatch {
            table: extra.name.clone(),
            reason: "table not materialized by this store",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxy_kernel_contracts::schema::tables;

    #[test]
    fn at_world_store_01_core_schema_binds() {
        let store = WorldStore::new(WorldSchema::core_v1()).unwrap();
        assert_eq!(store.namespace(), "core");
        assert_eq!(store.fingerprint(), WorldSchema::core_v1().fingerprint());
        assert_eq!(store, WorldStore::new_in_memory());
    }

    #[test]
    fn at_world_store_02_extra_table_is_rejected() {
        let mut schema = WorldSchema::core_v1();
        schema.tables.push(TableSpec::new(
            "NamespaceSubscriptions",
            &["namespace"],
            &[("namespace", FieldType::Bytes32), ("subscribers", FieldType::Bytes)],
        ));
        assert_eq!(
            WorldStore::new(schema),
            Err(StorageError::SchemaMismatch {
                table: "NamespaceSubscriptions".to_string(),
                reason: "table not materialized by this store",
            })
        );
    }

    #[test]
    fn at_world_store_03_field_type_mismatch_is_rejected() {
        let mut schema = WorldSchema::core_v1();
        for t in &mut schema.tables {
            if t.name == tables::DEBUG_COUNTER {
                t.fields[0].ty = FieldType::Bytes32;
            }
        }
        assert!(matches!(
            WorldStore::new(schema),
            Err(StorageError::SchemaMismatch { table, .. }) if table == tables::DEBUG_COUNTER
        ));
    }

    #[test]
    fn at_world_store_04_failed_mutations_leave_store_unchanged() {
        let mut store = WorldStore::new_in_memory();
        let before = store.clone();
        assert!(store.set_input_box_address(Address::ZERO).is_err());
        assert!(store.unbind_namespace(Address::from_low_u64_be(1)).is_err());
        assert!(store
            .set_insertion_model(Address::from_low_u64_be(0xCC), vec![])
            .is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn at_world_store_05_debug_counter_tracks_appends() {
        let mut store = WorldStore::new_in_memory();
        store.append_diagnostic("hello".into(), vec![1]).unwrap();
        assert_eq!(store.debug_counter(), 1);
        store.set_debug_counter_for_tests(u32::MAX);
        assert!(matches!(
            store.check_diagnostic_append("x", &[]),
            Err(StorageError::LogExhausted { .. })
        ));
    }
}
