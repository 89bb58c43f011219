#![forbid(unsafe_code)]

use proxy_kernel_contracts::primitives::{Address, CartridgeId, Namespace, TapeId};

use crate::bijective::BindOutcome;
use crate::diagnostics::DiagnosticEntry;
use crate::models::ModelConfigRecord;
use crate::world::WorldStore;
use crate::StorageError;

/// Typed repository interface for the registry singletons
/// (`InputBoxAddress`, `CartridgeAssetAddress`, `TapeAssetAddress`).
pub trait WorldConfigTablesRepo {
    fn set_input_box_address_row(&mut self, address: Address) -> Result<(), StorageError>;
    fn set_cartridge_asset_address_row(&mut self, address: Address) -> Result<(), StorageError>;
    fn set_tape_asset_address_row(&mut self, address: Address) -> Result<(), StorageError>;

    fn input_box_address_row(&self) -> Option<Address>;
    fn cartridge_asset_address_row(&self) -> Option<Address>;
    fn tape_asset_address_row(&self) -> Option<Address>;
}

/// Typed repository interface for the `DappAddressNamespace`/`NamespaceDappAddress` pair.
pub trait NamespaceIndexRepo {
    fn bind_namespace_row(
        &mut self,
        dapp_address: Address,
        namespace: Namespace,
    ) -> Result<BindOutcome, StorageError>;
    fn unbind_namespace_row(&mut self, dapp_address: Address) -> Result<Namespace, StorageError>;

    fn namespace_by_dapp_address_row(&self, dapp_address: &Address) -> Option<Namespace>;
    fn dapp_address_by_namespace_row(&self, namespace: &Namespace) -> Option<Address>;
}

/// Typed repository interface for `CartridgeOwner` and `TapeCreator`.
pub trait AssetOwnershipRepo {
    fn insert_cartridge_owner_row(
        &mut self,
        cartridge_id: CartridgeId,
        owner: Address,
    ) -> Result<(), StorageError>;
    fn insert_tape_creator_row(
        &mut self,
        tape_id: TapeId,
        creator: Address,
    ) -> Result<(), StorageError>;

    fn cartridge_owner_row(&self, cartridge_id: &CartridgeId) -> Option<Address>;
    fn tape_creator_row(&self, tape_id: &TapeId) -> Option<Address>;
}

/// Typed repository interface for `RegisteredModel`, `CartridgeInsertionModel` and
/// `TapeSubmissionModel`.
pub trait ModelRegistryRepo {
    fn set_registered_model_row(
        &mut self,
        model_address: Address,
        active: bool,
    ) -> Result<(), StorageError>;
    fn set_cartridge_insertion_model_row(
        &mut self,
        model_address: Address,
        config: Vec<u8>,
    ) -> Result<(), StorageError>;
    fn set_tape_submission_model_row(
        &mut self,
        cartridge_id: CartridgeId,
        model_address: Address,
        config: Vec<u8>,
    ) -> Result<(), StorageError>;
    fn delete_tape_submission_model_row(
        &mut self,
        cartridge_id: &CartridgeId,
    ) -> Result<ModelConfigRecord, StorageError>;

    fn registered_model_active_row(&self, model_address: &Address) -> bool;
    fn cartridge_insertion_model_row(&self) -> Option<&ModelConfigRecord>;
    fn tape_submission_model_row(&self, cartridge_id: &CartridgeId) -> Option<&ModelConfigRecord>;
}

/// Typed repository interface for the append-only `DappMessagesDebug` log and `DebugCounter`.
pub trait DiagnosticLogRepo {
    fn append_dapp_message_row(
        &mut self,
        message: String,
        data: Vec<u8>,
    ) -> Result<u32, StorageError>;

    fn dapp_message_row(&self, index: u32) -> Option<&DiagnosticEntry>;
    fn debug_counter_row(&self) -> u32;
}

impl WorldConfigTablesRepo for WorldStore {
    fn set_input_box_address_row(&mut self, address: Address) -> Result<(), StorageError> {
        self.set_input_box_address(address)
    }

    fn set_cartridge_asset_address_row(&mut self, address: Address) -> Result<(), StorageError> {
        self.set_cartridge_asset_address(address)
    }

    fn set_tape_asset_address_row(&mut self, address: Address) -> Result<(), StorageError> {
        self.set_tape_asset_address(address)
    }

    fn input_box_address_row(&self) -> Option<Address> {
        self.input_box_address()
    }

    fn cartridge_asset_address_row(&self) -> Option<Address> {
        self.cartridge_asset_address()
    }

    fn tape_asset_address_row(&self) -> Option<Address> {
        self.tape_asset_address()
    }
}

impl NamespaceIndexRepo for WorldStore {
    fn bind_namespace_row(
        &mut self,
        dapp_address: Address,
        namespace: Namespace,
    ) -> Result<BindOutcome, StorageError> {
        self.bind_namespace(dapp_address, namespace)
    }

    fn unbind_namespace_row(&mut self, dapp_address: Address) -> Result<Namespace, StorageError> {
        self.unbind_namespace(dapp_address)
    }

    fn namespace_by_dapp_address_row(&self, dapp_address: &Address) -> Option<Namespace> {
        self.namespace_of(dapp_address)
    }

    fn dapp_address_by_namespace_row(&self, namespace: &Namespace) -> Option<Address> {
        self.dapp_address_of(namespace)
    }
}

impl AssetOwnershipRepo for WorldStore {
    fn insert_cartridge_owner_row(
        &mut self,
        cartridge_id: CartridgeId,
        owner: Address,
    ) -> Result<(), StorageError> {
        self.register_cartridge(cartridge_id, owner)
    }

    fn insert_tape_creator_row(
        &mut self,
        tape_id: TapeId,
        creator: Address,
    ) -> Result<(), StorageError> {
        self.register_tape(tape_id, creator)
    }

    fn cartridge_owner_row(&self, cartridge_id: &CartridgeId) -> Option<Address> {
        self.cartridge_owner(cartridge_id)
    }

    fn tape_creator_row(&self, tape_id: &TapeId) -> Option<Address> {
        self.tape_creator(tape_id)
    }
}

impl ModelRegistryRepo for WorldStore {
    fn set_registered_model_row(
        &mut self,
        model_address: Address,
        active: bool,
    ) -> Result<(), StorageError> {
        self.set_model_active(model_address, active)
    }

    fn set_cartridge_insertion_model_row(
        &mut self,
        model_address: Address,
        config: Vec<u8>,
    ) -> Result<(), StorageError> {
        self.set_insertion_model(model_address, config)
    }

    fn set_tape_submission_model_row(
        &mut self,
        cartridge_id: CartridgeId,
        model_address: Address,
        config: Vec<u8>,
    ) -> Result<(), StorageError> {
        self.set_submission_model(cartridge_id, model_address, config)
    }

    fn delete_tape_submission_model_row(
        &mut self,
        cartridge_id: &CartridgeId,
    ) -> Result<ModelConfigRecord, StorageError> {
        self.remove_submission_model(cartridge_id)
    }

    fn registered_model_active_row(&self, model_address: &Address) -> bool {
        self.is_model_active(model_address)
    }

    fn cartridge_insertion_model_row(&self) -> Option<&ModelConfigRecord> {
        self.insertion_model()
    }

    fn tape_submission_model_row(&self, cartridge_id: &CartridgeId) -> Option<&ModelConfigRecord> {
        self.submission_model(cartridge_id)
    }
}

impl DiagnosticLogRepo for WorldStore {
    fn append_dapp_message_row(
        &mut self,
        message: String,
        data: Vec<u8>,
    ) -> Result<u32, StorageError> {
        self.append_diagnostic(message, data)
    }

    fn dapp_message_row(&self, index: u32) -> Option<&DiagnosticEntry> {
        self.diagnostic_entry(index)
    }

    fn debug_counter_row(&self) -> u32 {
        self.debug_counter()
    }
}
