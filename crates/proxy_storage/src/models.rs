#![forbid(unsafe_code)]

//! Model registration and the model configurations that reference registered models.
//!
//! `RegisteredModel.active` is the only thing deciding whether a model may be referenced.
//! Deactivating a model does not touch configurations that already reference it.

use proxy_kernel_contracts::calls::MAX_MODEL_CONFIG_LEN;
use proxy_kernel_contracts::primitives::{Address, CartridgeId};
use proxy_kernel_contracts::schema::tables::{
    CARTRIDGE_INSERTION_MODEL, REGISTERED_MODEL, TAPE_SUBMISSION_MODEL,
};
use proxy_kernel_contracts::{ContractViolation, Validate};

use crate::table::{PutMode, RecordTable, SingletonSlot};
use crate::StorageError;

/// A model reference plus its opaque configuration bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfigRecord {
    pub model_address: Address,
    pub config: Vec<u8>,
}

impl ModelConfigRecord {
    pub fn v1(model_address: Address, config: Vec<u8>) -> Result<Self, ContractViolation> {
        let r = Self {
            model_address,
            config,
        };
        r.validate()?;
        Ok(r)
    }
}

impl Validate for ModelConfigRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.model_address.validate_nonzero("model_config_record.model_address")?;
        if self.config.len() > MAX_MODEL_CONFIG_LEN {
            return Err(ContractViolation::TooLong {
                field: "model_config_record.config",
                max: MAX_MODEL_CONFIG_LEN,
                got: self.config.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    registered: RecordTable<Address, bool>,
    insertion_model: SingletonSlot<ModelConfigRecord>,
    submission_models: RecordTable<CartridgeId, ModelConfigRecord>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            registered: RecordTable::new(REGISTERED_MODEL),
            insertion_model: SingletonSlot::new(CARTRIDGE_INSERTION_MODEL),
            submission_models: RecordTable::new(TAPE_SUBMISSION_MODEL),
        }
    }

    /// Idempotent. Unknown models are registered with the given flag.
    pub fn set_active(&mut self, model_address: Address, active: bool) -> Result<(), StorageError> {
        model_address.validate_nonzero("registered_model.model_address")?;
        self.registered.put(model_address, active, PutMode::Upsert)?;
        Ok(())
    }

    pub fn is_active(&self, model_address: &Address) -> bool {
        self.registered.get(model_address).copied().unwrap_or(false)
    }

    pub fn is_registered(&self, model_address: &Address) -> bool {
        self.registered.contains(model_address)
    }

    pub fn ensure_active(&self, model_address: &Address) -> Result<(), StorageError> {
        if !self.is_active(model_address) {
            return Err(StorageError::InactiveModel {
                model_address: *model_address,
            });
        }
        Ok(())
    }

    pub fn set_insertion_model(&mut self, record: ModelConfigRecord) -> Result<(), StorageError> {
        record.validate()?;
        self.ensure_active(&record.model_address)?;
        self.insertion_model.put(record, PutMode::Upsert)?;
        Ok(())
    }

    pub fn insertion_model(&self) -> Option<&ModelConfigRecord> {
        self.insertion_model.get()
    }

    pub fn set_submission_model(
        &mut self,
        cartridge_id: CartridgeId,
        record: ModelConfigRecord,
    ) -> Result<(), StorageError> {
        cartridge_id.validate()?;
        record.validate()?;
        self.ensure_active(&record.model_address)?;
        self.submission_models.put(cartridge_id, record, PutMode::Upsert)?;
        Ok(())
    }

    pub fn submission_model(&self, cartridge_id: &CartridgeId) -> Option<&ModelConfigRecord> {
        self.submission_models.get(cartridge_id)
    }

    pub fn check_remove_submission_model(
        &self,
        cartridge_id: &CartridgeId,
    ) -> Result<(), StorageError> {
        self.submission_models.check_delete(cartridge_id)
    }

    pub fn remove_submission_model(
        &mut self,
        cartridge_id: &CartridgeId,
    ) -> Result<ModelConfigRecord, StorageError> {
        self.submission_models.delete(cartridge_id)
    }

    pub fn submission_models(&self) -> impl Iterator<Item = (&CartridgeId, &ModelConfigRecord)> {
        self.submission_models.iter()
    }
}
