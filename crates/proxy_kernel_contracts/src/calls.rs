#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::access::OperationId;
use crate::common::{validate_len, validate_text};
use crate::primitives::{hex_bytes, Address, CartridgeId, Namespace, TapeId};
use crate::{ContractViolation, Validate};

pub const MAX_DEBUG_MESSAGE_LEN: usize = 256;
pub const MAX_DEBUG_DATA_LEN: usize = 4096;
pub const MAX_MODEL_CONFIG_LEN: usize = 16 * 1024;

/// One mutating request against the world, as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WorldCall {
    SetInputBoxAddress {
        address: Address,
    },
    SetCartridgeAssetAddress {
        address: Address,
    },
    SetTapeAssetAddress {
        address: Address,
    },
    BindNamespace {
        dapp_address: Address,
        namespace: Namespace,
    },
    UnbindNamespace {
        dapp_address: Address,
    },
    SetModelActive {
        model_address: Address,
        active: bool,
    },
    SetInsertionModel {
        model_address: Address,
        #[serde(with = "hex_bytes")]
        config: Vec<u8>,
    },
    SetSubmissionModel {
        cartridge_id: CartridgeId,
        model_address: Address,
        #[serde(with = "hex_bytes")]
        config: Vec<u8>,
    },
    RemoveSubmissionModel {
        cartridge_id: CartridgeId,
    },
    RegisterCartridge {
        cartridge_id: CartridgeId,
        owner: Address,
    },
    RegisterTape {
        tape_id: TapeId,
        creator: Address,
    },
    RecordDappMessage {
        dapp_address: Address,
        message: String,
        #[serde(with = "hex_bytes")]
        data: Vec<u8>,
    },
}

impl WorldCall {
    pub fn operation(&self) -> OperationId {
        match self {
            WorldCall::SetInputBoxAddress { .. } => OperationId::SetInputBoxAddress,
            WorldCall::SetCartridgeAssetAddress { .. } => OperationId::SetCartridgeAssetAddress,
            WorldCall::SetTapeAssetAddress { .. } => OperationId::SetTapeAssetAddress,
            WorldCall::BindNamespace { .. } => OperationId::BindNamespace,
            WorldCall::UnbindNamespace { .. } => OperationId::UnbindNamespace,
            WorldCall::SetModelActive { .. } => OperationId::SetModelActive,
            WorldCall::SetInsertionModel { .. } => OperationId::SetInsertionModel,
            WorldCall::SetSubmissionModel { .. } => OperationId::SetSubmissionModel,
            WorldCall::RemoveSubmissionModel { .. } => OperationId::RemoveSubmissionModel,
            WorldCall::RegisterCartridge { .. } => OperationId::RegisterCartridge,
            WorldCall::RegisterTape { .. } => OperationId::RegisterTape,
            WorldCall::RecordDappMessage { .. } => OperationId::RecordDappMessage,
        }
    }
}

impl Validate for WorldCall {
    fn validate(&self) -> Result<(), ContractViolation> {
        match self {
            WorldCall::SetInputBoxAddress { address } => {
                address.validate_nonzero("set_input_box_address.address")
            }
            WorldCall::SetCartridgeAssetAddress { address } => {
                address.validate_nonzero("set_cartridge_asset_address.address")
            }
            WorldCall::SetTapeAssetAddress { address } => {
                address.validate_nonzero("set_tape_asset_address.address")
            }
            WorldCall::BindNamespace {
                dapp_address,
                namespace,
            } => {
                dapp_address.validate_nonzero("bind_namespace.dapp_address")?;
                namespace.validate()
            }
            WorldCall::UnbindNamespace { dapp_address } => {
                dapp_address.validate_nonzero("unbind_namespace.dapp_address")
            }
            WorldCall::SetModelActive { model_address, .. } => {
                model_address.validate_nonzero("set_model_active.model_address")
            }
            WorldCall::SetInsertionModel {
                model_address,
                config,
            } => {
                model_address.validate_nonzero("set_insertion_model.model_address")?;
                validate_len(
                    "set_insertion_model.config",
                    config.len(),
                    MAX_MODEL_CONFIG_LEN,
                )
            }
            WorldCall::SetSubmissionModel {
                cartridge_id,
                model_address,
                config,
            } => {
                cartridge_id.validate()?;
                model_address.validate_nonzero("set_submission_model.model_address")?;
                validate_len(
                    "set_submission_model.config",
                    config.len(),
                    MAX_MODEL_CONFIG_LEN,
                )
            }
            WorldCall::RemoveSubmissionModel { cartridge_id } => cartridge_id.validate(),
            WorldCall::RegisterCartridge {
                cartridge_id,
                owner,
            } => {
                cartridge_id.validate()?;
                owner.validate_nonzero("register_cartridge.owner")
            }
            WorldCall::RegisterTape { tape_id, creator } => {
                tape_id.validate()?;
                creator.validate_nonzero("register_tape.creator")
            }
            WorldCall::RecordDappMessage {
                dapp_address,
                message,
                data,
            } => {
                dapp_address.validate_nonzero("record_dapp_message.dapp_address")?;
                validate_text(
                    "record_dapp_message.message",
                    message,
                    MAX_DEBUG_MESSAGE_LEN,
                )?;
                validate_len(
                    "record_dapp_message.data",
                    data.len(),
                    MAX_DEBUG_DATA_LEN,
                )
            }
        }
    }
}

/// Proof that a call was applied. `trace_index` is the diagnostic entry written for it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt {
    pub operation: OperationId,
    pub trace_index: Option<u32>,
}
