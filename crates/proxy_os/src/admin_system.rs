#![forbid(unsafe_code)]

use proxy_kernel_contracts::access::SystemId;
use proxy_kernel_contracts::calls::WorldCall;
use proxy_kernel_contracts::ContractViolation;
use proxy_storage::bijective::BindOutcome;
use proxy_storage::repo::{ModelRegistryRepo, NamespaceIndexRepo, WorldConfigTablesRepo};

use crate::SystemError;

/// Registry configuration, the namespace index and model registration.
#[derive(Debug, Default, Clone)]
pub struct AdminSystemRuntime;

impl AdminSystemRuntime {
    pub const SYSTEM: SystemId = SystemId::AdminSystem;

    pub fn run<R>(&self, repo: &mut R, call: &WorldCall) -> Result<(), SystemError>
    where
        R: WorldConfigTablesRepo + NamespaceIndexRepo + ModelRegistryRepo,
    {
        match call {
            WorldCall::SetInputBoxAddress { address } => repo.set_input_box_address_row(*address)?,
            WorldCall::SetCartridgeAssetAddress { address } => {
                repo.set_cartridge_asset_address_row(*address)?
            }
            WorldCall::SetTapeAssetAddress { address } => {
                repo.set_tape_asset_address_row(*address)?
            }
            WorldCall::BindNamespace {
                dapp_address,
                namespace,
            } => {
                let outcome = repo.bind_namespace_row(*dapp_address, *namespace)?;
                if outcome == BindOutcome::AlreadyBound {
                    tracing::debug!(%dapp_address, %namespace, "binding already present");
                }
            }
            WorldCall::UnbindNamespace { dapp_address } => {
                repo.unbind_namespace_row(*dapp_address)?;
            }
            WorldCall::SetModelActive {
                model_address,
                active,
            } => repo.set_registered_model_row(*model_address, *active)?,
            WorldCall::SetInsertionModel {
                model_address,
                config,
            } => repo.set_cartridge_insertion_model_row(*model_address, config.clone())?,
            WorldCall::SetSubmissionModel {
                cartridge_id,
                model_address,
                config,
            } => repo.set_tape_submission_model_row(
                *cartridge_id,
                *model_address,
                config.clone(),
            )?,
            WorldCall::RemoveSubmissionModel { cartridge_id } => {
                repo.delete_tape_submission_model_row(cartridge_id)?;
            }
            WorldCall::RegisterCartridge { .. }
            | WorldCall::RegisterTape { .. }
            | WorldCall::RecordDappMessage { .. } => return Err(not_owned()),
        }
        Ok(())
    }
}

fn not_owned() -> SystemError {
    SystemError::ContractViolation(ContractViolation::InvalidValue {
        field: "world_call.op",
        reason: "operation is not owned by AdminSystem",
    })
}
