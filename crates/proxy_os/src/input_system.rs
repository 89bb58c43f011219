#![forbid(unsafe_code)]

use proxy_kernel_contracts::access::SystemId;
use proxy_kernel_contracts::calls::WorldCall;
use proxy_kernel_contracts::ContractViolation;
use proxy_storage::repo::AssetOwnershipRepo;

use crate::SystemError;

/// Cartridge and tape registration. Both are insert-only.
#[derive(Debug, Default, Clone)]
pub struct InputSystemRuntime;

impl InputSystemRuntime {
    pub const SYSTEM: SystemId = SystemId::InputSystem;

    pub fn run<R: AssetOwnershipRepo>(
        &self,
        repo: &mut R,
        call: &WorldCall,
    ) -> Result<(), SystemError> {
        match call {
            WorldCall::RegisterCartridge {
                cartridge_id,
                owner,
            } => repo.insert_cartridge_owner_row(*cartridge_id, *owner)?,
            WorldCall::RegisterTape { tape_id, creator } => {
                repo.insert_tape_creator_row(*tape_id, *creator)?
            }
            _ => {
                return Err(SystemError::ContractViolation(
                    ContractViolation::InvalidValue {
                        field: "world_call.op",
                        reason: "operation is not owned by InputSystem",
                    },
                ))
            }
        }
        Ok(())
    }
}
