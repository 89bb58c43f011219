#![forbid(unsafe_code)]

use proxy_kernel_contracts::access::SystemId;
use proxy_kernel_contracts::calls::WorldCall;
use proxy_kernel_contracts::schema::tables::DAPP_ADDRESS_NAMESPACE;
use proxy_kernel_contracts::ContractViolation;
use proxy_storage::repo::{DiagnosticLogRepo, NamespaceIndexRepo};
use proxy_storage::StorageError;

use crate::SystemError;

/// Records messages relayed for a dapp into the diagnostic log.
#[derive(Debug, Default, Clone)]
pub struct InputBoxSystemRuntime;

impl InputBoxSystemRuntime {
    pub const SYSTEM: SystemId = SystemId::InputBoxSystem;

    /// Returns the index of the appended entry.
    pub fn run<R>(&self, repo: &mut R, call: &WorldCall) -> Result<u32, SystemError>
    where
        R: NamespaceIndexRepo + DiagnosticLogRepo,
    {
        let WorldCall::RecordDappMessage {
            dapp_address,
            message,
            data,
        } = call
        else {
            return Err(SystemError::ContractViolation(
                ContractViolation::InvalidValue {
                    field: "world_call.op",
                    reason: "operation is not owned by InputBoxSystem",
                },
            ));
        };
        // Only dapps with a namespace may write.
        let Some(namespace) = repo.namespace_by_dapp_address_row(dapp_address) else {
            return Err(StorageError::NotFound {
                table: DAPP_ADDRESS_NAMESPACE,
                key: dapp_address.to_string(),
            }
            .into());
        };
        let index = repo.append_dapp_message_row(message.clone(), data.clone())?;
        tracing::debug!(%dapp_address, %namespace, index, "dapp message recorded");
        Ok(index)
    }
}
