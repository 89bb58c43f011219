#![forbid(unsafe_code)]

use std::sync::RwLock;

use proxy_kernel_contracts::access::{CallerId, SystemId};
use proxy_kernel_contracts::calls::{CallReceipt, WorldCall, MAX_DEBUG_DATA_LEN};
use proxy_kernel_contracts::primitives::{Address, CartridgeId, Namespace, TapeId};
use proxy_kernel_contracts::{ContractViolation, Validate};
use proxy_storage::WorldStore;
use sha2::{Digest, Sha256};

use crate::access_gate::{AccessGate, AccessPolicy, CapabilityResolver, StaticCapabilityResolver};
use crate::admin_system::AdminSystemRuntime;
use crate::config::WorldConfig;
use crate::input_box_system::InputBoxSystemRuntime;
use crate::input_system::InputSystemRuntime;
use crate::{reason_codes, SystemError};

/// Shared world: one store behind one lock, every mutation routed through the gate.
///
/// Each `execute` holds the write lock for the whole mutation, so a call is applied entirely or
/// not at all and readers never see half of a namespace binding.
pub struct World<R = StaticCapabilityResolver> {
    gate: AccessGate<R>,
    trace_mutations: bool,
    state: RwLock<WorldStore>,
    admin: AdminSystemRuntime,
    input: InputSystemRuntime,
    input_box: InputBoxSystemRuntime,
}

impl World<StaticCapabilityResolver> {
    pub fn from_config(config: &WorldConfig) -> Result<Self, SystemError> {
        let store = WorldStore::new(config.schema.clone())?;
        Ok(Self::new(
            store,
            config.access_policy(),
            config.capability_resolver(),
            config.trace_mutations,
        ))
    }
}

impl<R: CapabilityResolver> World<R> {
    pub fn new(
        store: WorldStore,
        policy: AccessPolicy,
        resolver: R,
        trace_mutations: bool,
    ) -> Self {
        Self {
            gate: AccessGate::new(policy, resolver),
            trace_mutations,
            state: RwLock::new(store),
            admin: AdminSystemRuntime,
            input: InputSystemRuntime,
            input_box: InputBoxSystemRuntime,
        }
    }

    pub fn execute(
        &self,
        caller: &CallerId,
        call: &WorldCall,
    ) -> Result<CallReceipt, SystemError> {
        let operation = call.operation();
        let result = self.execute_inner(caller, call);
        match &result {
            Ok(receipt) => tracing::info!(
                %caller,
                %operation,
                reason_code = reason_codes::WORLD_CALL_APPLIED.0,
                trace_index = ?receipt.trace_index,
                "world call applied"
            ),
            Err(err) => tracing::warn!(
                %caller,
                %operation,
                reason_code = err.reason_code().0,
                error = %err,
                "world call rejected"
            ),
        }
        result
    }

    fn execute_inner(
        &self,
        caller: &CallerId,
        call: &WorldCall,
    ) -> Result<CallReceipt, SystemError> {
        let operation = call.operation();
        self.gate.check(caller, operation)?;
        call.validate()?;

        let mut store = self.state.write().map_err(|_| SystemError::LockPoisoned)?;
        let system = operation.system();

        // InputBoxSystem writes the log itself; everything else is traced on request.
        let trace = if self.trace_mutations && system != InputBoxSystemRuntime::SYSTEM {
            let data = trace_payload(call)?;
            // Checked before the mutation so a full log rejects the call up front.
            store.check_diagnostic_append(operation.as_str(), &data)?;
            Some(data)
        } else {
            None
        };

        let own_index = match system {
            SystemId::AdminSystem => {
                self.admin.run(&mut *store, call)?;
                None
            }
            SystemId::InputSystem => {
                self.input.run(&mut *store, call)?;
                None
            }
            SystemId::InputBoxSystem => Some(self.input_box.run(&mut *store, call)?),
        };

        let trace_index = match (own_index, trace) {
            (Some(index), _) => Some(index),
            (None, Some(data)) => {
                Some(store.append_diagnostic(operation.as_str().to_string(), data)?)
            }
            (None, None) => None,
        };
        Ok(CallReceipt {
            operation,
            trace_index,
        })
    }

    /// Runs `f` against a consistent view of the store. Reads are not gated.
    pub fn read<T>(&self, f: impl FnOnce(&WorldStore) -> T) -> Result<T, SystemError> {
        let store = self.state.read().map_err(|_| SystemError::LockPoisoned)?;
        Ok(f(&store))
    }

    pub fn snapshot(&self) -> Result<WorldStore, SystemError> {
        self.read(WorldStore::clone)
    }

    pub fn lookup_by_address(
        &self,
        dapp_address: &Address,
    ) -> Result<Option<Namespace>, SystemError> {
        self.read(|s| s.namespace_of(dapp_address))
    }

    pub fn lookup_by_namespace(
        &self,
        namespace: &Namespace,
    ) -> Result<Option<Address>, SystemError> {
        self.read(|s| s.dapp_address_of(namespace))
    }

    pub fn cartridge_owner(
        &self,
        cartridge_id: &CartridgeId,
    ) -> Result<Option<Address>, SystemError> {
        self.read(|s| s.cartridge_owner(cartridge_id))
    }

    pub fn tape_creator(&self, tape_id: &TapeId) -> Result<Option<Address>, SystemError> {
        self.read(|s| s.tape_creator(tape_id))
    }

    pub fn is_model_active(&self, model_address: &Address) -> Result<bool, SystemError> {
        self.read(|s| s.is_model_active(model_address))
    }
}

/// JSON of the call, or a digest marker when the JSON would not fit in a diagnostic entry.
fn trace_payload(call: &WorldCall) -> Result<Vec<u8>, SystemError> {
    let data = serde_json::to_vec(call).map_err(not_serializable)?;
    if data.len() <= MAX_DEBUG_DATA_LEN {
        return Ok(data);
    }
    let marker = serde_json::json!({
        "op": call.operation().as_str(),
        "truncated": true,
        "len": data.len(),
        "sha256": hex::encode(Sha256::digest(&data)),
    });
    serde_json::to_vec(&marker).map_err(not_serializable)
}

fn not_serializable(_: serde_json::Error) -> SystemError {
    SystemError::ContractViolation(ContractViolation::InvalidValue {
        field: "world_call",
        reason: "not serializable",
    })
}
