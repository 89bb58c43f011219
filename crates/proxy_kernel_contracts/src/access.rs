#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::primitives::Address;
use crate::ContractViolation;

/// Already-authenticated identity of whoever submits a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(Address);

impl CallerId {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SystemId {
    AdminSystem,
    InputSystem,
    InputBoxSystem,
}

impl SystemId {
    pub const ALL: [SystemId; 3] = [
        SystemId::AdminSystem,
        SystemId::InputSystem,
        SystemId::InputBoxSystem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SystemId::AdminSystem => "AdminSystem",
            SystemId::InputSystem => "InputSystem",
            SystemId::InputBoxSystem => "InputBoxSystem",
        }
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemId {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or(ContractViolation::InvalidValue {
                field: "system_id",
                reason: "unknown system",
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRequirement {
    AdminOnly,
    OpenAccess,
}

/// A named permission held by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Satisfies every admin-only operation.
    Admin,
    /// Satisfies admin-only operations owned by one system.
    SystemAccess(SystemId),
}

impl Capability {
    pub fn satisfies(self, requirement: AccessRequirement, system: SystemId) -> bool {
        match requirement {
            AccessRequirement::OpenAccess => true,
            AccessRequirement::AdminOnly => match self {
                Capability::Admin => true,
                Capability::SystemAccess(granted) => granted == system,
            },
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Admin => f.write_str("admin"),
            Capability::SystemAccess(system) => write!(f, "system:{system}"),
        }
    }
}

impl FromStr for Capability {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "admin" {
            return Ok(Capability::Admin);
        }
        match s.strip_prefix("system:") {
            Some(system) => Ok(Capability::SystemAccess(system.parse()?)),
            None => Err(ContractViolation::InvalidValue {
                field: "capability",
                reason: "expected `admin` or `system:<SystemName>`",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationId {
    SetInputBoxAddress,
    SetCartridgeAssetAddress,
    SetTapeAssetAddress,
    BindNamespace,
    UnbindNamespace,
    SetModelActive,
    SetInsertionModel,
    SetSubmissionModel,
    RemoveSubmissionModel,
    RegisterCartridge,
    RegisterTape,
    RecordDappMessage,
}

impl OperationId {
    pub const ALL: [OperationId; 12] = [
        OperationId::SetInputBoxAddress,
        OperationId::SetCartridgeAssetAddress,
        OperationId::SetTapeAssetAddress,
        OperationId::BindNamespace,
        OperationId::UnbindNamespace,
        OperationId::SetModelActive,
        OperationId::SetInsertionModel,
        OperationId::SetSubmissionModel,
        OperationId::RemoveSubmissionModel,
        OperationId::RegisterCartridge,
        OperationId::RegisterTape,
        OperationId::RecordDappMessage,
    ];

    pub fn system(self) -> SystemId {
        match self {
            OperationId::RegisterCartridge | OperationId::RegisterTape => SystemId::InputSystem,
            OperationId::RecordDappMessage => SystemId::InputBoxSystem,
            _ => SystemId::AdminSystem,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationId::SetInputBoxAddress => "set_input_box_address",
            OperationId::SetCartridgeAssetAddress => "set_cartridge_asset_address",
            OperationId::SetTapeAssetAddress => "set_tape_asset_address",
            OperationId::BindNamespace => "bind_namespace",
            OperationId::UnbindNamespace => "unbind_namespace",
            OperationId::SetModelActive => "set_model_active",
            OperationId::SetInsertionModel => "set_insertion_model",
            OperationId::SetSubmissionModel => "set_submission_model",
            OperationId::RemoveSubmissionModel => "remove_submission_model",
            OperationId::RegisterCartridge => "register_cartridge",
            OperationId::RegisterTape => "register_tape",
            OperationId::RecordDappMessage => "record_dapp_message",
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationId {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationId::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or(ContractViolation::InvalidValue {
                field: "operation_id",
                reason: "unknown operation",
            })
    }
}
