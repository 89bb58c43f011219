#![forbid(unsafe_code)]

use proxy_kernel_contracts::access::{CallerId, OperationId};
use proxy_kernel_contracts::{ContractViolation, ReasonCodeId};
use proxy_storage::StorageError;
use thiserror::Error;

pub mod reason_codes {
    use proxy_kernel_contracts::ReasonCodeId;

    pub const WORLD_CALL_APPLIED: ReasonCodeId = ReasonCodeId(0x5700_0001);
    pub const WORLD_UNAUTHORIZED: ReasonCodeId = ReasonCodeId(0x5700_0010);
    pub const WORLD_INPUT_INVALID: ReasonCodeId = ReasonCodeId(0x5700_0011);
    pub const WORLD_KEY_CONFLICT: ReasonCodeId = ReasonCodeId(0x5700_0020);
    pub const WORLD_NOT_FOUND: ReasonCodeId = ReasonCodeId(0x5700_0021);
    pub const WORLD_BIND_CONFLICT: ReasonCodeId = ReasonCodeId(0x5700_0022);
    pub const WORLD_INACTIVE_MODEL: ReasonCodeId = ReasonCodeId(0x5700_0023);
    pub const WORLD_SCHEMA_MISMATCH: ReasonCodeId = ReasonCodeId(0x5700_0024);
    pub const WORLD_LOG_EXHAUSTED: ReasonCodeId = ReasonCodeId(0x5700_0025);
    pub const WORLD_LOCK_POISONED: ReasonCodeId = ReasonCodeId(0x5700_00F0);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("caller {caller} is not permitted to run {operation}")]
    Unauthorized {
        caller: CallerId,
        operation: OperationId,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),
    #[error("world state lock poisoned")]
    LockPoisoned,
}

impl SystemError {
    pub fn reason_code(&self) -> ReasonCodeId {
        match self {
            SystemError::Unauthorized { .. } => reason_codes::WORLD_UNAUTHORIZED,
            SystemError::ContractViolation(_) => reason_codes::WORLD_INPUT_INVALID,
            SystemError::LockPoisoned => reason_codes::WORLD_LOCK_POISONED,
            SystemError::Storage(e) => match e {
                StorageError::KeyConflict { .. } => reason_codes::WORLD_KEY_CONFLICT,
                StorageError::NotFound { .. } => reason_codes::WORLD_NOT_FOUND,
                StorageError::BindConflict { .. } => reason_codes::WORLD_BIND_CONFLICT,
                StorageError::InactiveModel { .. } => reason_codes::WORLD_INACTIVE_MODEL,
                StorageError::SchemaMismatch { .. } => reason_codes::WORLD_SCHEMA_MISMATCH,
                StorageError::LogExhausted { .. } => reason_codes::WORLD_LOG_EXHAUSTED,
                StorageError::ContractViolation(_) => reason_codes::WORLD_INPUT_INVALID,
            },
        }
    }
}
