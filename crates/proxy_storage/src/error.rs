#![forbid(unsafe_code)]

use proxy_kernel_contracts::primitives::{Address, Namespace};
use proxy_kernel_contracts::ContractViolation;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{table}: key {key} already present")]
    KeyConflict { table: &'static str, key: String },
    #[error("{table}: key {key} not found")]
    NotFound { table: &'static str, key: String },
    #[error(
        "cannot bind {dapp_address} to {namespace}: \
         {existing_address} is bound to {existing_namespace}"
    )]
    BindConflict {
        dapp_address: Address,
        namespace: Namespace,
        existing_address: Address,
        existing_namespace: Namespace,
    },
    #[error("model {model_address} is not registered as active")]
    InactiveModel { model_address: Address },
    #[error("schema mismatch on {table}: {reason}")]
    SchemaMismatch { table: String, reason: &'static str },
    #[error("{table}: counter exhausted")]
    LogExhausted { table: &'static str },
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),
}
