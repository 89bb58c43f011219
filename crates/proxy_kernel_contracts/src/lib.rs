#![forbid(unsafe_code)]

pub mod access;
pub mod calls;
pub mod common;
pub mod primitives;
pub mod schema;

pub use common::{ContractViolation, ReasonCodeId, SchemaVersion, Validate};
