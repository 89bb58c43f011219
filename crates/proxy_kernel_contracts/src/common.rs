#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReasonCodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    #[error("{field} exceeds max length ({got} > {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        got: usize,
    },
}

pub trait Validate {
    fn validate(&self) -> Result<(), ContractViolation>;
}

/// Rejects blank (empty or whitespace-only) text and text longer than `max_len` bytes.
pub fn validate_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ContractViolation> {
    if value.trim().is_empty() {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must not be empty",
        });
    }
    validate_len(field, value.len(), max_len)
}

pub fn validate_len(
    field: &'static str,
    len: usize,
    max_len: usize,
) -> Result<(), ContractViolation> {
    if len > max_len {
        return Err(ContractViolation::TooLong {
            field,
            max: max_len,
            got: len,
        });
    }
    Ok(())
}
