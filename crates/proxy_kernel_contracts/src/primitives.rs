#![forbid(unsafe_code)]

//! Fixed-width world values: 20-byte addresses and 32-byte identifiers.
//!
//! Both render as `0x`-prefixed lowercase hex and serialize as that string.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ContractViolation, Validate};

pub const ADDRESS_LEN: usize = 20;
pub const BYTES32_LEN: usize = 32;

/// Trims surrounding whitespace and an optional `0x`/`0X` prefix.
fn hex_digits(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

fn decode_fixed<const N: usize>(
    field: &'static str,
    raw: &str,
) -> Result<[u8; N], ContractViolation> {
    let digits = hex_digits(raw);
    if digits.len() != N * 2 {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "wrong number of hex digits",
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|_| ContractViolation::InvalidValue {
        field,
        reason: "must be hex",
    })?;
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Address whose trailing eight bytes hold `v` big-endian.
    pub fn from_low_u64_be(v: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&v.to_be_bytes());
        Self(bytes)
    }

    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        decode_fixed::<ADDRESS_LEN>("address", raw).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Rejects the zero address for fields that must name a real account or contract.
    pub fn validate_nonzero(&self, field: &'static str) -> Result<(), ContractViolation> {
        if self.is_zero() {
            return Err(ContractViolation::InvalidValue {
                field,
                reason: "must not be the zero address",
            });
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Bytes32([u8; BYTES32_LEN]);

impl Bytes32 {
    pub const ZERO: Bytes32 = Bytes32([0u8; BYTES32_LEN]);

    pub const fn from_bytes(bytes: [u8; BYTES32_LEN]) -> Self {
        Self(bytes)
    }

    /// Left-aligned ASCII label padded with zero bytes, the way short-string ids are packed
    /// into a `bytes32` slot.
    pub fn from_label(label: &str) -> Result<Self, ContractViolation> {
        if label.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "bytes32.label",
                reason: "must not be empty",
            });
        }
        if !label.is_ascii() {
            return Err(ContractViolation::InvalidValue {
                field: "bytes32.label",
                reason: "must be ASCII",
            });
        }
        if label.len() > BYTES32_LEN {
            return Err(ContractViolation::TooLong {
                field: "bytes32.label",
                max: BYTES32_LEN,
                got: label.len(),
            });
        }
        let mut bytes = [0u8; BYTES32_LEN];
        bytes[..label.len()].copy_from_slice(label.as_bytes());
        Ok(Self(bytes))
    }

    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        decode_fixed::<BYTES32_LEN>("bytes32", raw).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; BYTES32_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; BYTES32_LEN]
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Bytes32 {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Bytes32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

macro_rules! bytes32_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Bytes32);

        impl $name {
            pub fn new(raw: Bytes32) -> Result<Self, ContractViolation> {
                let v = Self(raw);
                v.validate()?;
                Ok(v)
            }

            pub fn from_label(label: &str) -> Result<Self, ContractViolation> {
                Self::new(Bytes32::from_label(label)?)
            }

            pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
                Self::new(Bytes32::parse(raw)?)
            }

            pub fn as_bytes32(&self) -> &Bytes32 {
                &self.0
            }
        }

        impl Validate for $name {
            fn validate(&self) -> Result<(), ContractViolation> {
                if self.0.is_zero() {
                    return Err(ContractViolation::InvalidValue {
                        field: $field,
                        reason: "must not be all zero",
                    });
                }
                Ok(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

bytes32_id!(
    /// Opaque 32-byte identifier grouping a dapp's resources.
    Namespace,
    "namespace"
);
bytes32_id!(CartridgeId, "cartridge_id");
bytes32_id!(TapeId, "tape_id");

/// Hex (de)serialization for opaque byte payloads, for use with `#[serde(with = ...)]`.
pub mod hex_bytes {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hex::decode(super::hex_digits(&raw)).map_err(D::Error::custom)
    }
}
