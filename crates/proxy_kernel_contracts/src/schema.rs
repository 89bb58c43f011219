#![forbid(unsafe_code)]

//! Declarative world schema: table names, key fields and typed value fields.
//!
//! The schema is configuration. A store is built against one schema and keeps it for its
//! whole lifetime; there is no migration path.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::common::{validate_len, validate_text};
use crate::{ContractViolation, SchemaVersion, Validate};

pub const WORLD_SCHEMA_VERSION: SchemaVersion = SchemaVersion(1);

/// Namespaces are packed into a 14-byte slot of a resource id.
pub const MAX_NAMESPACE_LEN: usize = 14;
pub const MAX_TABLE_NAME_LEN: usize = 64;
pub const MAX_FIELD_NAME_LEN: usize = 64;

pub const DEFAULT_NAMESPACE: &str = "core";

pub mod tables {
    pub const INPUT_BOX_ADDRESS: &str = "InputBoxAddress";
    pub const DAPP_ADDRESS_NAMESPACE: &str = "DappAddressNamespace";
    pub const NAMESPACE_DAPP_ADDRESS: &str = "NamespaceDappAddress";
    pub const CARTRIDGE_ASSET_ADDRESS: &str = "CartridgeAssetAddress";
    pub const CARTRIDGE_OWNER: &str = "CartridgeOwner";
    pub const TAPE_ASSET_ADDRESS: &str = "TapeAssetAddress";
    pub const TAPE_CREATOR: &str = "TapeCreator";
    pub const REGISTERED_MODEL: &str = "RegisteredModel";
    pub const CARTRIDGE_INSERTION_MODEL: &str = "CartridgeInsertionModel";
    pub const TAPE_SUBMISSION_MODEL: &str = "TapeSubmissionModel";
    pub const DAPP_MESSAGES_DEBUG: &str = "DappMessagesDebug";
    pub const DEBUG_COUNTER: &str = "DebugCounter";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Address,
    Bytes32,
    Uint32,
    Bool,
    String,
    Bytes,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Address => "address",
            FieldType::Bytes32 => "bytes32",
            FieldType::Uint32 => "uint32",
            FieldType::Bool => "bool",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldSpec {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(default)]
    pub key: Vec<String>,
    pub fields: Vec<FieldSpec>,
}

impl TableSpec {
    pub fn new(name: &str, key: &[&str], fields: &[(&str, FieldType)]) -> Self {
        Self {
            name: name.to_string(),
            key: key.iter().map(|k| k.to_string()).collect(),
            fields: fields
                .iter()
                .map(|(name, ty)| FieldSpec::new(name, *ty))
                .collect(),
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.key.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Canonical one-line rendering: fields sorted by name, key fields in declared order.
    pub fn canonical_line(&self) -> String {
        let mut fields: Vec<&FieldSpec> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        let mut line = format!("{}[{}]", self.name, self.key.join(","));
        for f in fields {
            let _ = write!(line, " {}:{}", f.name, f.ty.as_str());
        }
        line
    }
}

impl Validate for TableSpec {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("table_spec.name", &self.name, MAX_TABLE_NAME_LEN)?;
        if self.fields.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "table_spec.fields",
                reason: "must declare at least one field",
            });
        }
        let mut names = BTreeSet::new();
        for f in &self.fields {
            validate_text("table_spec.fields.name", &f.name, MAX_FIELD_NAME_LEN)?;
            if !names.insert(f.name.as_str()) {
                return Err(ContractViolation::InvalidValue {
                    field: "table_spec.fields.name",
                    reason: "must be unique within a table",
                });
            }
        }
        let mut keys = BTreeSet::new();
        for k in &self.key {
            if !names.contains(k.as_str()) {
                return Err(ContractViolation::InvalidValue {
                    field: "table_spec.key",
                    reason: "must name a declared field",
                });
            }
            if !keys.insert(k.as_str()) {
                return Err(ContractViolation::InvalidValue {
                    field: "table_spec.key",
                    reason: "must not repeat a field",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSchema {
    pub namespace: String,
    pub tables: Vec<TableSpec>,
}

impl WorldSchema {
    pub fn new(
        namespace: impl Into<String>,
        tables: Vec<TableSpec>,
    ) -> Result<Self, ContractViolation> {
        let s = Self {
            namespace: namespace.into(),
            tables,
        };
        s.validate()?;
        Ok(s)
    }

    /// The `core` world: registry singletons, the namespace index pair, asset ownership,
    /// model registration and the debug message log.
    pub fn core_v1() -> Self {
        use tables::*;
        use FieldType::*;
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            tables: vec![
                TableSpec::new(INPUT_BOX_ADDRESS, &[], &[("value", Address)]),
                TableSpec::new(
                    DAPP_ADDRESS_NAMESPACE,
                    &["dappAddress"],
                    &[("namespace", Bytes32), ("dappAddress", Address)],
                ),
                TableSpec::new(
                    NAMESPACE_DAPP_ADDRESS,
                    &["namespace"],
                    &[("namespace", Bytes32), ("dappAddress", Address)],
                ),
                TableSpec::new(CARTRIDGE_ASSET_ADDRESS, &[], &[("value", Address)]),
                TableSpec::new(
                    CARTRIDGE_OWNER,
                    &["cartridgeId"],
                    &[("cartridgeId", Bytes32), ("owner", Address)],
                ),
                TableSpec::new(TAPE_ASSET_ADDRESS, &[], &[("value", Address)]),
                TableSpec::new(
                    TAPE_CREATOR,
                    &["tapeId"],
                    &[("tapeId", Bytes32), ("owner", Address)],
                ),
                TableSpec::new(
                    REGISTERED_MODEL,
                    &["modelAddress"],
                    &[("modelAddress", Address), ("active", Bool)],
                ),
                TableSpec::new(
                    CARTRIDGE_INSERTION_MODEL,
                    &[],
                    &[("modelAddress", Address), ("config", Bytes)],
                ),
                TableSpec::new(
                    TAPE_SUBMISSION_MODEL,
                    &["cartridgeId"],
                    &[
                        ("cartridgeId", Bytes32),
                        ("modelAddress", Address),
                        ("config", Bytes),
                    ],
                ),
                TableSpec::new(
                    DAPP_MESSAGES_DEBUG,
                    &["index"],
                    &[("index", Uint32), ("message", String), ("data", Bytes)],
                ),
                TableSpec::new(DEBUG_COUNTER, &[], &[("value", Uint32)]),
            ],
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// SHA-256 over the canonical rendering, tables sorted by name. Independent of the
    /// declaration order of tables and of fields.
    pub fn fingerprint(&self) -> String {
        let mut lines: Vec<String> = self.tables.iter().map(TableSpec::canonical_line).collect();
        lines.sort();
        let mut hasher = Sha256::new();
        hasher.update(format!("v{};ns={}\n", WORLD_SCHEMA_VERSION.0, self.namespace));
        for line in lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

impl Default for WorldSchema {
    fn default() -> Self {
        Self::core_v1()
    }
}

impl Validate for WorldSchema {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("world_schema.namespace", &self.namespace, MAX_NAMESPACE_LEN)?;
        if !self.namespace.is_ascii() {
            return Err(ContractViolation::InvalidValue {
                field: "world_schema.namespace",
                reason: "must be ASCII",
            });
        }
        validate_len("world_schema.tables", self.tables.len(), 256)?;
        let mut names = BTreeSet::new();
        for t in &self.tables {
            t.validate()?;
            if !names.insert(t.name.as_str()) {
                return Err(ContractViolation::InvalidValue {
                    field: "world_schema.tables.name",
                    reason: "must be unique",
                });
            }
        }
        Ok(())
    }
}
