#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use proxy_kernel_contracts::access::{
    AccessRequirement, CallerId, Capability, OperationId, SystemId,
};
use proxy_kernel_contracts::primitives::Address;
use proxy_kernel_contracts::schema::{TableSpec, WorldSchema, DEFAULT_NAMESPACE};
use proxy_kernel_contracts::Validate;
use serde::Deserialize;
use thiserror::Error;

use crate::access_gate::{AccessPolicy, StaticCapabilityResolver};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse world config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid world config at {field}: {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWorldConfig {
    namespace: Option<String>,
    #[serde(default)]
    trace_mutations: bool,
    #[serde(default)]
    systems: Vec<RawSystem>,
    #[serde(default)]
    operations: BTreeMap<String, String>,
    #[serde(default)]
    grants: Vec<RawGrant>,
    tables: Option<Vec<TableSpec>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSystem {
    name: String,
    #[serde(default)]
    open_access: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGrant {
    caller: String,
    capabilities: Vec<String>,
}

/// Validated world configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    pub schema: WorldSchema,
    pub trace_mutations: bool,
    pub open_systems: BTreeSet<SystemId>,
    pub overrides: BTreeMap<OperationId, AccessRequirement>,
    pub grants: BTreeMap<CallerId, BTreeSet<Capability>>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            schema: WorldSchema::core_v1(),
            trace_mutations: false,
            open_systems: BTreeSet::new(),
            overrides: BTreeMap::new(),
            grants: BTreeMap::new(),
        }
    }
}

impl WorldConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawWorldConfig = toml::from_str(raw)?;

        let mut schema = match raw.tables {
            Some(tables) => WorldSchema {
                namespace: DEFAULT_NAMESPACE.to_string(),
                tables,
            },
            None => WorldSchema::core_v1(),
        };
        if let Some(namespace) = raw.namespace {
            schema.namespace = namespace;
        }
        schema
            .validate()
            .map_err(|e| invalid("tables", e.to_string()))?;

        let mut declared = BTreeSet::new();
        let mut open_systems = BTreeSet::new();
        for (i, s) in raw.systems.iter().enumerate() {
            let system: SystemId = s.name.parse().map_err(|_| {
                invalid(
                    format!("systems[{i}].name"),
                    format!("unknown system `{}`", s.name),
                )
            })?;
            if !declared.insert(system) {
                return Err(invalid(
                    format!("systems[{i}].name"),
                    format!("system `{system}` declared twice"),
                ));
            }
            if s.open_access {
                open_systems.insert(system);
            }
        }

        let mut overrides = BTreeMap::new();
        for (name, requirement) in &raw.operations {
            let op: OperationId = name
                .parse()
                .map_err(|_| invalid(format!("operations.{name}"), "unknown operation"))?;
            let requirement = match requirement.as_str() {
                "open_access" => AccessRequirement::OpenAccess,
                "admin_only" => AccessRequirement::AdminOnly,
                other => {
                    return Err(invalid(
                        format!("operations.{name}"),
                        format!("expected `open_access` or `admin_only`, got `{other}`"),
                    ))
                }
            };
            overrides.insert(op, requirement);
        }

        let mut grants: BTreeMap<CallerId, BTreeSet<Capability>> = BTreeMap::new();
        for (i, g) in raw.grants.iter().enumerate() {
            let address = Address::parse(&g.caller)
                .map_err(|e| invalid(format!("grants[{i}].caller"), e.to_string()))?;
            let caller = CallerId::new(address);
            if grants.contains_key(&caller) {
                return Err(invalid(
                    format!("grants[{i}].caller"),
                    format!("caller {caller} granted twice"),
                ));
            }
            let mut capabilities = BTreeSet::new();
            for c in &g.capabilities {
                let capability: Capability = c
                    .parse()
                    .map_err(|e: proxy_kernel_contracts::ContractViolation| {
                        invalid(format!("grants[{i}].capabilities"), e.to_string())
                    })?;
                capabilities.insert(capability);
            }
            grants.insert(caller, capabilities);
        }

        Ok(Self {
            schema,
            trace_mutations: raw.trace_mutations,
            open_systems,
            overrides,
            grants,
        })
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::from_systems(&self.open_systems, &self.overrides)
    }

    pub fn capability_resolver(&self) -> StaticCapabilityResolver {
        StaticCapabilityResolver::from_grants(self.grants.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ADMIN: &str = "0x00000000000000000000000000000000000000a1";

    #[test]
    fn at_config_01_empty_config_is_core_world_admin_only() {
        let cfg = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, WorldConfig::default());
        assert_eq!(
            cfg.access_policy().requirement(OperationId::RecordDappMessage),
            AccessRequirement::AdminOnly
        );
    }

    #[test]
    fn at_config_02_full_config_round_trips_into_policy_and_grants() {
        let raw = format!(
            r#"
namespace = "arcade"
trace_mutations = true

[[systems]]
name = "InputSystem"
open_access = true

[operations]
register_tape = "admin_only"

[[grants]]
caller = "{ADMIN}"
capabilities = ["admin", "system:InputBoxSystem"]
"#
        );
        let cfg = WorldConfig::from_toml_str(&raw).unwrap();
        assert_eq!(cfg.schema.namespace, "arcade");
        assert!(cfg.trace_mutations);
        let policy = cfg.access_policy();
        assert_eq!(
            policy.requirement(OperationId::RegisterCartridge),
            AccessRequirement::OpenAccess
        );
        assert_eq!(
            policy.requirement(OperationId::RegisterTape),
            AccessRequirement::AdminOnly
        );
        let caller = CallerId::new(Address::parse(ADMIN).unwrap());
        assert_eq!(cfg.grants[&caller].len(), 2);
    }

    #[test]
    fn at_config_03_unknown_names_are_invalid() {
        for raw in [
            "[[systems]]\nname = \"PaymentSystem\"\n",
            "[operations]\ntransfer_cartridge = \"open_access\"\n",
            "[operations]\nregister_tape = \"sometimes\"\n",
            "[[grants]]\ncaller = \"0x1234\"\ncapabilities = [\"admin\"]\n",
            concat!(
                "[[grants]]\ncaller = \"0x00000000000000000000000000000000000000a1\"\n",
                "capabilities = [\"root\"]\n",
            ),
        ] {
            assert!(
                matches!(WorldConfig::from_toml_str(raw), Err(ConfigError::Invalid { .. })),
                "{raw}"
            );
        }
    }

    #[test]
    fn at_config_04_duplicate_grant_is_invalid() {
        let raw = format!(
            "[[grants]]\ncaller = \"{ADMIN}\"\ncapabilities = [\"admin\"]\n\
             [[grants]]\ncaller = \"{ADMIN}\"\ncapabilities = []\n"
        );
        assert!(matches!(
            WorldConfig::from_toml_str(&raw),
            Err(ConfigError::Invalid { field, .. }) if field == "grants[1].caller"
        ));
    }

    #[test]
    fn at_config_05_unknown_key_is_parse_error() {
        assert!(matches!(
            WorldConfig::from_toml_str("chain_id = 31337\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn at_config_06_loads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "trace_mutations = true").unwrap();
        let cfg = WorldConfig::from_path(f.path()).unwrap();
        assert!(cfg.trace_mutations);

        let missing = f.path().with_extension("missing");
        assert!(matches!(
            WorldConfig::from_path(&missing),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn at_config_07_explicit_tables_replace_core_schema() {
        let raw = r#"
[[tables]]
name = "InputBoxAddress"
key = []
fields = [{ name = "value", type = "address" }]
"#;
        let cfg = WorldConfig::from_toml_str(raw).unwrap();
        assert_eq!(cfg.schema.tables.len(), 1);
        assert_eq!(cfg.schema.namespace, DEFAULT_NAMESPACE);
    }
}
