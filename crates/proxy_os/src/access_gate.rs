#![forbid(unsafe_code)]

//! Capability check in front of every mutating operation.
//!
//! The gate never writes. A rejection is returned before the world lock is taken, so a
//! rejected call cannot leave rows or diagnostic entries behind.

use std::collections::{BTreeMap, BTreeSet};

use proxy_kernel_contracts::access::{
    AccessRequirement, CallerId, Capability, OperationId, SystemId,
};

use crate::SystemError;

/// Resolves an authenticated caller to the capabilities it holds.
pub trait CapabilityResolver: Send + Sync {
    fn resolve_capabilities(&self, caller: &CallerId) -> BTreeSet<Capability>;
}

/// Fixed caller -> capabilities table, usually loaded from the world config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCapabilityResolver {
    grants: BTreeMap<CallerId, BTreeSet<Capability>>,
}

impl StaticCapabilityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grants(grants: BTreeMap<CallerId, BTreeSet<Capability>>) -> Self {
        Self { grants }
    }

    pub fn with_grant(mut self, caller: CallerId, capability: Capability) -> Self {
        self.grants.entry(caller).or_default().insert(capability);
        self
    }
}

impl CapabilityResolver for StaticCapabilityResolver {
    fn resolve_capabilities(&self, caller: &CallerId) -> BTreeSet<Capability> {
        self.grants.get(caller).cloned().unwrap_or_default()
    }
}

/// Declared requirement of each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    requirements: BTreeMap<OperationId, AccessRequirement>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::from_systems(&BTreeSet::new(), &BTreeMap::new())
    }
}

impl AccessPolicy {
    /// Per-operation override, else `OpenAccess` when the owning system is open, else
    /// `AdminOnly`.
    pub fn from_systems(
        open_systems: &BTreeSet<SystemId>,
        overrides: &BTreeMap<OperationId, AccessRequirement>,
    ) -> Self {
        let requirements = OperationId::ALL
            .into_iter()
            .map(|op| {
                let requirement = overrides.get(&op).copied().unwrap_or_else(|| {
                    if open_systems.contains(&op.system()) {
                        AccessRequirement::OpenAccess
                    } else {
                        AccessRequirement::AdminOnly
                    }
                });
                (op, requirement)
            })
            .collect();
        Self { requirements }
    }

    pub fn requirement(&self, operation: OperationId) -> AccessRequirement {
        self.requirements
            .get(&operation)
            .copied()
            .unwrap_or(AccessRequirement::AdminOnly)
    }
}

pub struct AccessGate<R> {
    policy: AccessPolicy,
    resolver: R,
}

impl<R: CapabilityResolver> AccessGate<R> {
    pub fn new(policy: AccessPolicy, resolver: R) -> Self {
        Self { policy, resolver }
    }

    pub fn check(&self, caller: &CallerId, operation: OperationId) -> Result<(), SystemError> {
        let requirement = self.policy.requirement(operation);
        if requirement == AccessRequirement::OpenAccess {
            return Ok(());
        }
        let system = operation.system();
        let capabilities = self.resolver.resolve_capabilities(caller);
        tracing::debug!(
            %caller,
            %operation,
            capabilities = capabilities.len(),
            "capabilities resolved"
        );
        if capabilities.iter().any(|c| c.satisfies(requirement, system)) {
            Ok(())
        } else {
            Err(SystemError::Unauthorized {
                caller: *caller,
                operation,
            })
        }
    }
}
