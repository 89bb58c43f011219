#![forbid(unsafe_code)]

//! Dapp address <-> namespace index.
//!
//! One logical relation kept in two physical tables (`DappAddressNamespace` keyed by address,
//! `NamespaceDappAddress` keyed by namespace). The tables are private; every write goes through
//! `bind`/`unbind`, which validate both sides before touching either.

use proxy_kernel_contracts::primitives::{Address, Namespace};
use proxy_kernel_contracts::schema::tables::{DAPP_ADDRESS_NAMESPACE, NAMESPACE_DAPP_ADDRESS};

use crate::table::{PutMode, RecordTable};
use crate::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    /// The exact pair was already present; nothing changed.
    AlreadyBound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BijectiveIndex {
    forward: RecordTable<Address, Namespace>,
    reverse: RecordTable<Namespace, Address>,
}

impl Default for BijectiveIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl BijectiveIndex {
    pub fn new() -> Self {
        Self {
            forward: RecordTable::new(DAPP_ADDRESS_NAMESPACE),
            reverse: RecordTable::new(NAMESPACE_DAPP_ADDRESS),
        }
    }

    pub fn check_bind(
        &self,
        dapp_address: Address,
        namespace: Namespace,
    ) -> Result<BindOutcome, StorageError> {
        let by_address = self.forward.get(&dapp_address).copied();
        let by_namespace = self.reverse.get(&namespace).copied();
        match (by_address, by_namespace) {
            (None, None) => Ok(BindOutcome::Bound),
            (Some(bound_ns), Some(bound_addr))
                if bound_ns == namespace && bound_addr == dapp_address =>
            {
                Ok(BindOutcome::AlreadyBound)
            }
            (Some(bound_ns), _) => Err(StorageError::BindConflict {
                dapp_address,
                namespace,
                existing_address: dapp_address,
                existing_namespace: bound_ns,
            }),
            (None, Some(bound_addr)) => Err(StorageError::BindConflict {
                dapp_address,
                namespace,
                existing_address: bound_addr,
                existing_namespace: namespace,
            }),
        }
    }

    pub fn bind(
        &mut self,
        dapp_address: Address,
        namespace: Namespace,
    ) -> Result<BindOutcome, StorageError> {
        let outcome = self.check_bind(dapp_address, namespace)?;
        if outcome == BindOutcome::Bound {
            // Both sides were checked absent above; neither insert can conflict.
            self.forward.put(dapp_address, namespace, PutMode::InsertOnly)?;
            self.reverse.put(namespace, dapp_address, PutMode::InsertOnly)?;
            tracing::debug!(%dapp_address, %namespace, "namespace bound");
        }
        debug_assert!(self.is_consistent());
        Ok(outcome)
    }

    pub fn check_unbind(&self, dapp_address: Address) -> Result<Namespace, StorageError> {
        self.forward
            .get(&dapp_address)
            .copied()
            .ok_or_else(|| StorageError::NotFound {
                table: self.forward.name(),
                key: dapp_address.to_string(),
            })
    }

    /// Removes both sides of the binding held by `dapp_address`.
    pub fn unbind(&mut self, dapp_address: Address) -> Result<Namespace, StorageError> {
        let namespace = self.check_unbind(dapp_address)?;
        self.reverse.check_delete(&namespace)?;
        self.forward.delete(&dapp_address)?;
        self.reverse.delete(&namespace)?;
        tracing::debug!(%dapp_address, %namespace, "namespace unbound");
        debug_assert!(self.is_consistent());
        Ok(namespace)
    }

    pub fn lookup_by_address(&self, dapp_address: &Address) -> Option<Namespace> {
        self.forward.get(dapp_address).copied()
    }

    pub fn lookup_by_namespace(&self, namespace: &Namespace) -> Option<Address> {
        self.reverse.get(namespace).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Both projections describe the same relation.
    pub fn is_consistent(&self) -> bool {
        self.forward.len() == self.reverse.len()
            && self
                .forward
                .iter()
                .all(|(a, n)| self.reverse.get(n) == Some(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(v: u64) -> Address {
        Address::from_low_u64_be(v)
    }

    fn ns(label: &str) -> Namespace {
        Namespace::from_label(label).unwrap()
    }

    #[test]
    fn at_bij_01_bind_then_lookup_both_directions() {
        let mut idx = BijectiveIndex::new();
        assert_eq!(idx.bind(addr(0xAA), ns("ns1")).unwrap(), BindOutcome::Bound);
        assert_eq!(idx.lookup_by_address(&addr(0xAA)), Some(ns("ns1")));
        assert_eq!(idx.lookup_by_namespace(&ns("ns1")), Some(addr(0xAA)));
        assert!(idx.is_consistent());
    }

    #[test]
    fn at_bij_02_same_pair_rebind_is_noop() {
        let mut idx = BijectiveIndex::new();
        idx.bind(addr(0xAA), ns("ns1")).unwrap();
        let before = idx.clone();
        assert_eq!(
            idx.bind(addr(0xAA), ns("ns1")).unwrap(),
            BindOutcome::AlreadyBound
        );
        assert_eq!(idx, before);
    }

    #[test]
    fn at_bij_03_address_already_bound_elsewhere_conflicts() {
        let mut idx = BijectiveIndex::new();
        idx.bind(addr(0xAA), ns("ns1")).unwrap();
        let before = idx.clone();
        assert_eq!(
            idx.bind(addr(0xAA), ns("ns2")),
            Err(StorageError::BindConflict {
                dapp_address: addr(0xAA),
                namespace: ns("ns2"),
                existing_address: addr(0xAA),
                existing_namespace: ns("ns1"),
            })
        );
        assert_eq!(idx, before);
    }

    #[test]
    fn at_bij_04_namespace_already_bound_elsewhere_conflicts() {
        let mut idx = BijectiveIndex::new();
        idx.bind(addr(0xAA), ns("ns1")).unwrap();
        let before = idx.clone();
        assert!(matches!(
            idx.bind(addr(0xBB), ns("ns1")),
            Err(StorageError::BindConflict {
                existing_address,
                ..
            }) if existing_address == addr(0xAA)
        ));
        assert_eq!(idx, before);
        assert_eq!(idx.lookup_by_namespace(&ns("ns1")), Some(addr(0xAA)));
        assert_eq!(idx.lookup_by_address(&addr(0xBB)), None);
    }

    #[test]
    fn at_bij_05_crossed_pair_conflicts() {
        let mut idx = BijectiveIndex::new();
        idx.bind(addr(0xAA), ns("ns1")).unwrap();
        idx.bind(addr(0xBB), ns("ns2")).unwrap();
        let before = idx.clone();
        assert!(idx.bind(addr(0xAA), ns("ns2")).is_err());
        assert_eq!(idx, before);
    }

    #[test]
    fn at_bij_06_unbind_removes_both_sides() {
        let mut idx = BijectiveIndex::new();
        idx.bind(addr(0xAA), ns("ns1")).unwrap();
        assert_eq!(idx.unbind(addr(0xAA)).unwrap(), ns("ns1"));
        assert_eq!(idx.lookup_by_namespace(&ns("ns1")), None);
        assert!(idx.is_empty());
        assert!(matches!(
            idx.unbind(addr(0xAA)),
            Err(StorageError::NotFound { .. })
        ));
        // Namespace is free again.
        idx.bind(addr(0xBB), ns("ns1")).unwrap();
        assert!(idx.is_consistent());
    }
}
