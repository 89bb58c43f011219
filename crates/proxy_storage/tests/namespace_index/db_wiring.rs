#![forbid(unsafe_code)]

use proxy_kernel_contracts::primitives::{Address, Namespace};
use proxy_storage::bijective::BindOutcome;
use proxy_storage::repo::NamespaceIndexRepo;
use proxy_storage::{StorageError, WorldStore};

fn addr(v: u64) -> Address {
    Address::from_low_u64_be(v)
}

fn ns(label: &str) -> Namespace {
    Namespace::from_label(label).unwrap()
}

#[test]
fn at_nsidx_db_01_bind_is_visible_from_both_sides() {
    let mut s = WorldStore::new_in_memory();
    assert_eq!(
        s.bind_namespace_row(addr(0xAA), ns("ns1")).unwrap(),
        BindOutcome::Bound
    );
    assert_eq!(s.namespace_by_dapp_address_row(&addr(0xAA)), Some(ns("ns1")));
    assert_eq!(s.dapp_address_by_namespace_row(&ns("ns1")), Some(addr(0xAA)));
    assert!(s.namespace_index().is_consistent());
}

#[test]
fn at_nsidx_db_02_taken_namespace_rejects_second_address() {
    let mut s = WorldStore::new_in_memory();
    s.bind_namespace_row(addr(0xAA), ns("ns1")).unwrap();
    let before = s.clone();
    assert!(matches!(
        s.bind_namespace_row(addr(0xBB), ns("ns1")),
        Err(StorageError::BindConflict { .. })
    ));
    assert_eq!(s, before);
    assert_eq!(s.dapp_address_by_namespace_row(&ns("ns1")), Some(addr(0xAA)));
}

#[test]
fn at_nsidx_db_03_bound_address_rejects_second_namespace() {
    let mut s = WorldStore::new_in_memory();
    s.bind_namespace_row(addr(0xAA), ns("ns1")).unwrap();
    let before = s.clone();
    assert!(matches!(
        s.bind_namespace_row(addr(0xAA), ns("ns2")),
        Err(StorageError::BindConflict { .. })
    ));
    assert_eq!(s, before);
    assert_eq!(s.dapp_address_by_namespace_row(&ns("ns2")), None);
}

#[test]
fn at_nsidx_db_04_rebinding_same_pair_is_noop() {
    let mut s = WorldStore::new_in_memory();
    s.bind_namespace_row(addr(0xAA), ns("ns1")).unwrap();
    let before = s.clone();
    assert_eq!(
        s.bind_namespace_row(addr(0xAA), ns("ns1")).unwrap(),
        BindOutcome::AlreadyBound
    );
    assert_eq!(s, before);
}

#[test]
fn at_nsidx_db_05_unbind_then_rebind_elsewhere() {
    let mut s = WorldStore::new_in_memory();
    s.bind_namespace_row(addr(0xAA), ns("ns1")).unwrap();
    assert_eq!(s.unbind_namespace_row(addr(0xAA)).unwrap(), ns("ns1"));
    assert_eq!(s.namespace_by_dapp_address_row(&addr(0xAA)), None);
    assert_eq!(s.dapp_address_by_namespace_row(&ns("ns1")), None);

    s.bind_namespace_row(addr(0xBB), ns("ns1")).unwrap();
    s.bind_namespace_row(addr(0xAA), ns("ns2")).unwrap();
    assert_eq!(s.namespace_index().len(), 2);
    assert!(s.namespace_index().is_consistent());
}

#[test]
fn at_nsidx_db_06_unbind_unknown_address_is_not_found() {
    let mut s = WorldStore::new_in_memory();
    let before = s.clone();
    assert!(matches!(
        s.unbind_namespace_row(addr(0xAA)),
        Err(StorageError::NotFound { .. })
    ));
    assert_eq!(s, before);
}

#[test]
fn at_nsidx_db_07_zero_dapp_address_rejected() {
    let mut s = WorldStore::new_in_memory();
    assert!(matches!(
        s.bind_namespace_row(Address::ZERO, ns("ns1")),
        Err(StorageError::ContractViolation(_))
    ));
    assert!(s.namespace_index().is_empty());
}
