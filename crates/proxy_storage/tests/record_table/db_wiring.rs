#![forbid(unsafe_code)]

use proxy_kernel_contracts::primitives::Address;
use proxy_storage::repo::WorldConfigTablesRepo;
use proxy_storage::{StorageError, WorldStore};

fn addr(v: u64) -> Address {
    Address::from_low_u64_be(v)
}

#[test]
fn at_registry_db_01_singletons_start_empty() {
    let s = WorldStore::new_in_memory();
    assert_eq!(s.input_box_address_row(), None);
    assert_eq!(s.cartridge_asset_address_row(), None);
    assert_eq!(s.tape_asset_address_row(), None);
}

#[test]
fn at_registry_db_02_singleton_writes_overwrite() {
    let mut s = WorldStore::new_in_memory();
    s.set_input_box_address_row(addr(0x10)).unwrap();
    s.set_input_box_address_row(addr(0x11)).unwrap();
    assert_eq!(s.input_box_address_row(), Some(addr(0x11)));

    s.set_cartridge_asset_address_row(addr(0x20)).unwrap();
    s.set_tape_asset_address_row(addr(0x30)).unwrap();
    assert_eq!(s.cartridge_asset_address_row(), Some(addr(0x20)));
    assert_eq!(s.tape_asset_address_row(), Some(addr(0x30)));
    // Slots are independent.
    assert_eq!(s.input_box_address_row(), Some(addr(0x11)));
}

#[test]
fn at_registry_db_03_zero_address_rejected_and_slot_kept() {
    let mut s = WorldStore::new_in_memory();
    s.set_tape_asset_address_row(addr(0x30)).unwrap();
    let before = s.clone();
    assert!(matches!(
        s.set_tape_asset_address_row(Address::ZERO),
        Err(StorageError::ContractViolation(_))
    ));
    assert_eq!(s, before);
}
