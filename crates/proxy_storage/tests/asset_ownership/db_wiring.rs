#![forbid(unsafe_code)]

use proxy_kernel_contracts::primitives::{Address, CartridgeId, TapeId};
use proxy_storage::repo::AssetOwnershipRepo;
use proxy_storage::{StorageError, WorldStore};

fn addr(v: u64) -> Address {
    Address::from_low_u64_be(v)
}

fn cart(label: &str) -> CartridgeId {
    CartridgeId::from_label(label).unwrap()
}

fn tape(label: &str) -> TapeId {
    TapeId::from_label(label).unwrap()
}

#[test]
fn at_owner_db_01_cartridge_owner_is_set_once() {
    let mut s = WorldStore::new_in_memory();
    s.insert_cartridge_owner_row(cart("cart1"), addr(0xAA)).unwrap();
    assert!(matches!(
        s.insert_cartridge_owner_row(cart("cart1"), addr(0xBB)),
        Err(StorageError::KeyConflict {
            table: "CartridgeOwner",
            ..
        })
    ));
    assert_eq!(s.cartridge_owner_row(&cart("cart1")), Some(addr(0xAA)));
}

#[test]
fn at_owner_db_02_tape_creator_is_set_once() {
    let mut s = WorldStore::new_in_memory();
    s.insert_tape_creator_row(tape("tape1"), addr(0xAA)).unwrap();
    let before = s.clone();
    assert!(matches!(
        s.insert_tape_creator_row(tape("tape1"), addr(0xAA)),
        Err(StorageError::KeyConflict {
            table: "TapeCreator",
            ..
        })
    ));
    assert_eq!(s, before);
}

#[test]
fn at_owner_db_03_cartridge_and_tape_keys_do_not_collide() {
    let mut s = WorldStore::new_in_memory();
    s.insert_cartridge_owner_row(cart("same"), addr(0xAA)).unwrap();
    s.insert_tape_creator_row(tape("same"), addr(0xBB)).unwrap();
    assert_eq!(s.cartridge_owner_row(&cart("same")), Some(addr(0xAA)));
    assert_eq!(s.tape_creator_row(&tape("same")), Some(addr(0xBB)));
    assert_eq!(s.cartridge_owners().len(), 1);
    assert_eq!(s.tape_creators().len(), 1);
}

#[test]
fn at_owner_db_04_unknown_asset_has_no_owner() {
    let s = WorldStore::new_in_memory();
    assert_eq!(s.cartridge_owner_row(&cart("nope")), None);
    assert_eq!(s.tape_creator_row(&tape("nope")), None);
}
