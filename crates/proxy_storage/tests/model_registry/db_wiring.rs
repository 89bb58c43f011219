#![forbid(unsafe_code)]

use proxy_kernel_contracts::primitives::{Address, CartridgeId};
use proxy_storage::repo::ModelRegistryRepo;
use proxy_storage::{StorageError, WorldStore};

fn model(v: u64) -> Address {
    Address::from_low_u64_be(v)
}

fn cart(label: &str) -> CartridgeId {
    CartridgeId::from_label(label).unwrap()
}

#[test]
fn at_model_db_01_unregistered_model_cannot_be_referenced() {
    let mut s = WorldStore::new_in_memory();
    assert!(!s.registered_model_active_row(&model(0xCC)));
    assert_eq!(
        s.set_cartridge_insertion_model_row(model(0xCC), vec![1]),
        Err(StorageError::InactiveModel {
            model_address: model(0xCC)
        })
    );
    assert!(matches!(
        s.set_tape_submission_model_row(cart("cart1"), model(0xCC), vec![1]),
        Err(StorageError::InactiveModel { .. })
    ));
    assert_eq!(s.cartridge_insertion_model_row(), None);
    assert_eq!(s.tape_submission_model_row(&cart("cart1")), None);
}

#[test]
fn at_model_db_02_inactive_model_leaves_submission_record_unchanged() {
    let mut s = WorldStore::new_in_memory();
    s.set_registered_model_row(model(0xCC), true).unwrap();
    s.set_tape_submission_model_row(cart("cart1"), model(0xCC), vec![1, 2])
        .unwrap();
    s.set_registered_model_row(model(0xCC), false).unwrap();

    let before = s.clone();
    assert!(matches!(
        s.set_tape_submission_model_row(cart("cart1"), model(0xCC), vec![3]),
        Err(StorageError::InactiveModel { .. })
    ));
    assert_eq!(s, before);
    let rec = s.tape_submission_model_row(&cart("cart1")).unwrap();
    assert_eq!(rec.config, vec![1, 2]);
}

#[test]
fn at_model_db_03_insertion_model_overwrites_global_slot() {
    let mut s = WorldStore::new_in_memory();
    s.set_registered_model_row(model(0xCC), true).unwrap();
    s.set_registered_model_row(model(0xDD), true).unwrap();
    s.set_cartridge_insertion_model_row(model(0xCC), vec![1])
        .unwrap();
    s.set_cartridge_insertion_model_row(model(0xDD), vec![2])
        .unwrap();
    let rec = s.cartridge_insertion_model_row().unwrap();
    assert_eq!(rec.model_address, model(0xDD));
    assert_eq!(rec.config, vec![2]);
}

#[test]
fn at_model_db_04_remove_submission_model() {
    let mut s = WorldStore::new_in_memory();
    s.set_registered_model_row(model(0xCC), true).unwrap();
    s.set_tape_submission_model_row(cart("cart1"), model(0xCC), vec![])
        .unwrap();
    let removed = s.delete_tape_submission_model_row(&cart("cart1")).unwrap();
    assert_eq!(removed.model_address, model(0xCC));
    assert!(matches!(
        s.delete_tape_submission_model_row(&cart("cart1")),
        Err(StorageError::NotFound {
            table: "TapeSubmissionModel",
            ..
        })
    ));
}

#[test]
fn at_model_db_05_oversized_config_rejected() {
    let mut s = WorldStore::new_in_memory();
    s.set_registered_model_row(model(0xCC), true).unwrap();
    let before = s.clone();
    assert!(matches!(
        s.set_cartridge_insertion_model_row(model(0xCC), vec![0u8; 16 * 1024 + 1]),
        Err(StorageError::ContractViolation(_))
    ));
    assert_eq!(s, before);
}
