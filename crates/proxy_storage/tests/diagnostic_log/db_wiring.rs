#![forbid(unsafe_code)]

use proxy_storage::repo::DiagnosticLogRepo;
use proxy_storage::{StorageError, WorldStore};

#[test]
fn at_diag_db_01_append_assigns_counter_index() {
    let mut s = WorldStore::new_in_memory();
    assert_eq!(s.debug_counter_row(), 0);
    assert_eq!(s.append_dapp_message_row("first".into(), vec![]).unwrap(), 0);
    assert_eq!(
        s.append_dapp_message_row("second".into(), vec![0xde, 0xad])
            .unwrap(),
        1
    );
    assert_eq!(s.debug_counter_row(), 2);
    let e = s.dapp_message_row(1).unwrap();
    assert_eq!(e.message, "second");
    assert_eq!(e.data, vec![0xde, 0xad]);
}

#[test]
fn at_diag_db_02_rejected_append_does_not_advance_counter() {
    let mut s = WorldStore::new_in_memory();
    s.append_dapp_message_row("ok".into(), vec![]).unwrap();
    let before = s.clone();
    assert!(matches!(
        s.append_dapp_message_row(String::new(), vec![]),
        Err(StorageError::ContractViolation(_))
    ));
    assert_eq!(s, before);
    assert_eq!(s.debug_counter_row(), 1);
}

#[test]
fn at_diag_db_03_exhausted_counter_is_reported() {
    let mut s = WorldStore::new_in_memory();
    s.set_debug_counter_for_tests(u32::MAX);
    assert!(matches!(
        s.append_dapp_message_row("late".into(), vec![]),
        Err(StorageError::LogExhausted { table: "DebugCounter" })
    ));
    assert_eq!(s.dapp_message_row(u32::MAX), None);
}
