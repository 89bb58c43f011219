#![forbid(unsafe_code)]

use proxy_kernel_contracts::schema::{tables, FieldType, TableSpec, WorldSchema};
use proxy_storage::{StorageError, WorldStore};

#[test]
fn at_schema_db_01_custom_namespace_binds() {
    let mut schema = WorldSchema::core_v1();
    schema.namespace = "arcade".to_string();
    let s = WorldStore::new(schema.clone()).unwrap();
    assert_eq!(s.namespace(), "arcade");
    assert_eq!(s.fingerprint(), schema.fingerprint());
    assert_ne!(s.fingerprint(), WorldSchema::core_v1().fingerprint());
}

#[test]
fn at_schema_db_02_field_order_is_irrelevant() {
    let mut schema = WorldSchema::core_v1();
    for t in &mut schema.tables {
        t.fields.reverse();
    }
    schema.tables.reverse();
    let s = WorldStore::new(schema).unwrap();
    assert_eq!(s.fingerprint(), WorldSchema::core_v1().fingerprint());
}

#[test]
fn at_schema_db_03_missing_table_rejected() {
    let mut schema = WorldSchema::core_v1();
    schema.tables.retain(|t| t.name != tables::NAMESPACE_DAPP_ADDRESS);
    assert_eq!(
        WorldStore::new(schema),
        Err(StorageError::SchemaMismatch {
            table: tables::NAMESPACE_DAPP_ADDRESS.to_string(),
            reason: "table missing",
        })
    );
}

#[test]
fn at_schema_db_04_commented_out_tables_rejected() {
    for name in ["CoreDappAddress", "NamespaceSubscriptions", "NamespaceDependencies"] {
        let mut schema = WorldSchema::core_v1();
        schema
            .tables
            .push(TableSpec::new(name, &[], &[("value", FieldType::Address)]));
        assert!(matches!(
            WorldStore::new(schema),
            Err(StorageError::SchemaMismatch { table, .. }) if table == name
        ));
    }
}

#[test]
fn at_schema_db_05_key_change_rejected() {
    let mut schema = WorldSchema::core_v1();
    for t in &mut schema.tables {
        if t.name == tables::CARTRIDGE_OWNER {
            t.key = vec!["owner".to_string()];
        }
    }
    assert_eq!(
        WorldStore::new(schema),
        Err(StorageError::SchemaMismatch {
            table: tables::CARTRIDGE_OWNER.to_string(),
            reason: "key fields differ",
        })
    );
}

#[test]
fn at_schema_db_06_invalid_namespace_is_contract_violation() {
    let mut schema = WorldSchema::core_v1();
    schema.namespace = "a_namespace_that_is_too_long".to_string();
    assert!(matches!(
        WorldStore::new(schema),
        Err(StorageError::ContractViolation(_))
    ));
}
