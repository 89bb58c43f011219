#![forbid(unsafe_code)]

//! Record table engine.
//!
//! A `RecordTable` maps a unique key to one fixed-shape row. A `SingletonSlot` is the zero-key
//! case: at most one row under an implicit unit key. Both are plain owned values; callers that
//! touch several tables in one operation pre-check every write with [`RecordTable::check_put`]
//! before applying any of them.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::StorageError;

/// Rendered in errors for the implicit key of a singleton.
pub const UNIT_KEY: &str = "()";

pub trait TableKey: Ord + Clone + fmt::Display {}

impl<T: Ord + Clone + fmt::Display> TableKey for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    InsertOnly,
    Upsert,
}

/// What a successful `put` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome<V> {
    Inserted,
    Replaced(V),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable<K, V> {
    name: &'static str,
    rows: BTreeMap<K, V>,
}

impl<K: TableKey, V: Clone> RecordTable<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in key order. Callers must not read meaning into the order.
    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.rows.iter()
    }

    pub fn check_put(&self, key: &K, mode: PutMode) -> Result<(), StorageError> {
        if mode == PutMode::InsertOnly && self.rows.contains_key(key) {
            return Err(StorageError::KeyConflict {
                table: self.name,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn put(&mut self, key: K, value: V, mode: PutMode) -> Result<PutOutcome<V>, StorageError> {
        self.check_put(&key, mode)?;
        Ok(match self.rows.insert(key, value) {
            Some(previous) => PutOutcome::Replaced(previous),
            None => PutOutcome::Inserted,
        })
    }

    pub fn check_delete(&self, key: &K) -> Result<(), StorageError> {
        if !self.rows.contains_key(key) {
            return Err(StorageError::NotFound {
                table: self.name,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete(&mut self, key: &K) -> Result<V, StorageError> {
        self.rows.remove(key).ok_or_else(|| StorageError::NotFound {
            table: self.name,
            key: key.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingletonSlot<V> {
    name: &'static str,
    value: Option<V>,
    set_once: bool,
}

impl<V: Clone> SingletonSlot<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            value: None,
            set_once: false,
        }
    }

    /// A slot whose first write is final.
    pub fn set_once(name: &'static str) -> Self {
        Self {
            name,
            value: None,
            set_once: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Upserts, unless the slot is set-once.
    pub fn set(&mut self, value: V) -> Result<PutOutcome<V>, StorageError> {
        let mode = if self.set_once {
            PutMode::InsertOnly
        } else {
            PutMode::Upsert
        };
        self.put(value, mode)
    }

    pub fn check_put(&self, mode: PutMode) -> Result<(), StorageError> {
        let insert_only = mode == PutMode::InsertOnly || self.set_once;
        if insert_only && self.value.is_some() {
            return Err(StorageError::KeyConflict {
                table: self.name,
                key: UNIT_KEY.to_string(),
            });
        }
        Ok(())
    }

    pub fn put(&mut self, value: V, mode: PutMode) -> Result<PutOutcome<V>, StorageError> {
        self.check_put(mode)?;
        Ok(match self.value.replace(value) {
            Some(previous) => PutOutcome::Replaced(previous),
            None => PutOutcome::Inserted,
        })
    }

    pub fn delete(&mut self) -> Result<V, StorageError> {
        self.value.take().ok_or_else(|| StorageError::NotFound {
            table: self.name,
            key: UNIT_KEY.to_string(),
        })
    }
}
