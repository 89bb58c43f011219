#![forbid(unsafe_code)]

//! Append-only diagnostic message log (`DappMessagesDebug`) and its counter (`DebugCounter`).

use proxy_kernel_contracts::calls::{MAX_DEBUG_DATA_LEN, MAX_DEBUG_MESSAGE_LEN};
use proxy_kernel_contracts::common::{validate_len, validate_text};
use proxy_kernel_contracts::schema::tables::{DAPP_MESSAGES_DEBUG, DEBUG_COUNTER};
use proxy_kernel_contracts::{ContractViolation, Validate};

use crate::table::{PutMode, RecordTable, SingletonSlot};
use crate::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub index: u32,
    pub message: String,
    pub data: Vec<u8>,
}

impl Validate for DiagnosticEntry {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text(
            "diagnostic_entry.message",
            &self.message,
            MAX_DEBUG_MESSAGE_LEN,
        )?;
        validate_len("diagnostic_entry.data", self.data.len(), MAX_DEBUG_DATA_LEN)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: RecordTable<u32, DiagnosticEntry>,
    counter: SingletonSlot<u32>,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self {
            entries: RecordTable::new(DAPP_MESSAGES_DEBUG),
            counter: SingletonSlot::new(DEBUG_COUNTER),
        }
    }

    /// Current `DebugCounter` value; also the index the next entry will take.
    pub fn counter(&self) -> u32 {
        self.counter.get().copied().unwrap_or(0)
    }

    pub fn next_index(&self) -> Result<u32, StorageError> {
        let index = self.counter();
        if index == u32::MAX {
            return Err(StorageError::LogExhausted {
                table: self.counter.name(),
            });
        }
        Ok(index)
    }

    /// Everything `append` would check, without writing.
    pub fn check_append(&self, message: &str, data: &[u8]) -> Result<u32, StorageError> {
        let index = self.next_index()?;
        DiagnosticEntry {
            index,
            message: message.to_string(),
            data: data.to_vec(),
        }
        .validate()?;
        self.entries.check_put(&index, PutMode::InsertOnly)?;
        Ok(index)
    }

    pub fn append(&mut self, message: String, data: Vec<u8>) -> Result<u32, StorageError> {
        let index = self.next_index()?;
        let entry = DiagnosticEntry {
            index,
            message,
            data,
        };
        entry.validate()?;
        self.entries.put(index, entry, PutMode::InsertOnly)?;
        self.counter.put(index + 1, PutMode::Upsert)?;
        Ok(index)
    }

    pub fn entry(&self, index: u32) -> Option<&DiagnosticEntry> {
        self.entries.get(&index)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DiagnosticEntry> + '_ {
        self.entries.iter().map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrites `DebugCounter` without touching entries. Test fixture only.
    #[doc(hidden)]
    pub fn set_counter_unchecked(&mut self, value: u32) {
        self.counter = SingletonSlot::new(DEBUG_COUNTER);
        let _ = self.counter.put(value, PutMode::Upsert);
    }
}
