//! Backing stores for the ledger's account mapping.

pub mod journal;

use std::collections::HashMap;
use std::io;

use thiserror::Error;

use crate::ledger::{AccountEntry, AccountId, EnergyRecord, EntryError};

pub use journal::JournalStore;

/// Errors raised by a ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("journal encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("journal line {line} is corrupt: {reason}")]
    Corrupt { line: u64, reason: String },

    #[error(transparent)]
    Entry(#[from] EntryError),
}

/// Key-value substrate holding one [`AccountEntry`] per account.
///
/// The ledger serializes all calls through its own lock, so implementations
/// need no internal synchronization. `append` must either persist and apply
/// the record or leave the store unchanged.
pub trait LedgerStore {
    /// Returns the entry for `account`, if it has ever recorded anything.
    fn entry(&self, account: &AccountId) -> Option<&AccountEntry>;

    /// Persists `record` and appends it to `account`'s entry, creating the
    /// entry if needed.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the record is not the entry's next record or
    /// if persisting fails.
    fn append(&mut self, account: &AccountId, record: EnergyRecord) -> Result<(), StoreError>;

    /// Every account with an entry, in no particular order.
    fn accounts(&self) -> Vec<AccountId>;
}

/// In-memory store: a plain map from account to entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<AccountId, AccountEntry>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `record` against `account`'s entry without applying it.
    ///
    /// # Arguments
    ///
    /// * `account` - Account the record would be appended to
    /// * `record` - Candidate record, including its sequence index
    ///
    /// # Errors
    ///
    /// Returns an `EntryError` if the record would be rejected by `append`.
    pub fn check(&self, account: &AccountId, record: &EnergyRecord) -> Result<(), EntryError> {
        match self.entries.get(account) {
            Some(entry) => entry.check(record),
            None => AccountEntry::default().check(record),
        }
    }

    /// Number of accounts with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerStore for MemoryStore {
    fn entry(&self, account: &AccountId) -> Option<&AccountEntry> {
        self.entries.get(account)
    }

    fn append(&mut self, account: &AccountId, record: EnergyRecord) -> Result<(), StoreError> {
        match self.entries.get_mut(account) {
            Some(entry) => entry.apply(record)?,
            None => {
                let mut entry = AccountEntry::default();
                entry.apply(record)?;
                self.entries.insert(account.clone(), entry);
            }
        }
        Ok(())
    }

    fn accounts(&self) -> Vec<AccountId> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn record(produced: u64, consumed: u64, recorded_at: u64) -> EnergyRecord {
        EnergyRecord {
            produced,
            consumed,
            recorded_at,
        }
    }

    #[test]
    fn append_creates_entry_lazily() {
        let mut store = MemoryStore::new();
        assert!(store.entry(&id("a")).is_none());
        store.append(&id("a"), record(1, 2, 0)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.entry(&id("a")).map(AccountEntry::total_consumed), Some(2));
    }

    #[test]
    fn rejected_first_record_leaves_no_entry() {
        let mut store = MemoryStore::new();
        let err = store.append(&id("a"), record(1, 1, 5)).unwrap_err();
        assert!(matches!(err, StoreError::Entry(EntryError::OutOfSequence { .. })));
        assert!(store.is_empty());
        assert!(store.accounts().is_empty());
    }

    #[test]
    fn check_does_not_mutate() {
        let mut store = MemoryStore::new();
        store.append(&id("a"), record(1, 1, 0)).unwrap();
        assert!(store.check(&id("a"), &record(2, 2, 1)).is_ok());
        assert!(store.check(&id("a"), &record(2, 2, 0)).is_err());
        assert!(store.check(&id("b"), &record(2, 2, 0)).is_ok());
        assert_eq!(store.entry(&id("a")).map(|e| e.records().len()), Some(1));
        assert!(store.entry(&id("b")).is_none());
    }
}
