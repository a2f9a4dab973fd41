//! The energy ledger: per-account record histories with running totals.

pub mod error;
pub mod summary;
pub mod types;

use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, warn};

pub use error::{AccountIdError, EntryError, LedgerError, Quantity};
pub use summary::{AccountSummary, LedgerReport};
pub use types::{AccountEntry, AccountId, AccountSnapshot, EnergyRecord};

use crate::store::{LedgerStore, MemoryStore};

/// Append-only energy ledger keyed by account.
///
/// All state sits behind a single read-write lock: a write holds it across
/// validation, persistence and the in-memory append, so concurrent writers
/// for the same account never interleave and readers always see totals that
/// match the records they are read with.
///
/// # Examples
///
/// ```
/// use energy_ledger::{AccountId, EnergyLedger};
///
/// let ledger = EnergyLedger::new();
/// let alice = AccountId::new("alice").unwrap();
///
/// ledger.record_energy(&alice, 10, 5).unwrap();
/// assert_eq!(ledger.records(&alice).len(), 1);
/// assert_eq!(ledger.total_production(&alice), 10);
/// assert_eq!(ledger.total_consumption(&alice), 5);
/// ```
pub struct EnergyLedger<S = MemoryStore> {
    store: RwLock<S>,
}

impl EnergyLedger<MemoryStore> {
    /// Creates an empty in-memory ledger.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for EnergyLedger<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LedgerStore> EnergyLedger<S> {
    /// Creates a ledger backed by `store`, keeping whatever it already holds.
    ///
    /// # Arguments
    ///
    /// * `store` - Backing store, e.g. a replayed [`crate::store::JournalStore`]
    pub fn with_store(store: S) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    /// Appends a reading to `caller`'s history and adds it to the totals.
    ///
    /// `caller` must already be authenticated by the embedding process. The
    /// quantities accept any integer type and must fit in a `u64`.
    ///
    /// # Arguments
    ///
    /// * `caller` - Account the reading is recorded for
    /// * `produced` - Energy produced since the previous reading (Wh)
    /// * `consumed` - Energy consumed since the previous reading (Wh)
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` if either quantity is negative or exceeds `u64::MAX`
    /// * `Overflow` if a running total would exceed `u64::MAX`
    /// * `Store` if the backing store fails to persist the reading
    ///
    /// On error the ledger is left untouched.
    pub fn record_energy<P, C>(
        &self,
        caller: &AccountId,
        produced: P,
        consumed: C,
    ) -> Result<EnergyRecord, LedgerError>
    where
        P: TryInto<u64> + Copy + fmt::Display,
        C: TryInto<u64> + Copy + fmt::Display,
    {
        let produced = quantity(Quantity::Produced, produced)
            .inspect_err(|e| warn!(account = %caller, error = %e, "rejected reading"))?;
        let consumed = quantity(Quantity::Consumed, consumed)
            .inspect_err(|e| warn!(account = %caller, error = %e, "rejected reading"))?;

        let mut store = self.store.write();
        let prepared = match store.entry(caller) {
            Some(entry) => entry.prepare(produced, consumed),
            None => AccountEntry::default().prepare(produced, consumed),
        };
        let record = prepared.map_err(|field| {
            warn!(account = %caller, %field, "rejected reading: total would overflow");
            LedgerError::Overflow {
                account: caller.clone(),
                field,
            }
        })?;
        store
            .append(caller, record)
            .inspect_err(|e| warn!(account = %caller, error = %e, "failed to persist reading"))?;

        debug!(
            account = %caller,
            produced,
            consumed,
            recorded_at = record.recorded_at,
            "recorded energy reading"
        );
        Ok(record)
    }

    /// Returns `account`'s full history in insertion order.
    ///
    /// Unknown accounts yield an empty vector. The result is an owned copy;
    /// later writes do not affect it.
    pub fn records(&self, account: &AccountId) -> Vec<EnergyRecord> {
        self.store
            .read()
            .entry(account)
            .map(|entry| entry.records().to_vec())
            .unwrap_or_default()
    }

    /// Total energy produced by `account`, or 0 if it has no history.
    pub fn total_production(&self, account: &AccountId) -> u64 {
        self.store
            .read()
            .entry(account)
            .map_or(0, AccountEntry::total_produced)
    }

    /// Total energy consumed by `account`, or 0 if it has no history.
    pub fn total_consumption(&self, account: &AccountId) -> u64 {
        self.store
            .read()
            .entry(account)
            .map_or(0, AccountEntry::total_consumed)
    }

    /// Records and totals of `account` read under one lock acquisition.
    pub fn snapshot(&self, account: &AccountId) -> AccountSnapshot {
        match self.store.read().entry(account) {
            Some(entry) => AccountSnapshot::from_entry(account.clone(), entry),
            None => AccountSnapshot::empty(account.clone()),
        }
    }

    /// Snapshots of every account, sorted by id, read under one lock acquisition.
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        let store = self.store.read();
        let mut accounts = store.accounts();
        accounts.sort();
        accounts
            .into_iter()
            .filter_map(|account| {
                store
                    .entry(&account)
                    .map(|entry| AccountSnapshot::from_entry(account.clone(), entry))
            })
            .collect()
    }

    /// Every account with at least one record, sorted.
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts = self.store.read().accounts();
        accounts.sort();
        accounts
    }

    /// Aggregate report over every account.
    pub fn report(&self) -> LedgerReport {
        LedgerReport::from_snapshots(&self.snapshots())
    }
}

/// Converts a caller-supplied integer into a ledger quantity.
fn quantity<T>(field: Quantity, value: T) -> Result<u64, LedgerError>
where
    T: TryInto<u64> + Copy + fmt::Display,
{
    value
        .try_into()
        .map_err(|_| LedgerError::InvalidArgument {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    #[test]
    fn single_reading_scenario() {
        let ledger = EnergyLedger::new();
        let a = id("account-0");
        ledger.record_energy(&a, 10, 5).unwrap();

        let records = ledger.records(&a);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].produced, 10);
        assert_eq!(records[0].consumed, 5);
        assert_eq!(ledger.total_production(&a), 10);
        assert_eq!(ledger.total_consumption(&a), 5);
    }

    #[test]
    fn two_readings_keep_order_and_sum() {
        let ledger = EnergyLedger::new();
        let a = id("account-0");
        ledger.record_energy(&a, 3, 2).unwrap();
        ledger.record_energy(&a, 7, 1).unwrap();

        assert_eq!(ledger.total_production(&a), 10);
        assert_eq!(ledger.total_consumption(&a), 3);
        let records = ledger.records(&a);
        assert_eq!(
            records,
            vec![
                EnergyRecord {
                    produced: 3,
                    consumed: 2,
                    recorded_at: 0
                },
                EnergyRecord {
                    produced: 7,
                    consumed: 1,
                    recorded_at: 1
                },
            ]
        );
    }

    #[test]
    fn negative_input_is_rejected_and_state_unchanged() {
        let ledger = EnergyLedger::new();
        let a = id("a");
        ledger.record_energy(&a, 4, 4).unwrap();
        let before = ledger.snapshot(&a);

        let err = ledger.record_energy(&a, -1, 5).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidArgument {
                field: Quantity::Produced,
                ..
            }
        ));
        let err = ledger.record_energy(&a, 5, -3_i64).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidArgument {
                field: Quantity::Consumed,
                ..
            }
        ));
        assert_eq!(ledger.snapshot(&a), before);
    }

    #[test]
    fn out_of_range_input_is_rejected() {
        let ledger = EnergyLedger::new();
        let a = id("a");
        let too_big = u128::from(u64::MAX) + 1;
        let err = ledger.record_energy(&a, too_big, 0_u8).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument { .. }));
        assert!(ledger.records(&a).is_empty());
        assert!(ledger.accounts().is_empty());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let ledger = EnergyLedger::new();
        let a = id("a");
        ledger.record_energy(&a, u64::MAX, 1_u64).unwrap();
        let before = ledger.snapshot(&a);

        let err = ledger.record_energy(&a, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Overflow {
                field: Quantity::Produced,
                ..
            }
        ));
        assert_eq!(ledger.snapshot(&a), before);
    }

    #[test]
    fn unknown_account_defaults() {
        let ledger = EnergyLedger::new();
        let ghost = id("ghost");
        assert!(ledger.records(&ghost).is_empty());
        assert_eq!(ledger.total_production(&ghost), 0);
        assert_eq!(ledger.total_consumption(&ghost), 0);
        assert_eq!(ledger.snapshot(&ghost), AccountSnapshot::empty(ghost));
    }

    #[test]
    fn returned_records_are_snapshots() {
        let ledger = EnergyLedger::new();
        let a = id("a");
        ledger.record_energy(&a, 1, 1).unwrap();
        let earlier = ledger.records(&a);
        ledger.record_energy(&a, 2, 2).unwrap();
        assert_eq!(earlier.len(), 1);
        assert_eq!(ledger.records(&a).len(), 2);
    }

    #[test]
    fn accounts_are_sorted() {
        let ledger = EnergyLedger::new();
        for name in ["zeta", "alpha", "mid"] {
            ledger.record_energy(&id(name), 1, 0).unwrap();
        }
        let names: Vec<String> = ledger.accounts().into_iter().map(String::from).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
