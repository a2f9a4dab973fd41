//! Core ledger types: account identifiers, records, and per-account entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{AccountIdError, EntryError, Quantity};

/// Opaque identifier of a ledger participant.
///
/// Two ids are equal only if their text is identical. Characters that would
/// need quoting in a CSV field are rejected so every id survives a journal
/// round trip.
///
/// # Examples
///
/// ```
/// use energy_ledger::AccountId;
///
/// let id: AccountId = "house-1".parse().unwrap();
/// assert_eq!(id.as_str(), "house-1");
/// assert!("".parse::<AccountId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validates and wraps an account identifier.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier text, compared byte for byte
    ///
    /// # Errors
    ///
    /// Returns an `AccountIdError` if `id` is empty or contains a character
    /// that cannot appear in a journal field.
    pub fn new(id: impl Into<String>) -> Result<Self, AccountIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AccountIdError::Empty);
        }
        if id
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == ',' || c == '"')
        {
            return Err(AccountIdError::InvalidChar(id));
        }
        Ok(Self(id))
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One produced/consumed measurement pair, immutable once appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyRecord {
    /// Energy produced (Wh).
    pub produced: u64,
    /// Energy consumed (Wh).
    pub consumed: u64,
    /// Position of this record in the account's history, starting at 0.
    pub recorded_at: u64,
}

impl fmt::Display for EnergyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<4} produced={:>8} Wh  consumed={:>8} Wh",
            self.recorded_at, self.produced, self.consumed
        )
    }
}

/// Per-account state: the record history plus running totals.
///
/// `total_produced` and `total_consumed` always equal the sums over
/// `records`; they are updated on every append and never rescanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountEntry {
    records: Vec<EnergyRecord>,
    total_produced: u64,
    total_consumed: u64,
}

impl AccountEntry {
    /// Every record appended so far, in insertion order.
    pub fn records(&self) -> &[EnergyRecord] {
        &self.records
    }

    /// Running sum of `produced` over all records (Wh).
    pub fn total_produced(&self) -> u64 {
        self.total_produced
    }

    /// Running sum of `consumed` over all records (Wh).
    pub fn total_consumed(&self) -> u64 {
        self.total_consumed
    }

    /// Sequence index the next appended record will carry.
    pub fn next_index(&self) -> u64 {
        self.records.len() as u64
    }

    /// Builds the record that would be appended next, without mutating.
    ///
    /// # Arguments
    ///
    /// * `produced` - Energy produced in this reading (Wh)
    /// * `consumed` - Energy consumed in this reading (Wh)
    ///
    /// # Errors
    ///
    /// Returns the quantity whose running total would overflow.
    pub fn prepare(&self, produced: u64, consumed: u64) -> Result<EnergyRecord, Quantity> {
        self.total_produced
            .checked_add(produced)
            .ok_or(Quantity::Produced)?;
        self.total_consumed
            .checked_add(consumed)
            .ok_or(Quantity::Consumed)?;
        Ok(EnergyRecord {
            produced,
            consumed,
            recorded_at: self.next_index(),
        })
    }

    /// Checks that `record` is exactly the next record this entry accepts.
    ///
    /// # Errors
    ///
    /// Returns an `EntryError` if the sequence index is wrong or a total
    /// would overflow.
    pub fn check(&self, record: &EnergyRecord) -> Result<(), EntryError> {
        let expected = self.next_index();
        if record.recorded_at != expected {
            return Err(EntryError::OutOfSequence {
                expected,
                found: record.recorded_at,
            });
        }
        self.prepare(record.produced, record.consumed)
            .map(|_| ())
            .map_err(EntryError::Overflow)
    }

    /// Appends `record` and adds it to both totals.
    ///
    /// # Errors
    ///
    /// Same as [`AccountEntry::check`]; the entry is unchanged on error.
    pub fn apply(&mut self, record: EnergyRecord) -> Result<(), EntryError> {
        self.check(&record)?;
        self.total_produced += record.produced;
        self.total_consumed += record.consumed;
        self.records.push(record);
        Ok(())
    }
}

/// Owned, consistent view of one account taken under a single read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    /// Account the snapshot was taken of.
    pub account: AccountId,
    /// Copy of the account's history at the time of the read.
    pub records: Vec<EnergyRecord>,
    /// Total produced (Wh), consistent with `records`.
    pub total_produced: u64,
    /// Total consumed (Wh), consistent with `records`.
    pub total_consumed: u64,
}

impl AccountSnapshot {
    /// Snapshot of an account with no history.
    pub fn empty(account: AccountId) -> Self {
        Self {
            account,
            records: Vec::new(),
            total_produced: 0,
            total_consumed: 0,
        }
    }

    /// Copies the history and totals out of `entry`.
    ///
    /// # Arguments
    ///
    /// * `account` - Account that owns `entry`
    /// * `entry` - Live entry to copy from
    pub fn from_entry(account: AccountId, entry: &AccountEntry) -> Self {
        Self {
            account,
            records: entry.records.clone(),
            total_produced: entry.total_produced,
            total_consumed: entry.total_consumed,
        }
    }
}
