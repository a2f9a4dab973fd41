//! CSV row layout shared by the journal store and ledger export.

pub mod export;

use serde::{Deserialize, Serialize};

use crate::ledger::{AccountId, EnergyRecord};

/// Column header of the journal/export layout.
pub const HEADER: &str = "account,recorded_at,produced,consumed";

/// One record of one account, as stored in a CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub account: AccountId,
    pub recorded_at: u64,
    pub produced: u64,
    pub consumed: u64,
}

impl LedgerRow {
    /// Flattens one account record into a row.
    pub fn new(account: &AccountId, record: &EnergyRecord) -> Self {
        Self {
            account: account.clone(),
            recorded_at: record.recorded_at,
            produced: record.produced,
            consumed: record.consumed,
        }
    }

    /// The record this row describes, without its account.
    pub fn record(&self) -> EnergyRecord {
        EnergyRecord {
            produced: self.produced,
            consumed: self.consumed,
            recorded_at: self.recorded_at,
        }
    }
}
