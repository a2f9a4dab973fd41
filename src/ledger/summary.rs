//! Per-account and ledger-wide summaries derived from snapshots.

use std::fmt;

use serde::Serialize;

use super::types::{AccountId, AccountSnapshot};

/// Derived figures for one account.
///
/// Computed from an [`AccountSnapshot`] so the figures always agree with the
/// records they were read with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub account: AccountId,
    /// Number of recorded readings.
    pub record_count: usize,
    /// Total energy produced (Wh).
    pub total_produced: u64,
    /// Total energy consumed (Wh).
    pub total_consumed: u64,
    /// `total_produced - total_consumed` (Wh, negative for net consumers).
    pub net: i128,
    /// Share of consumption covered by own production, capped at 100%.
    pub self_sufficiency_pct: f64,
}

impl AccountSummary {
    /// Derives net balance and self-sufficiency from one account snapshot.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Consistent view of the account's records and totals
    pub fn from_snapshot(snapshot: &AccountSnapshot) -> Self {
        let produced = snapshot.total_produced;
        let consumed = snapshot.total_consumed;
        let self_sufficiency_pct = if consumed > 0 {
            100.0 * produced.min(consumed) as f64 / consumed as f64
        } else {
            0.0
        };

        Self {
            account: snapshot.account.clone(),
            record_count: snapshot.records.len(),
            total_produced: produced,
            total_consumed: consumed,
            net: i128::from(produced) - i128::from(consumed),
            self_sufficiency_pct,
        }
    }
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} records={:>5}  produced={:>10} Wh  consumed={:>10} Wh  net={:>+11} Wh  self-sufficiency={:>5.1}%",
            self.account.as_str(),
            self.record_count,
            self.total_produced,
            self.total_consumed,
            self.net,
            self.self_sufficiency_pct,
        )
    }
}

/// Summaries of every account plus ledger-wide sums.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerReport {
    pub accounts: Vec<AccountSummary>,
    /// Sum of all production (Wh). Wider than `u64` since per-account totals
    /// are each bounded by `u64::MAX`.
    pub total_produced: u128,
    /// Sum of all consumption (Wh).
    pub total_consumed: u128,
    pub record_count: usize,
}

impl LedgerReport {
    /// Summarizes every snapshot and sums the ledger-wide totals.
    ///
    /// # Arguments
    ///
    /// * `snapshots` - One snapshot per account, in report order
    pub fn from_snapshots(snapshots: &[AccountSnapshot]) -> Self {
        let accounts: Vec<AccountSummary> =
            snapshots.iter().map(AccountSummary::from_snapshot).collect();

        let mut total_produced = 0_u128;
        let mut total_consumed = 0_u128;
        let mut record_count = 0_usize;
        for s in &accounts {
            total_produced += u128::from(s.total_produced);
            total_consumed += u128::from(s.total_consumed);
            record_count += s.record_count;
        }

        Self {
            accounts,
            total_produced,
            total_consumed,
            record_count,
        }
    }
}

impl fmt::Display for LedgerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Ledger Report ---")?;
        for summary in &self.accounts {
            writeln!(f, "{summary}")?;
        }
        writeln!(f, "Accounts:          {}", self.accounts.len())?;
        writeln!(f, "Records:           {}", self.record_count)?;
        writeln!(f, "Total produced:    {} Wh", self.total_produced)?;
        write!(f, "Total consumed:    {} Wh", self.total_consumed)
    }
}
