//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use energy_ledger::store::LedgerStore;
use energy_ledger::{AccountId, EnergyLedger};

/// Test accounts, mirroring a handful of distinct callers.
pub fn accounts() -> Vec<AccountId> {
    (0..4)
        .map(|i| AccountId::new(format!("account-{i}")).expect("valid account id"))
        .collect()
}

pub fn account(name: &str) -> AccountId {
    AccountId::new(name).expect("valid account id")
}

/// Records `readings` for `account` in order, panicking on rejection.
pub fn record_all<S: LedgerStore>(
    ledger: &EnergyLedger<S>,
    account: &AccountId,
    readings: &[(u64, u64)],
) {
    for &(produced, consumed) in readings {
        ledger
            .record_energy(account, produced, consumed)
            .expect("reading should be accepted");
    }
}

/// Asserts that both totals equal the sums over the account's records.
pub fn assert_totals_match_records<S: LedgerStore>(ledger: &EnergyLedger<S>, account: &AccountId) {
    let records = ledger.records(account);
    let produced: u64 = records.iter().map(|r| r.produced).sum();
    let consumed: u64 = records.iter().map(|r| r.consumed).sum();
    assert_eq!(ledger.total_production(account), produced);
    assert_eq!(ledger.total_consumption(account), consumed);
}
