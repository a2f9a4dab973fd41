//! Property tests: growth, totals, ordering, and isolation over random readings.

mod common;

use proptest::prelude::*;

use energy_ledger::EnergyLedger;

/// Readings as `(account index, produced, consumed)`, kept small enough that
/// totals cannot overflow.
fn readings() -> impl Strategy<Value = Vec<(usize, u64, u64)>> {
    prop::collection::vec((0..4_usize, 0..1_000_000_u64, 0..1_000_000_u64), 0..64)
}

proptest! {
    #[test]
    fn history_length_totals_and_order_follow_writes(readings in readings()) {
        let accounts = common::accounts();
        let ledger = EnergyLedger::new();

        for &(i, produced, consumed) in &readings {
            ledger.record_energy(&accounts[i], produced, consumed).unwrap();
        }

        for (i, account) in accounts.iter().enumerate() {
            let expected: Vec<(u64, u64)> = readings
                .iter()
                .filter(|(j, _, _)| *j == i)
                .map(|&(_, p, c)| (p, c))
                .collect();
            let records = ledger.records(account);

            prop_assert_eq!(records.len(), expected.len());
            let actual: Vec<(u64, u64)> = records.iter().map(|r| (r.produced, r.consumed)).collect();
            prop_assert_eq!(&actual, &expected);
            prop_assert_eq!(
                ledger.total_production(account),
                expected.iter().map(|&(p, _)| p).sum::<u64>()
            );
            prop_assert_eq!(
                ledger.total_consumption(account),
                expected.iter().map(|&(_, c)| c).sum::<u64>()
            );
        }
    }

    #[test]
    fn writes_to_one_account_never_touch_another(
        seed in readings(),
        extra in prop::collection::vec((0..1_000_u64, 0..1_000_u64), 1..16),
    ) {
        let accounts = common::accounts();
        let ledger = EnergyLedger::new();
        for &(i, produced, consumed) in &seed {
            ledger.record_energy(&accounts[i], produced, consumed).unwrap();
        }
        let others: Vec<_> = accounts[1..].iter().map(|a| ledger.snapshot(a)).collect();

        for &(produced, consumed) in &extra {
            ledger.record_energy(&accounts[0], produced, consumed).unwrap();
        }

        for (account, before) in accounts[1..].iter().zip(&others) {
            prop_assert_eq!(&ledger.snapshot(account), before);
        }
    }

    #[test]
    fn negative_inputs_are_always_rejected(
        produced in i64::MIN..0_i64,
        consumed in 0..1_000_i64,
        swap in any::<bool>(),
    ) {
        let accounts = common::accounts();
        let ledger = EnergyLedger::new();
        common::record_all(&ledger, &accounts[0], &[(10, 5)]);
        let before = ledger.snapshot(&accounts[0]);

        let result = if swap {
            ledger.record_energy(&accounts[0], consumed, produced)
        } else {
            ledger.record_energy(&accounts[0], produced, consumed)
        };

        prop_assert!(result.is_err());
        prop_assert_eq!(ledger.snapshot(&accounts[0]), before);
    }
}
