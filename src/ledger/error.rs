//! Error types for ledger operations.

use std::fmt;

use thiserror::Error;

use super::types::AccountId;
use crate::store::StoreError;

/// Which half of a reading a value or total refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Energy produced by the account.
    Produced,
    /// Energy consumed by the account.
    Consumed,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Produced => f.write_str("produced"),
            Self::Consumed => f.write_str("consumed"),
        }
    }
}

/// Errors surfaced by [`EnergyLedger::record_energy`](super::EnergyLedger::record_energy).
///
/// Any error leaves the ledger exactly as it was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input quantity is negative or does not fit in a `u64`.
    #[error("invalid {field} quantity `{value}`: must be an integer in 0..={max}", max = u64::MAX)]
    InvalidArgument { field: Quantity, value: String },

    /// Adding the reading would push a running total past `u64::MAX`.
    #[error("{field} total for account `{account}` would overflow")]
    Overflow { account: AccountId, field: Quantity },

    /// The persistence substrate refused the reading.
    #[error("failed to persist reading: {0}")]
    Store(#[from] StoreError),
}

/// A record that cannot be applied to an account entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("record out of sequence: expected index {expected}, found {found}")]
    OutOfSequence { expected: u64, found: u64 },

    #[error("{0} total would overflow")]
    Overflow(Quantity),
}

/// Rejected account identifier text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountIdError {
    #[error("account id must not be empty")]
    Empty,

    #[error("account id `{0}` contains a character not allowed in journal fields")]
    InvalidChar(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_field_and_value() {
        let err = LedgerError::InvalidArgument {
            field: Quantity::Produced,
            value: "-1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("produced"));
        assert!(msg.contains("`-1`"));
    }

    #[test]
    fn overflow_names_account() {
        let err = LedgerError::Overflow {
            account: AccountId::new("house-7").expect("valid id"),
            field: Quantity::Consumed,
        };
        assert_eq!(
            err.to_string(),
            "consumed total for account `house-7` would overflow"
        );
    }
}
