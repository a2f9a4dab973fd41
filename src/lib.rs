//! Per-account energy ledger: append-only production/consumption readings
//! with incrementally maintained running totals.

pub mod cli;
pub mod config;
pub mod feed;
pub mod io;
pub mod ledger;
pub mod logging;
pub mod store;

pub use ledger::{AccountId, EnergyLedger, EnergyRecord, LedgerError};
